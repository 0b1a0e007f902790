//! Input validation utilities.
//!
//! Request bodies arrive with every field optional. These helpers turn them into the values
//! the repositories need and produce the 400 messages clients see.

use crate::{LabError, LabResult};
use chrono::{DateTime, NaiveDate};
use lab_types::NonEmptyText;

/// Checks that every named field is present, reporting all missing ones at once.
///
/// Produces messages of the form `Missing required fields (patients_name, gender)`.
pub fn require_fields(fields: &[(&str, bool)]) -> LabResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LabError::InvalidInput(format!(
            "Missing required fields ({})",
            missing.join(", ")
        )))
    }
}

/// True when an optional text field holds something other than whitespace.
pub fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Converts a field already checked by [`require_fields`] into `NonEmptyText`.
pub fn required_text(field: &str, value: Option<String>) -> LabResult<NonEmptyText> {
    NonEmptyText::from_opt(value.as_deref())
        .ok_or_else(|| LabError::InvalidInput(format!("Missing required fields ({field})")))
}

/// Parses a report date.
///
/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp (as produced by `Date.toISOString()`) whose
/// calendar date is kept.
pub fn parse_test_date(value: &str) -> LabResult<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.date_naive())
        .map_err(|_| {
            LabError::InvalidInput(format!(
                "test_date must be a date (YYYY-MM-DD), got '{value}'"
            ))
        })
}
