//! Lenient decoding for optional request fields.
//!
//! Use with `#[serde(default, deserialize_with = "...")]`. All helpers accept `null`, a missing
//! field, or an empty/blank string as "absent". Anything present but malformed is a
//! deserialisation error, which the API layer reports as a 400.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

fn scalar<'de, D>(deserializer: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Text(s)) if s.trim().is_empty() => None,
        other => other,
    })
}

/// Text field that may arrive as a string or a number (phone numbers, zip codes).
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match scalar(deserializer)? {
        None => None,
        Some(Scalar::Text(s)) => Some(s.trim().to_owned()),
        Some(Scalar::Int(n)) => Some(n.to_string()),
        Some(Scalar::Float(n)) => Some(n.to_string()),
        Some(Scalar::Bool(b)) => Some(b.to_string()),
    })
}

// i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive.
fn in_i64_range(n: f64) -> bool {
    n >= i64::MIN as f64 && n < i64::MAX as f64
}

/// Integer field that may arrive as a number or a numeric string.
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match scalar(deserializer)? {
        None => Ok(None),
        Some(Scalar::Int(n)) => Ok(Some(n)),
        Some(Scalar::Float(n)) if n.fract() == 0.0 && in_i64_range(n) => Ok(Some(n as i64)),
        Some(Scalar::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{}'", s))),
        Some(_) => Err(de::Error::custom("expected an integer")),
    }
}

/// Decimal field that may arrive as a number or a numeric string.
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match scalar(deserializer)? {
        None => Ok(None),
        Some(Scalar::Int(n)) => Ok(Some(n as f64)),
        Some(Scalar::Float(n)) if n.is_finite() => Ok(Some(n)),
        Some(Scalar::Text(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a number, got '{}'", s))),
        Some(_) => Err(de::Error::custom("expected a number")),
    }
}
