//! Multi-row diagnostic reports.
//!
//! A report is not a stored row. It is the set of `report` rows (report items) that share one
//! `REP-XXXXXX` identifier, one patient, one doctor and one test date. This module owns every
//! write to that table:
//!
//! - [`ReportService::create`] allocates a fresh report id and inserts all items
//! - [`ReportService::replace`] deletes every item of a report and inserts a new set under the
//!   same id
//! - [`ReportService::delete`] removes every item
//!
//! Create and replace run inside one transaction each; either every statement lands or none do.
//! Report ids arriving from callers are trimmed before they reach the store.
//!
//! ## Reads
//!
//! Listings return one [`ReportSummary`] per report id: the patient name, the date, the
//! greatest item status (lexicographic, NULLs ignored) and the distinct test names in the order
//! their items were inserted. [`ReportService::detail`] returns the items themselves, joined
//! with patient, doctor, test and component columns.

use crate::constants::{DEFAULT_ITEM_METHOD, TEST_NAME_SEPARATOR};
use crate::db::finish;
use crate::repositories::helpers::allocate_id;
use crate::validation::{has_text, parse_test_date};
use crate::{Database, LabError, LabResult, NonEmptyText};
use api_shared::{ReportItemReq, ReportReq};
use chrono::{Local, NaiveDate};
use lab_ids::{IdKind, LabId};
use lab_types::non_blank;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use std::collections::HashMap;
use utoipa::ToSchema;

const MISSING_REPORT_DATA: &str = "Missing required report data or tests.";
const MISSING_TEST_ID: &str = "Missing test_id in one of the conducted tests.";

// ============================================================================
// WRITE MODEL
// ============================================================================

/// A validated report write, ready to be turned into rows.
#[derive(Clone, Debug)]
pub struct ReportDraft {
    patient_id: NonEmptyText,
    doctor_id: NonEmptyText,
    test_date: NaiveDate,
    overall_comments: Option<String>,
    overall_status: NonEmptyText,
    items: Vec<ReportItemDraft>,
}

#[derive(Clone, Debug)]
struct ReportItemDraft {
    test_id: i64,
    component_id: Option<i64>,
    result: Option<String>,
    method: Option<String>,
    comments: Option<String>,
    status: Option<String>,
}

/// Column values of one `report` row after report-level fallbacks are applied.
#[derive(Debug, PartialEq)]
struct ItemRow<'a> {
    test_id: i64,
    component_id: Option<i64>,
    result: Option<&'a str>,
    method: &'a str,
    comments: Option<&'a str>,
    status: &'a str,
}

impl ReportDraft {
    /// Validates a request body.
    ///
    /// `patient_id`, `doctor_id`, `test_date` and `status` must be non-blank and
    /// `tests_conducted` non-empty; every item must name a `test_id`. Nothing about the
    /// referenced rows is checked here: unknown patients or tests fail inside the write.
    ///
    /// # Errors
    ///
    /// Returns [`LabError::InvalidInput`] describing the first problem found.
    pub fn from_request(req: ReportReq) -> LabResult<Self> {
        let items = req.tests_conducted.unwrap_or_default();
        let complete = has_text(&req.patient_id)
            && has_text(&req.doctor_id)
            && has_text(&req.test_date)
            && has_text(&req.status)
            && !items.is_empty();
        if !complete {
            return Err(LabError::InvalidInput(MISSING_REPORT_DATA.into()));
        }

        let missing = || LabError::InvalidInput(MISSING_REPORT_DATA.into());
        let patient_id = NonEmptyText::from_opt(req.patient_id.as_deref()).ok_or_else(missing)?;
        let doctor_id = NonEmptyText::from_opt(req.doctor_id.as_deref()).ok_or_else(missing)?;
        let overall_status = NonEmptyText::from_opt(req.status.as_deref()).ok_or_else(missing)?;
        let test_date = parse_test_date(req.test_date.as_deref().unwrap_or_default())?;

        let items = items
            .into_iter()
            .map(ReportItemDraft::from_request)
            .collect::<LabResult<Vec<_>>>()?;

        Ok(Self {
            patient_id,
            doctor_id,
            test_date,
            overall_comments: non_blank(req.overall_comments),
            overall_status,
            items,
        })
    }

    pub fn patient_id(&self) -> &str {
        self.patient_id.as_str()
    }

    pub fn test_date(&self) -> NaiveDate {
        self.test_date
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Rows to insert: method defaults to `N/A`, comments fall back to the overall comments,
    /// status falls back to the overall status.
    fn rows(&self) -> impl Iterator<Item = ItemRow<'_>> {
        self.items.iter().map(move |item| ItemRow {
            test_id: item.test_id,
            component_id: item.component_id,
            result: item.result.as_deref(),
            method: item.method.as_deref().unwrap_or(DEFAULT_ITEM_METHOD),
            comments: item
                .comments
                .as_deref()
                .or(self.overall_comments.as_deref()),
            status: item
                .status
                .as_deref()
                .unwrap_or(self.overall_status.as_str()),
        })
    }
}

impl ReportItemDraft {
    fn from_request(item: ReportItemReq) -> LabResult<Self> {
        let test_id = item
            .test_id
            .ok_or_else(|| LabError::InvalidInput(MISSING_TEST_ID.into()))?;

        Ok(Self {
            test_id,
            component_id: item.component_id,
            result: non_blank(item.result),
            method: non_blank(item.method),
            comments: non_blank(item.comments),
            status: non_blank(item.status),
        })
    }
}

// ============================================================================
// READ MODEL
// ============================================================================

/// One line of a report listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportSummary {
    pub report_id: String,
    pub patients_name: String,
    pub test_date: NaiveDate,
    pub status: Option<String>,
    /// Distinct test names joined by `", "`.
    pub tests: String,
}

/// One report item with the columns a report screen needs to render or pre-fill it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ReportItemDetail {
    pub report_table_id: i64,
    pub report_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub test_id: i64,
    pub component_id: Option<i64>,
    pub test_date: NaiveDate,
    pub result: Option<String>,
    pub method: Option<String>,
    pub report_item_comments: Option<String>,
    pub status: Option<String>,
    pub patients_name: String,
    pub gender: String,
    pub age_years: Option<i64>,
    pub age_months: Option<i64>,
    pub age_days: Option<i64>,
    pub test_name: String,
    pub test_rate: f64,
    pub component_name: Option<String>,
    pub specimen: Option<String>,
    pub test_unit: Option<String>,
    pub reference_range: Option<String>,
    pub doctor_name: String,
}

/// Item-level row feeding [`summarise`].
#[derive(Clone, Debug, sqlx::FromRow)]
pub(crate) struct ListingRow {
    pub report_id: String,
    pub patients_name: String,
    pub test_date: NaiveDate,
    pub status: Option<String>,
    pub test_name: String,
}

/// Folds item rows into one summary per report id, keeping the order in which report ids first
/// appear.
pub(crate) fn summarise(rows: Vec<ListingRow>) -> Vec<ReportSummary> {
    let mut summaries: Vec<ReportSummary> = Vec::new();
    let mut test_names: Vec<Vec<String>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let slot = match index.get(&row.report_id) {
            Some(&slot) => slot,
            None => {
                index.insert(row.report_id.clone(), summaries.len());
                summaries.push(ReportSummary {
                    report_id: row.report_id,
                    patients_name: row.patients_name,
                    test_date: row.test_date,
                    status: None,
                    tests: String::new(),
                });
                test_names.push(Vec::new());
                summaries.len() - 1
            }
        };

        let summary = &mut summaries[slot];
        // Option orders None below every Some, so this ignores NULL statuses.
        summary.status = summary.status.take().max(row.status);

        let names = &mut test_names[slot];
        if !names.contains(&row.test_name) {
            names.push(row.test_name);
        }
    }

    for (summary, names) in summaries.iter_mut().zip(test_names) {
        summary.tests = names.join(TEST_NAME_SEPARATOR);
    }
    summaries
}

// ============================================================================
// SERVICE
// ============================================================================

const LISTING_SQL: &str = "SELECT r.report_id, p.patients_name, r.test_date, r.status, t.test_name \
     FROM report r \
     JOIN patients p ON r.patient_id = p.patient_id \
     JOIN test t ON r.test_id = t.test_id";

const LISTING_ORDER: &str = "ORDER BY r.test_date DESC, r.report_id DESC, r.id";

/// Store errors raised inside a report write surface as transaction failures.
fn in_transaction(err: LabError) -> LabError {
    match err {
        LabError::Database(err) => LabError::transaction(err),
        other => other,
    }
}

async fn insert_items(
    conn: &mut SqliteConnection,
    report_id: &str,
    draft: &ReportDraft,
) -> LabResult<usize> {
    let mut inserted = 0;
    for row in draft.rows() {
        sqlx::query(
            "INSERT INTO report (report_id, patient_id, doctor_id, test_id, component_id, test_date, result, method, comments, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(report_id)
        .bind(draft.patient_id.as_str())
        .bind(draft.doctor_id.as_str())
        .bind(row.test_id)
        .bind(row.component_id)
        .bind(draft.test_date)
        .bind(row.result)
        .bind(row.method)
        .bind(row.comments)
        .bind(row.status)
        .execute(&mut *conn)
        .await
        .map_err(LabError::transaction)?;
        inserted += 1;
    }
    Ok(inserted)
}

/// Service for report writes and queries.
#[derive(Clone, Debug)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates a report under a freshly allocated `REP-` identifier.
    ///
    /// All items share the returned id. The whole write is one transaction.
    ///
    /// # Errors
    ///
    /// - [`LabError::Conflict`] if no free report id could be allocated
    /// - [`LabError::Transaction`] if any insert fails (e.g. unknown patient or test); nothing
    ///   is written
    pub async fn create(&self, draft: &ReportDraft) -> LabResult<LabId> {
        self.create_with(draft, || LabId::new(IdKind::Report)).await
    }

    pub(crate) async fn create_with(
        &self,
        draft: &ReportDraft,
        id_source: impl FnMut() -> LabId,
    ) -> LabResult<LabId> {
        let mut tx = self.db.begin().await?;

        let outcome = async {
            let report_id = allocate_id(&mut *tx, IdKind::Report, id_source)
                .await
                .map_err(in_transaction)?;
            insert_items(&mut *tx, report_id.as_str(), draft).await?;
            Ok::<_, LabError>(report_id)
        }
        .await;

        let report_id = finish(tx, outcome).await?;
        tracing::info!(
            report_id = %report_id,
            items = draft.item_count(),
            "report created"
        );
        Ok(report_id)
    }

    /// Replaces every item of `report_id` with the items in `draft`.
    ///
    /// The delete is unconditional, so replacing an id that has no items creates it. Replaying
    /// the same draft leaves the same rows (apart from row ids).
    ///
    /// Returns the number of items now stored.
    pub async fn replace(&self, report_id: &str, draft: &ReportDraft) -> LabResult<usize> {
        let report_id = report_id.trim();
        if report_id.is_empty() {
            return Err(LabError::InvalidInput("Missing report id.".into()));
        }

        let mut tx = self.db.begin().await?;

        let outcome = async {
            let removed = sqlx::query("DELETE FROM report WHERE report_id = ?")
                .bind(report_id)
                .execute(&mut *tx)
                .await
                .map_err(LabError::transaction)?
                .rows_affected();
            let inserted = insert_items(&mut *tx, report_id, draft).await?;
            Ok::<_, LabError>((removed, inserted))
        }
        .await;

        let (removed, inserted) = finish(tx, outcome).await?;
        tracing::info!(report_id, removed, inserted, "report replaced");
        Ok(inserted)
    }

    /// Deletes every item of a report.
    pub async fn delete(&self, report_id: &str) -> LabResult<()> {
        let report_id = report_id.trim();
        let result = sqlx::query("DELETE FROM report WHERE report_id = ?")
            .bind(report_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(LabError::NotFound(
                "Report not found or already deleted".into(),
            ));
        }
        tracing::info!(report_id, items = result.rows_affected(), "report deleted");
        Ok(())
    }

    /// Items of one report in insertion order; empty when the id is unknown.
    pub async fn detail(&self, report_id: &str) -> LabResult<Vec<ReportItemDetail>> {
        let report_id = report_id.trim();
        let items = sqlx::query_as::<_, ReportItemDetail>(
            "SELECT r.id AS report_table_id, r.report_id, r.patient_id, r.doctor_id, r.test_id, r.component_id, \
                    r.test_date, r.result, r.method, r.comments AS report_item_comments, r.status, \
                    p.patients_name, p.gender, p.age_years, p.age_months, p.age_days, \
                    t.test_name, t.test_rate, \
                    c.component_name, c.specimen, c.test_unit, c.reference_range, \
                    d.doctor_name \
             FROM report r \
             JOIN patients p ON r.patient_id = p.patient_id \
             JOIN test t ON r.test_id = t.test_id \
             LEFT JOIN component c ON r.component_id = c.component_id \
             JOIN doctors d ON r.doctor_id = d.doctor_id \
             WHERE r.report_id = ? \
             ORDER BY r.id",
        )
        .bind(report_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(items)
    }

    /// Every report, newest date first.
    pub async fn list(&self) -> LabResult<Vec<ReportSummary>> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!("{LISTING_SQL} {LISTING_ORDER}"))
            .fetch_all(self.db.pool())
            .await?;
        Ok(summarise(rows))
    }

    /// Reports dated today in the server's local time zone.
    pub async fn list_today(&self) -> LabResult<Vec<ReportSummary>> {
        self.list_on(Local::now().date_naive()).await
    }

    pub async fn list_on(&self, date: NaiveDate) -> LabResult<Vec<ReportSummary>> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "{LISTING_SQL} WHERE r.test_date = ? {LISTING_ORDER}"
        ))
        .bind(date)
        .fetch_all(self.db.pool())
        .await?;
        Ok(summarise(rows))
    }
}
