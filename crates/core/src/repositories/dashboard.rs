//! Aggregate counts for the home screen.

use crate::{Database, LabResult};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct StatusCount {
    pub status: Option<String>,
    pub count: i64,
}

/// Dashboard figures. Report totals count distinct report ids; `reports_by_status` counts items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_reports: i64,
    pub total_patients: i64,
    pub total_doctors: i64,
    pub total_tests: i64,
    pub reports_by_status: Vec<StatusCount>,
    /// Reports dated on the summary day.
    pub recent_reports: i64,
}

#[derive(Clone, Debug)]
pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Summary with `recent_reports` counted for today (server local time).
    pub async fn summary(&self) -> LabResult<DashboardSummary> {
        self.summary_on(Local::now().date_naive()).await
    }

    pub async fn summary_on(&self, day: NaiveDate) -> LabResult<DashboardSummary> {
        let pool = self.db.pool();

        let total_reports: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT report_id) FROM report")
            .fetch_one(pool)
            .await?;
        let total_patients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
            .fetch_one(pool)
            .await?;
        let total_doctors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doctors")
            .fetch_one(pool)
            .await?;
        let total_tests: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM test")
            .fetch_one(pool)
            .await?;
        let reports_by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM report GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await?;
        let recent_reports: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT report_id) FROM report WHERE test_date = ?")
                .bind(day)
                .fetch_one(pool)
                .await?;

        Ok(DashboardSummary {
            total_reports,
            total_patients,
            total_doctors,
            total_tests,
            reports_by_status,
            recent_reports,
        })
    }
}
