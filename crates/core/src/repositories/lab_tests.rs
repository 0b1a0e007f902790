//! Test catalogue: the billable tests a report item refers to.

use crate::repositories::helpers::{delete_error, reference_error};
use crate::validation::{has_text, require_fields, required_text};
use crate::{Database, LabError, LabResult, NonEmptyText};
use api_shared::TestReq;
use lab_types::non_blank;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const DUPLICATE_TEST: &str = "Test name or code might already exist for this category.";
const UNKNOWN_CATEGORY: &str = "category_id does not refer to an existing category";

/// A stored test, with the first of its components if it has any.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LabTest {
    pub test_id: i64,
    pub test_name: String,
    pub test_rate: f64,
    pub report_heading: Option<String>,
    pub test_code: Option<String>,
    pub method: Option<String>,
    pub comments: Option<String>,
    pub category_id: i64,
    /// Lowest `component_id` belonging to this test.
    pub default_component_id: Option<i64>,
}

struct TestFields {
    test_name: NonEmptyText,
    test_rate: f64,
    report_heading: Option<String>,
    test_code: Option<String>,
    method: Option<String>,
    comments: Option<String>,
    category_id: i64,
}

impl TestFields {
    fn from_request(req: TestReq) -> LabResult<Self> {
        require_fields(&[
            ("test_name", has_text(&req.test_name)),
            ("test_rate", req.test_rate.is_some()),
            ("category_id", req.category_id.is_some()),
        ])?;

        let (Some(test_rate), Some(category_id)) = (req.test_rate, req.category_id) else {
            return Err(LabError::InvalidInput(
                "Missing required fields (test_rate, category_id)".into(),
            ));
        };

        Ok(Self {
            test_name: required_text("test_name", req.test_name)?,
            test_rate,
            report_heading: non_blank(req.report_heading),
            test_code: non_blank(req.test_code),
            method: non_blank(req.method),
            comments: non_blank(req.comments),
            category_id,
        })
    }
}

/// Maps a write failure on `test` to a conflict (duplicate code) or a bad category reference.
fn write_error(err: sqlx::Error) -> LabError {
    if crate::error::is_unique_violation(&err) {
        LabError::Conflict(DUPLICATE_TEST.into())
    } else {
        reference_error(err, UNKNOWN_CATEGORY)
    }
}

/// Service for test catalogue persistence.
#[derive(Clone, Debug)]
pub struct LabTestService {
    db: Database,
}

impl LabTestService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> LabResult<Vec<LabTest>> {
        let tests = sqlx::query_as::<_, LabTest>(
            "SELECT t.test_id, t.test_name, t.test_rate, t.report_heading, t.test_code, t.method, t.comments, t.category_id, \
                    (SELECT c.component_id FROM component c WHERE c.test_id = t.test_id \
                     ORDER BY c.component_id LIMIT 1) AS default_component_id \
             FROM test t ORDER BY t.test_id",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(tests)
    }

    /// Adds a test and returns its generated id.
    ///
    /// # Errors
    ///
    /// - [`LabError::InvalidInput`] for missing fields or an unknown category
    /// - [`LabError::Conflict`] if the category already has a test with this code
    pub async fn create(&self, req: TestReq) -> LabResult<i64> {
        let fields = TestFields::from_request(req)?;

        let result = sqlx::query(
            "INSERT INTO test (test_name, test_rate, report_heading, test_code, method, comments, category_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(fields.test_name.as_str())
        .bind(fields.test_rate)
        .bind(&fields.report_heading)
        .bind(&fields.test_code)
        .bind(&fields.method)
        .bind(&fields.comments)
        .bind(fields.category_id)
        .execute(self.db.pool())
        .await
        .map_err(write_error)?;

        let test_id = result.last_insert_rowid();
        tracing::info!(test_id, "test created");
        Ok(test_id)
    }

    pub async fn update(&self, test_id: i64, req: TestReq) -> LabResult<()> {
        let fields = TestFields::from_request(req)?;

        let result = sqlx::query(
            "UPDATE test SET test_name = ?, test_rate = ?, report_heading = ?, test_code = ?, method = ?, \
                    comments = ?, category_id = ? \
             WHERE test_id = ?",
        )
        .bind(fields.test_name.as_str())
        .bind(fields.test_rate)
        .bind(&fields.report_heading)
        .bind(&fields.test_code)
        .bind(&fields.method)
        .bind(&fields.comments)
        .bind(fields.category_id)
        .bind(test_id)
        .execute(self.db.pool())
        .await
        .map_err(write_error)?;

        if result.rows_affected() == 0 {
            return Err(LabError::NotFound("Test not found".into()));
        }
        Ok(())
    }

    /// Deletes a test that no component or report references.
    pub async fn delete(&self, test_id: i64) -> LabResult<()> {
        let result = sqlx::query("DELETE FROM test WHERE test_id = ?")
            .bind(test_id)
            .execute(self.db.pool())
            .await
            .map_err(|err| delete_error(err, "Test"))?;

        if result.rows_affected() == 0 {
            return Err(LabError::NotFound("Test not found".into()));
        }
        tracing::info!(test_id, "test deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;

    fn lipid(category_id: i64, code: &str) -> TestReq {
        TestReq {
            test_name: Some("Lipid Profile".into()),
            test_rate: Some(850.0),
            test_code: Some(code.into()),
            category_id: Some(category_id),
            ..Default::default()
        }
    }

    async fn category_id(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT category_id FROM category LIMIT 1")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_includes_default_component() {
        let (db, seed) = fixtures::seeded().await;
        let service = LabTestService::new(db);

        let tests = service.list().await.expect("list should succeed");
        let cbc = tests.iter().find(|t| t.test_id == seed.cbc).unwrap();
        let glucose = tests.iter().find(|t| t.test_id == seed.glucose).unwrap();

        assert_eq!(cbc.default_component_id, Some(seed.haemoglobin));
        assert_eq!(glucose.default_component_id, None);
        assert_eq!(glucose.test_rate, 120.5);
    }

    #[tokio::test]
    async fn test_create_returns_id_and_rejects_duplicate_code() {
        let (db, _) = fixtures::seeded().await;
        let category = category_id(&db).await;
        let service = LabTestService::new(db);

        let id = service
            .create(lipid(category, "LIP01"))
            .await
            .expect("create should succeed");
        assert!(service.list().await.unwrap().iter().any(|t| t.test_id == id));

        let err = service
            .create(lipid(category, "LIP01"))
            .await
            .expect_err("duplicate code should fail");
        assert!(matches!(err, LabError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = LabTestService::new(db);

        let err = service
            .create(lipid(42, "LIP01"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, LabError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_create_lists_missing_fields() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = LabTestService::new(db);

        let err = service
            .create(TestReq {
                test_name: Some("Urine Routine".into()),
                ..Default::default()
            })
            .await
            .expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "Missing required fields (test_rate, category_id)"
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown() {
        let (db, seed) = fixtures::seeded().await;
        let category = category_id(&db).await;
        let service = LabTestService::new(db);

        service
            .update(seed.glucose, lipid(category, "GLU02"))
            .await
            .expect("update should succeed");

        let err = service
            .update(9999, lipid(category, "X"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, LabError::NotFound(_)));

        let err = service.delete(9999).await.expect_err("should fail");
        assert!(matches!(err, LabError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_test_with_components_conflicts() {
        let (db, seed) = fixtures::seeded().await;
        let service = LabTestService::new(db);

        let err = service.delete(seed.cbc).await.expect_err("should fail");
        assert!(matches!(err, LabError::Conflict(_)));

        service
            .delete(seed.glucose)
            .await
            .expect("unreferenced test should delete");
    }
}
