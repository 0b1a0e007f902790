//! Test categories and test components.

use crate::repositories::helpers::{reference_error, unique_error};
use crate::validation::{has_text, require_fields, required_text};
use crate::{Database, LabError, LabResult};
use api_shared::{CategoryReq, ComponentReq};
use lab_types::non_blank;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A category rendered for a picker: `label` is the name, `value` the id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryOption {
    pub label: String,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Component {
    pub component_id: i64,
    pub test_id: i64,
    pub component_name: String,
    pub sub_test_name: Option<String>,
    pub specimen: Option<String>,
    pub test_unit: Option<String>,
    pub reference_range: Option<String>,
}

/// Service for categories and components.
#[derive(Clone, Debug)]
pub struct CatalogueService {
    db: Database,
}

impl CatalogueService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns every category as a `{label, value}` pair, ordered by name.
    pub async fn categories(&self) -> LabResult<Vec<CategoryOption>> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT category_id, category_name FROM category ORDER BY category_name",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(value, label)| CategoryOption { label, value })
            .collect())
    }

    pub async fn create_category(&self, req: CategoryReq) -> LabResult<i64> {
        require_fields(&[("category_name", has_text(&req.category_name))])?;
        let name = required_text("category_name", req.category_name)?;

        let result = sqlx::query("INSERT INTO category (category_name) VALUES (?)")
            .bind(name.as_str())
            .execute(self.db.pool())
            .await
            .map_err(|err| unique_error(err, "Category already exists"))?;

        let category_id = result.last_insert_rowid();
        tracing::info!(category_id, "category created");
        Ok(category_id)
    }

    pub async fn components(&self) -> LabResult<Vec<Component>> {
        let components = sqlx::query_as::<_, Component>(
            "SELECT component_id, test_id, component_name, sub_test_name, specimen, test_unit, reference_range \
             FROM component ORDER BY component_id",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(components)
    }

    /// Adds a component to an existing test.
    pub async fn create_component(&self, req: ComponentReq) -> LabResult<i64> {
        require_fields(&[
            ("test_id", req.test_id.is_some()),
            ("component_name", has_text(&req.component_name)),
        ])?;
        let Some(test_id) = req.test_id else {
            return Err(LabError::InvalidInput(
                "Missing required fields (test_id)".into(),
            ));
        };
        let component_name = required_text("component_name", req.component_name)?;

        let result = sqlx::query(
            "INSERT INTO component (test_id, component_name, sub_test_name, specimen, test_unit, reference_range) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(test_id)
        .bind(component_name.as_str())
        .bind(non_blank(req.sub_test_name))
        .bind(non_blank(req.specimen))
        .bind(non_blank(req.test_unit))
        .bind(non_blank(req.reference_range))
        .execute(self.db.pool())
        .await
        .map_err(|err| reference_error(err, "test_id does not refer to an existing test"))?;

        Ok(result.last_insert_rowid())
    }
}
