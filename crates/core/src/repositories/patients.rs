//! Patient records.
//!
//! Patients are keyed by a generated `PAT-XXXXXX` identifier. Only `patients_name` and
//! `gender` are required; every other column is optional and blank strings are stored as NULL.

use crate::repositories::helpers::{allocate_id, delete_error, unique_error};
use crate::validation::{has_text, require_fields, required_text};
use crate::{Database, LabError, LabResult, NonEmptyText};
use api_shared::PatientReq;
use lab_ids::{IdKind, LabId};
use lab_types::non_blank;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Patient {
    pub patient_id: String,
    pub patient_salutation: Option<String>,
    pub patients_name: String,
    pub guardian_name: Option<String>,
    pub phone_number: Option<String>,
    pub gender: String,
    pub age_years: Option<i64>,
    pub age_months: Option<i64>,
    pub age_days: Option<i64>,
    pub alternate_phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Validated column values for an insert or update.
struct PatientFields {
    patient_salutation: Option<String>,
    patients_name: NonEmptyText,
    guardian_name: Option<String>,
    phone_number: Option<String>,
    gender: NonEmptyText,
    age_years: Option<i64>,
    age_months: Option<i64>,
    age_days: Option<i64>,
    alternate_phone_number: Option<String>,
    email: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
}

impl PatientFields {
    fn from_request(req: PatientReq) -> LabResult<Self> {
        require_fields(&[
            ("patients_name", has_text(&req.patients_name)),
            ("gender", has_text(&req.gender)),
        ])?;

        Ok(Self {
            patient_salutation: non_blank(req.patient_salutation),
            patients_name: required_text("patients_name", req.patients_name)?,
            guardian_name: non_blank(req.guardian_name),
            phone_number: non_blank(req.phone_number),
            gender: required_text("gender", req.gender)?,
            age_years: req.age_years,
            age_months: req.age_months,
            age_days: req.age_days,
            alternate_phone_number: non_blank(req.alternate_phone_number),
            email: non_blank(req.email),
            address: non_blank(req.address),
            city: non_blank(req.city),
            state: non_blank(req.state),
            zip_code: non_blank(req.zip_code),
        })
    }
}

/// Service for patient persistence.
#[derive(Clone, Debug)]
pub struct PatientService {
    db: Database,
}

impl PatientService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns every patient, ordered by name.
    pub async fn list(&self) -> LabResult<Vec<Patient>> {
        let patients = sqlx::query_as::<_, Patient>(
            "SELECT patient_id, patient_salutation, patients_name, guardian_name, phone_number, gender, \
                    age_years, age_months, age_days, alternate_phone_number, email, address, city, state, zip_code \
             FROM patients ORDER BY patients_name, patient_id",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(patients)
    }

    /// Creates a patient under a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// - [`LabError::InvalidInput`] if `patients_name` or `gender` is missing
    /// - [`LabError::Conflict`] if no free identifier could be allocated
    pub async fn create(&self, req: PatientReq) -> LabResult<LabId> {
        self.create_with(req, || LabId::new(IdKind::Patient)).await
    }

    pub(crate) async fn create_with(
        &self,
        req: PatientReq,
        id_source: impl FnMut() -> LabId,
    ) -> LabResult<LabId> {
        let fields = PatientFields::from_request(req)?;
        let mut conn = self.db.pool().acquire().await?;
        let patient_id = allocate_id(&mut *conn, IdKind::Patient, id_source).await?;

        sqlx::query(
            "INSERT INTO patients (patient_id, patient_salutation, patients_name, guardian_name, phone_number, gender, \
                                   age_years, age_months, age_days, alternate_phone_number, email, address, city, state, zip_code) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(patient_id.as_str())
        .bind(&fields.patient_salutation)
        .bind(fields.patients_name.as_str())
        .bind(&fields.guardian_name)
        .bind(&fields.phone_number)
        .bind(fields.gender.as_str())
        .bind(fields.age_years)
        .bind(fields.age_months)
        .bind(fields.age_days)
        .bind(&fields.alternate_phone_number)
        .bind(&fields.email)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.zip_code)
        .execute(&mut *conn)
        .await
        .map_err(|err| unique_error(err, "Patient ID already exists"))?;

        tracing::info!(patient_id = %patient_id, "patient created");
        Ok(patient_id)
    }

    /// Overwrites every column of an existing patient.
    pub async fn update(&self, patient_id: &str, req: PatientReq) -> LabResult<()> {
        let fields = PatientFields::from_request(req)?;

        let result = sqlx::query(
            "UPDATE patients SET patient_salutation = ?, patients_name = ?, guardian_name = ?, phone_number = ?, \
                    gender = ?, age_years = ?, age_months = ?, age_days = ?, alternate_phone_number = ?, \
                    email = ?, address = ?, city = ?, state = ?, zip_code = ? \
             WHERE patient_id = ?",
        )
        .bind(&fields.patient_salutation)
        .bind(fields.patients_name.as_str())
        .bind(&fields.guardian_name)
        .bind(&fields.phone_number)
        .bind(fields.gender.as_str())
        .bind(fields.age_years)
        .bind(fields.age_months)
        .bind(fields.age_days)
        .bind(&fields.alternate_phone_number)
        .bind(&fields.email)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.zip_code)
        .bind(patient_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(LabError::NotFound("Patient not found".into()));
        }
        Ok(())
    }

    /// Deletes a patient that no report references.
    pub async fn delete(&self, patient_id: &str) -> LabResult<()> {
        let result = sqlx::query("DELETE FROM patients WHERE patient_id = ?")
            .bind(patient_id)
            .execute(self.db.pool())
            .await
            .map_err(|err| delete_error(err, "Patient"))?;

        if result.rows_affected() == 0 {
            return Err(LabError::NotFound("Patient not found".into()));
        }
        tracing::info!(patient_id, "patient deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures::{self, DOCTOR_ID, PATIENT_ID};

    fn jane() -> PatientReq {
        PatientReq {
            patients_name: Some("Jane Doe".into()),
            gender: Some("Female".into()),
            email: Some("  ".into()),
            age_years: Some(34),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = PatientService::new(db);

        let id = service.create(jane()).await.expect("create should succeed");
        assert!(LabId::is_canonical(IdKind::Patient, id.as_str()));

        let patients = service.list().await.expect("list should succeed");
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].patient_id, id.as_str());
        assert_eq!(patients[0].patients_name, "Jane Doe");
        assert_eq!(patients[0].email, None, "blank email should be stored as NULL");
        assert_eq!(patients[0].age_years, Some(34));
    }

    #[tokio::test]
    async fn test_create_requires_name_and_gender() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = PatientService::new(db);

        let err = service
            .create(PatientReq::default())
            .await
            .expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "Missing required fields (patients_name, gender)"
        );
    }

    #[tokio::test]
    async fn test_create_rerolls_colliding_id() {
        let (db, _) = fixtures::seeded().await;
        let service = PatientService::new(db);

        let mut candidates = vec!["PAT-00000A", PATIENT_ID];
        let id = service
            .create_with(jane(), || {
                LabId::parse(IdKind::Patient, candidates.pop().unwrap()).unwrap()
            })
            .await
            .expect("create should succeed");

        assert_eq!(id.as_str(), "PAT-00000A");
    }

    #[tokio::test]
    async fn test_update_unknown_patient_is_not_found() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = PatientService::new(db);

        let err = service
            .update("PAT-FFFFFF", jane())
            .await
            .expect_err("should fail");
        assert!(matches!(err, LabError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_overwrites_columns() {
        let (db, _) = fixtures::seeded().await;
        let service = PatientService::new(db);

        let mut req = jane();
        req.patients_name = Some("Jane Smith".into());
        req.city = Some("Pune".into());
        service
            .update(PATIENT_ID, req)
            .await
            .expect("update should succeed");

        let patients = service.list().await.unwrap();
        assert_eq!(patients[0].patients_name, "Jane Smith");
        assert_eq!(patients[0].city.as_deref(), Some("Pune"));
    }

    #[tokio::test]
    async fn test_delete_unknown_and_referenced() {
        let (db, seed) = fixtures::seeded().await;
        let service = PatientService::new(db.clone());

        let err = service.delete("PAT-FFFFFF").await.expect_err("should fail");
        assert!(matches!(err, LabError::NotFound(_)));

        sqlx::query("INSERT INTO report (report_id, patient_id, doctor_id, test_id, test_date) VALUES ('REP-000001', ?, ?, ?, '2024-05-01')")
            .bind(PATIENT_ID)
            .bind(DOCTOR_ID)
            .bind(seed.cbc)
            .execute(db.pool())
            .await
            .unwrap();

        let err = service.delete(PATIENT_ID).await.expect_err("should fail");
        assert!(matches!(err, LabError::Conflict(_)));
    }
}
