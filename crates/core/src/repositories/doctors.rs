//! Referring doctors.

use crate::repositories::helpers::{allocate_id, delete_error, unique_error};
use crate::validation::{has_text, require_fields, required_text};
use crate::{Database, LabError, LabResult, NonEmptyText};
use api_shared::DoctorReq;
use lab_ids::{IdKind, LabId};
use lab_types::non_blank;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored doctor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Doctor {
    pub doctor_id: String,
    pub doctor_name: String,
    pub clinic_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub commission: Option<f64>,
    pub address: Option<String>,
    pub paid_commission: f64,
}

struct DoctorFields {
    doctor_name: NonEmptyText,
    clinic_name: NonEmptyText,
    email: Option<String>,
    phone_number: Option<String>,
    commission: Option<f64>,
    address: Option<String>,
    paid_commission: f64,
}

impl DoctorFields {
    fn from_request(req: DoctorReq) -> LabResult<Self> {
        require_fields(&[
            ("doctor_name", has_text(&req.doctor_name)),
            ("clinic_name", has_text(&req.clinic_name)),
        ])?;

        Ok(Self {
            doctor_name: required_text("doctor_name", req.doctor_name)?,
            clinic_name: required_text("clinic_name", req.clinic_name)?,
            email: non_blank(req.email),
            phone_number: non_blank(req.phone_number),
            commission: req.commission,
            address: non_blank(req.address),
            paid_commission: req.paid_commission.unwrap_or(0.0),
        })
    }
}

/// Service for doctor persistence.
#[derive(Clone, Debug)]
pub struct DoctorService {
    db: Database,
}

impl DoctorService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> LabResult<Vec<Doctor>> {
        let doctors = sqlx::query_as::<_, Doctor>(
            "SELECT doctor_id, doctor_name, clinic_name, email, phone_number, commission, address, paid_commission \
             FROM doctors ORDER BY doctor_name, doctor_id",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(doctors)
    }

    /// Creates a doctor under a freshly generated `DOC-` identifier.
    ///
    /// `paid_commission` is stored as 0 when absent.
    pub async fn create(&self, req: DoctorReq) -> LabResult<LabId> {
        let fields = DoctorFields::from_request(req)?;
        let mut conn = self.db.pool().acquire().await?;
        let doctor_id =
            allocate_id(&mut *conn, IdKind::Doctor, || LabId::new(IdKind::Doctor)).await?;

        sqlx::query(
            "INSERT INTO doctors (doctor_id, doctor_name, clinic_name, email, phone_number, commission, address, paid_commission) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(doctor_id.as_str())
        .bind(fields.doctor_name.as_str())
        .bind(fields.clinic_name.as_str())
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(fields.commission)
        .bind(&fields.address)
        .bind(fields.paid_commission)
        .execute(&mut *conn)
        .await
        .map_err(|err| unique_error(err, "Doctor ID already exists"))?;

        tracing::info!(doctor_id = %doctor_id, "doctor created");
        Ok(doctor_id)
    }

    pub async fn update(&self, doctor_id: &str, req: DoctorReq) -> LabResult<()> {
        let fields = DoctorFields::from_request(req)?;

        let result = sqlx::query(
            "UPDATE doctors SET doctor_name = ?, clinic_name = ?, email = ?, phone_number = ?, commission = ?, \
                    address = ?, paid_commission = ? \
             WHERE doctor_id = ?",
        )
        .bind(fields.doctor_name.as_str())
        .bind(fields.clinic_name.as_str())
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(fields.commission)
        .bind(&fields.address)
        .bind(fields.paid_commission)
        .bind(doctor_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(LabError::NotFound("Doctor not found".into()));
        }
        Ok(())
    }

    /// Deletes a doctor that no report references.
    pub async fn delete(&self, doctor_id: &str) -> LabResult<()> {
        let result = sqlx::query("DELETE FROM doctors WHERE doctor_id = ?")
            .bind(doctor_id)
            .execute(self.db.pool())
            .await
            .map_err(|err| delete_error(err, "Doctor"))?;

        if result.rows_affected() == 0 {
            return Err(LabError::NotFound("Doctor not found".into()));
        }
        tracing::info!(doctor_id, "doctor deleted");
        Ok(())
    }
}
