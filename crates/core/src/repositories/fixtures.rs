//! Seed data shared by repository tests.

use crate::Database;

pub(crate) const PATIENT_ID: &str = "PAT-000001";
pub(crate) const DOCTOR_ID: &str = "DOC-000001";

/// Test ids seeded by [`seeded`].
pub(crate) struct Seed {
    pub cbc: i64,
    pub glucose: i64,
    pub haemoglobin: i64,
}

/// An in-memory database holding the rows inserted by [`seed`].
pub(crate) async fn seeded() -> (Database, Seed) {
    let db = Database::connect_in_memory()
        .await
        .expect("in-memory database should open");
    let seed = seed(&db).await;
    (db, seed)
}

/// Inserts one category, two tests (CBC with a Haemoglobin component, and Glucose), one patient
/// and one doctor into a migrated database.
pub(crate) async fn seed(db: &Database) -> Seed {
    let pool = db.pool();

    let category: i64 = sqlx::query_scalar(
        "INSERT INTO category (category_name) VALUES ('Haematology') RETURNING category_id",
    )
    .fetch_one(pool)
    .await
    .expect("category insert should succeed");

    let cbc: i64 = sqlx::query_scalar(
        "INSERT INTO test (test_name, test_rate, test_code, category_id) VALUES ('CBC', 300, 'CBC01', ?) RETURNING test_id",
    )
    .bind(category)
    .fetch_one(pool)
    .await
    .expect("test insert should succeed");

    let glucose: i64 = sqlx::query_scalar(
        "INSERT INTO test (test_name, test_rate, test_code, category_id) VALUES ('Glucose', 120.5, 'GLU01', ?) RETURNING test_id",
    )
    .bind(category)
    .fetch_one(pool)
    .await
    .expect("test insert should succeed");

    let haemoglobin: i64 = sqlx::query_scalar(
        "INSERT INTO component (test_id, component_name, specimen, test_unit, reference_range) VALUES (?, 'Haemoglobin', 'Blood', 'g/dL', '12-16') RETURNING component_id",
    )
    .bind(cbc)
    .fetch_one(pool)
    .await
    .expect("component insert should succeed");

    sqlx::query("INSERT INTO patients (patient_id, patients_name, gender, age_years) VALUES (?, 'Jane Doe', 'Female', 34)")
        .bind(PATIENT_ID)
        .execute(pool)
        .await
        .expect("patient insert should succeed");

    sqlx::query("INSERT INTO doctors (doctor_id, doctor_name, clinic_name) VALUES (?, 'Dr Rao', 'City Clinic')")
        .bind(DOCTOR_ID)
        .execute(pool)
        .await
        .expect("doctor insert should succeed");

    Seed {
        cbc,
        glucose,
        haemoglobin,
    }
}
