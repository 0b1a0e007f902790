//! Shared repository utilities.

use crate::constants::MAX_ID_ATTEMPTS;
use crate::error::{is_foreign_key_violation, is_unique_violation};
use crate::{LabError, LabResult};
use lab_ids::{IdKind, LabId};
use sqlx::SqliteConnection;

fn exists_sql(kind: IdKind) -> &'static str {
    match kind {
        IdKind::Patient => "SELECT 1 FROM patients WHERE patient_id = ?",
        IdKind::Doctor => "SELECT 1 FROM doctors WHERE doctor_id = ?",
        IdKind::Report => "SELECT 1 FROM report WHERE report_id = ? LIMIT 1",
    }
}

/// Allocates an identifier that is not yet present in the store.
///
/// Candidates come from `id_source`. A candidate already in use is discarded and a new one
/// drawn, up to [`MAX_ID_ATTEMPTS`] times.
///
/// # Errors
///
/// Returns [`LabError::Conflict`] if every attempt collided, or a database error if the
/// existence check fails.
pub(crate) async fn allocate_id(
    conn: &mut SqliteConnection,
    kind: IdKind,
    mut id_source: impl FnMut() -> LabId,
) -> LabResult<LabId> {
    for _attempt in 0..MAX_ID_ATTEMPTS {
        let candidate = id_source();
        let taken: Option<i64> = sqlx::query_scalar(exists_sql(kind))
            .bind(candidate.as_str())
            .fetch_optional(&mut *conn)
            .await?;

        if taken.is_none() {
            return Ok(candidate);
        }
        tracing::warn!(id = %candidate, "generated {kind} id already in use, re-rolling");
    }

    Err(LabError::Conflict(format!(
        "Could not allocate a unique {kind} ID after {MAX_ID_ATTEMPTS} attempts"
    )))
}

/// Maps a failed single-row delete: rows still referenced elsewhere become a conflict.
pub(crate) fn delete_error(err: sqlx::Error, what: &str) -> LabError {
    if is_foreign_key_violation(&err) {
        LabError::Conflict(format!(
            "{what} is still referenced by other records (reports, tests or components)"
        ))
    } else {
        LabError::Database(err)
    }
}

/// Maps a failed insert/update where a unique key may clash.
pub(crate) fn unique_error(err: sqlx::Error, message: &str) -> LabError {
    if is_unique_violation(&err) {
        LabError::Conflict(message.to_string())
    } else {
        LabError::Database(err)
    }
}

/// Maps a failed insert/update where a referenced row may be missing.
pub(crate) fn reference_error(err: sqlx::Error, message: &str) -> LabError {
    if is_foreign_key_violation(&err) {
        LabError::InvalidInput(message.to_string())
    } else {
        LabError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_allocate_id_returns_first_free_candidate() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let id = allocate_id(&mut *conn, IdKind::Patient, || {
            LabId::parse(IdKind::Patient, "PAT-000001").unwrap()
        })
        .await
        .expect("allocation should succeed");

        assert_eq!(id.as_str(), "PAT-000001");
    }

    #[tokio::test]
    async fn test_allocate_id_rerolls_on_collision() {
        let db = Database::connect_in_memory().await.unwrap();
        sqlx::query("INSERT INTO doctors (doctor_id, doctor_name, clinic_name) VALUES ('DOC-AAAAAA', 'Dr A', 'Clinic')")
            .execute(db.pool())
            .await
            .unwrap();

        let mut candidates = vec!["DOC-BBBBBB", "DOC-AAAAAA"];
        let mut drawn = 0;
        let mut conn = db.pool().acquire().await.unwrap();
        let id = allocate_id(&mut *conn, IdKind::Doctor, || {
            drawn += 1;
            LabId::parse(IdKind::Doctor, candidates.pop().unwrap()).unwrap()
        })
        .await
        .expect("second candidate is free");

        assert_eq!(id.as_str(), "DOC-BBBBBB");
        assert_eq!(drawn, 2, "colliding candidate should be re-rolled once");
    }

    #[tokio::test]
    async fn test_allocate_id_gives_up_with_conflict() {
        let db = Database::connect_in_memory().await.unwrap();
        sqlx::query("INSERT INTO doctors (doctor_id, doctor_name, clinic_name) VALUES ('DOC-AAAAAA', 'Dr A', 'Clinic')")
            .execute(db.pool())
            .await
            .unwrap();

        let mut drawn = 0;
        let mut conn = db.pool().acquire().await.unwrap();
        let err = allocate_id(&mut *conn, IdKind::Doctor, || {
            drawn += 1;
            LabId::parse(IdKind::Doctor, "DOC-AAAAAA").unwrap()
        })
        .await
        .expect_err("every candidate collides");

        assert!(matches!(err, LabError::Conflict(_)));
        assert_eq!(drawn, MAX_ID_ATTEMPTS);
    }
}
