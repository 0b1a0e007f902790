/// Errors produced by the lab core.
///
/// Variants line up with how the HTTP layer reports them: validation and bad credentials (400),
/// missing rows (404), conflicts (409), and everything touching the store (500).
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid username or password")]
    InvalidCredentials,

    /// A failure inside a multi-statement write; the transaction has been rolled back.
    #[error("{0}")]
    Transaction(#[source] sqlx::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Id(#[from] lab_ids::IdError),
    #[error("password hashing task failed: {0}")]
    Hashing(#[from] tokio::task::JoinError),
}

pub type LabResult<T> = std::result::Result<T, LabError>;

impl LabError {
    /// Wraps a store error raised inside a report write.
    pub(crate) fn transaction(err: sqlx::Error) -> Self {
        LabError::Transaction(err)
    }
}

/// True when `err` is a UNIQUE or PRIMARY KEY constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}

/// True when `err` is a FOREIGN KEY constraint violation.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation)
    )
}
