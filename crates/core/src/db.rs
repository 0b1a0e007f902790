//! Connection pool, migrations and transaction scoping.
//!
//! [`Database`] is created once at startup and cloned into every service; clones share one
//! bounded pool. Each query borrows a connection for its own duration and hands it back on every
//! exit path.
//!
//! Multi-statement writes go through [`Database::begin`] and [`finish`]: the caller runs its
//! statements against the transaction, then `finish` commits on `Ok` and rolls back on `Err`.
//! A transaction that is dropped without reaching `finish` (panic, early `?`) is rolled back by
//! sqlx.
//!
//! Transactions open with `BEGIN IMMEDIATE`, taking the write lock up front. Two deferred
//! transactions that both read before writing cannot upgrade their locks, and SQLite fails one of
//! them with `SQLITE_BUSY` at once instead of waiting out the busy timeout.

use crate::config::CoreConfig;
use crate::{LabError, LabResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Handle to the relational store.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool described by `cfg`, creating the database file if needed.
    ///
    /// Migrations are not applied here; call [`Database::migrate`].
    pub async fn connect(cfg: &CoreConfig) -> LabResult<Self> {
        let options = SqliteConnectOptions::from_str(cfg.database_url())?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(cfg.acquire_timeout());

        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections())
            .acquire_timeout(cfg.acquire_timeout())
            .connect_with(options)
            .await?;

        tracing::info!(
            max_connections = cfg.max_connections(),
            "database pool ready"
        );
        Ok(Self { pool })
    }

    /// Opens a migrated in-memory database (for tests and throwaway runs).
    ///
    /// The pool holds exactly one long-lived connection, because every SQLite in-memory
    /// connection is its own database.
    pub async fn connect_in_memory() -> LabResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Applies any pending embedded migrations.
    pub async fn migrate(&self) -> LabResult<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts a write transaction on a pooled connection, holding the write lock from the start.
    pub async fn begin(&self) -> LabResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(LabError::transaction)
    }

    /// Round-trips a trivial query to check the store is reachable.
    pub async fn ping(&self) -> LabResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Commits `tx` if `outcome` is `Ok`, otherwise rolls it back and returns the original error.
pub async fn finish<T>(tx: Transaction<'_, Sqlite>, outcome: LabResult<T>) -> LabResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await.map_err(LabError::transaction)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("rollback failed after {err}: {rollback_err}");
            }
            Err(err)
        }
    }
}
