//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{
    DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS,
};
use crate::{LabError, LabResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_url: String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`LabError::InvalidConfig`] if the URL is blank or the pool capacity is zero.
    pub fn new(
        database_url: String,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> LabResult<Self> {
        if database_url.trim().is_empty() {
            return Err(LabError::InvalidConfig(
                "database_url cannot be empty".into(),
            ));
        }
        if max_connections == 0 {
            return Err(LabError::InvalidConfig(
                "max_connections must be at least 1".into(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout,
        })
    }

    /// Builds a configuration from raw (optional) environment values.
    ///
    /// Missing or blank values fall back to the defaults in [`crate::constants`].
    pub fn from_env_values(
        database_url: Option<String>,
        max_connections: Option<String>,
        acquire_timeout_secs: Option<String>,
    ) -> LabResult<Self> {
        let database_url = database_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let max_connections = parse_or_default(
            "LAB_DB_MAX_CONNECTIONS",
            max_connections,
            DEFAULT_MAX_CONNECTIONS,
        )?;
        let acquire_timeout_secs = parse_or_default(
            "LAB_DB_ACQUIRE_TIMEOUT_SECS",
            acquire_timeout_secs,
            DEFAULT_ACQUIRE_TIMEOUT_SECS,
        )?;

        Self::new(
            database_url,
            max_connections,
            Duration::from_secs(acquire_timeout_secs),
        )
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    pub fn acquire_timeout(&self) -> Duration {
        self.acquire_timeout
    }
}

fn parse_or_default<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
    default: T,
) -> LabResult<T> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| LabError::InvalidConfig(format!("{name} is not a valid number: '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_values_uses_defaults() {
        let cfg = CoreConfig::from_env_values(None, None, None).expect("defaults are valid");
        assert_eq!(cfg.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(cfg.max_connections(), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(
            cfg.acquire_timeout(),
            Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_from_env_values_parses_overrides() {
        let cfg = CoreConfig::from_env_values(
            Some("sqlite://other.db".into()),
            Some(" 4 ".into()),
            Some("5".into()),
        )
        .expect("overrides are valid");
        assert_eq!(cfg.database_url(), "sqlite://other.db");
        assert_eq!(cfg.max_connections(), 4);
        assert_eq!(cfg.acquire_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let cfg = CoreConfig::from_env_values(Some("  ".into()), Some("".into()), None).unwrap();
        assert_eq!(cfg.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(cfg.max_connections(), DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_rejects_zero_pool_capacity() {
        let err = CoreConfig::from_env_values(None, Some("0".into()), None)
            .expect_err("zero connections is invalid");
        assert!(matches!(err, LabError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_non_numeric_pool_capacity() {
        let err = CoreConfig::from_env_values(None, Some("ten".into()), None)
            .expect_err("non-numeric capacity is invalid");
        match err {
            LabError::InvalidConfig(msg) => assert!(msg.contains("LAB_DB_MAX_CONNECTIONS")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
