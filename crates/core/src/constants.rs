//! Constants used throughout the lab core crate.

/// Default database location when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://lab.db";

/// Default capacity of the connection pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default time to wait for a pooled connection before giving up.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Method recorded for a report item when the request does not name one.
pub const DEFAULT_ITEM_METHOD: &str = "N/A";

/// How many times a generated identifier is re-rolled after colliding with a stored one.
pub const MAX_ID_ATTEMPTS: usize = 5;

/// Separator used when joining a report's test names for listings.
pub const TEST_NAME_SEPARATOR: &str = ", ";
