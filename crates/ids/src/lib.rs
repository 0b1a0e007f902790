//! Human-readable record identifiers.
//!
//! Patients, doctors and reports are keyed by short identifiers of the form
//! `<PREFIX>-<XXXXXX>` where the suffix is six uppercase hexadecimal characters taken from a
//! random v4 UUID.
//!
//! | Kind    | Prefix | Example      |
//! |---------|--------|--------------|
//! | Patient | `PAT`  | `PAT-1A2B3C` |
//! | Doctor  | `DOC`  | `DOC-A1B2C3` |
//! | Report  | `REP`  | `REP-0F9E8D` |
//!
//! Six hex characters give roughly 16.7 million values per kind, so collisions are unlikely
//! but possible. This crate makes no uniqueness promise: callers that persist identifiers are
//! expected to check the store and re-roll (see `lab-core`'s allocation helper).
//!
//! Externally supplied identifiers can be validated with [`LabId::parse`], which accepts the
//! canonical form only (uppercase suffix, correct prefix, correct length).

mod service;

pub use service::{IdKind, LabId};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Input is not a canonical identifier of the requested kind.
    #[error("Invalid identifier: {0}")]
    InvalidInput(String),
    /// Unknown identifier kind name.
    #[error("Unknown identifier kind: '{0}'")]
    UnknownKind(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
