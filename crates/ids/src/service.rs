//! Identifier kinds and the [`LabId`] value type.

use crate::{IdError, IdResult};
use std::{fmt, str::FromStr};

/// Number of hex characters after the prefix separator.
const SUFFIX_LEN: usize = 6;

/// The kind of record an identifier belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IdKind {
    Patient,
    Doctor,
    Report,
}

impl IdKind {
    /// Returns the three-letter prefix for this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Patient => "PAT",
            IdKind::Doctor => "DOC",
            IdKind::Report => "REP",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdKind::Patient => "patient",
            IdKind::Doctor => "doctor",
            IdKind::Report => "report",
        };
        f.write_str(name)
    }
}

impl FromStr for IdKind {
    type Err = IdError;

    /// Accepts either the lowercase kind name (`patient`) or the prefix (`PAT`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" | "pat" => Ok(IdKind::Patient),
            "doctor" | "doc" => Ok(IdKind::Doctor),
            "report" | "rep" => Ok(IdKind::Report),
            _ => Err(IdError::UnknownKind(s.to_string())),
        }
    }
}

/// A canonical `<PREFIX>-<XXXXXX>` identifier.
///
/// Once constructed the value is guaranteed to be canonical for its kind.
///
/// # Construction
/// - [`LabId::new`] generates a fresh identifier from a random UUID.
/// - [`LabId::parse`] validates an externally supplied string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabId {
    kind: IdKind,
    value: String,
}

impl LabId {
    /// Generates a new identifier of the given kind.
    ///
    /// The suffix is the first six hex digits of a v4 UUID, uppercased.
    pub fn new(kind: IdKind) -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        let suffix = uuid[..SUFFIX_LEN].to_ascii_uppercase();
        Self {
            kind,
            value: format!("{}-{}", kind.prefix(), suffix),
        }
    }

    /// Validates and wraps an identifier that must already be canonical for `kind`.
    ///
    /// Lowercase suffixes, foreign prefixes and wrong lengths are rejected rather than
    /// normalised, so a stored identifier always round-trips byte for byte.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not canonical.
    pub fn parse(kind: IdKind, input: &str) -> IdResult<Self> {
        if Self::is_canonical(kind, input) {
            return Ok(Self {
                kind,
                value: input.to_string(),
            });
        }
        Err(IdError::InvalidInput(format!(
            "expected {}-XXXXXX with 6 uppercase hex characters, got: '{}'",
            kind.prefix(),
            input
        )))
    }

    /// Returns true if `input` is a canonical identifier of `kind`.
    pub fn is_canonical(kind: IdKind, input: &str) -> bool {
        let Some((prefix, suffix)) = input.split_once('-') else {
            return false;
        };
        prefix == kind.prefix()
            && suffix.len() == SUFFIX_LEN
            && suffix
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F'))
    }

    pub fn kind(&self) -> IdKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for LabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for LabId {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl From<LabId> for String {
    fn from(id: LabId) -> Self {
        id.value
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for LabId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}
