//! # Document Identity
//!
//! [`DocumentId`] names a compliance document and doubles as the last
//! segment of its content key, so its alphabet is restricted to characters
//! that are safe in a file name on every platform: ASCII alphanumerics,
//! `-`, `_` and `.` (not leading), at most 128 characters.
//!
//! Fresh ids come from an [`IdGenerator`]; production uses random UUIDs,
//! tests use [`SequentialIds`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SspError;

const MAX_DOCUMENT_ID_LEN: usize = 128;

/// Identifier of a compliance document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocumentId(String);

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl DocumentId {
    /// Validate and wrap a caller-supplied id.
    ///
    /// # Errors
    ///
    /// [`SspError::InvalidDocumentId`] if the id is empty, too long, starts
    /// with `.`, or contains characters outside `[A-Za-z0-9._-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, SspError> {
        let s = value.into();
        let valid = !s.is_empty()
            && s.len() <= MAX_DOCUMENT_ID_LEN
            && !s.starts_with('.')
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if valid {
            Ok(Self(s))
        } else {
            Err(SspError::InvalidDocumentId { input: s })
        }
    }

    /// Wrap a UUID (always valid).
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id.to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = SspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Source of fresh document ids.
pub trait IdGenerator: Send + Sync {
    /// A new id, distinct from every id this generator returned before.
    fn next_id(&self) -> DocumentId;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> DocumentId {
        DocumentId::from_uuid(Uuid::new_v4())
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... for deterministic tests.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    /// Generator producing `<prefix>-<n>` starting at 1.
    ///
    /// The prefix is expected to be a valid id fragment; invalid characters
    /// are replaced with `-`.
    pub fn new(prefix: &str) -> Self {
        let prefix = prefix
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
            .collect();
        Self {
            prefix,
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> DocumentId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        DocumentId(format!("{}-{n}", self.prefix))
    }
}
