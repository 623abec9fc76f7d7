//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error taxonomy shared by every crate in the SSP Stack. All
//! errors use `thiserror` for derive-based `Display` and `Error`.
//!
//! ## Design
//!
//! - Every variant is terminal for the operation that raised it. Nothing
//!   in the core retries; retry policy belongs to the caller.
//! - Every variant carries the offending input, document id or control id
//!   so a caller can act on it without re-deriving context.
//! - Parsing failures never substitute a default value.

use std::time::Duration;

use thiserror::Error;

use crate::domain::{ProfileKind, Tier};

/// Convenience alias used by all `ssp-*` library crates.
pub type SspResult<T> = Result<T, SspError>;

/// Top-level error type for the SSP Stack.
#[derive(Error, Debug)]
pub enum SspError {
    /// No identifier grammar matched the input.
    #[error("malformed control identifier: {input:?}")]
    MalformedIdentifier {
        /// The text exactly as supplied.
        input: String,
    },

    /// The identifier is well-formed but absent from the catalog.
    #[error("control {id} not found in catalog")]
    ControlNotFound {
        /// Canonical rendering of the requested control.
        id: String,
    },

    /// No profile document maps to the requested tier and kind.
    #[error("no {kind} profile found for tier {tier}")]
    ProfileNotFound {
        /// Requested tier.
        tier: Tier,
        /// Requested profile kind.
        kind: ProfileKind,
    },

    /// Strict profile matching found more than one candidate document.
    #[error("{} {kind} profiles match tier {tier}: {}", .candidates.len(), .candidates.join(", "))]
    AmbiguousProfile {
        /// Requested tier.
        tier: Tier,
        /// Requested profile kind.
        kind: ProfileKind,
        /// Every matching document key.
        candidates: Vec<String>,
    },

    /// A profile document was found but yields zero control identifiers.
    #[error("profile {key} specifies no controls")]
    EmptyProfile {
        /// Content key of the profile document.
        key: String,
    },

    /// A profile document could not be parsed or its imports are cyclic.
    #[error("invalid profile {key}: {reason}")]
    InvalidProfile {
        /// Content key of the profile document.
        key: String,
        /// Parser or import-walk diagnostic.
        reason: String,
    },

    /// Tier text is not one of LOW, MODERATE, HIGH.
    #[error("invalid tier {input:?}: expected LOW, MODERATE or HIGH")]
    InvalidTier {
        /// The text exactly as supplied.
        input: String,
    },

    /// Profile kind text is not `standard` or `agency-specific`.
    #[error("invalid profile kind {input:?}: expected standard or agency-specific")]
    InvalidProfileKind {
        /// The text exactly as supplied.
        input: String,
    },

    /// Status text is not a recognized implementation status.
    #[error("invalid implementation status {input:?}")]
    InvalidStatus {
        /// The text exactly as supplied.
        input: String,
    },

    /// A caller-supplied document id is not usable as a content key.
    #[error("invalid document id {input:?}")]
    InvalidDocumentId {
        /// The text exactly as supplied.
        input: String,
    },

    /// No persisted document has this id.
    #[error("document {id} not found")]
    DocumentNotFound {
        /// Requested document id.
        id: String,
    },

    /// A document with this id already exists.
    #[error("document {id} already exists")]
    DocumentExists {
        /// Conflicting document id.
        id: String,
    },

    /// The document has no implementation record for this control.
    #[error("document {document_id} has no implementation for {control_id}")]
    ImplementationNotFound {
        /// Document that was searched.
        document_id: String,
        /// Canonical rendering of the requested control.
        control_id: String,
    },

    /// The content store failed, timed out or is unreachable.
    #[error("storage unavailable for {key}: {reason}")]
    StorageUnavailable {
        /// Content key of the failed operation.
        key: String,
        /// Underlying failure.
        reason: String,
    },

    /// A persisted document could not be encoded or decoded.
    #[error("serialization error for {key}: {reason}")]
    Serialization {
        /// Content key of the affected document.
        key: String,
        /// Encoder or decoder diagnostic.
        reason: String,
    },
}

/// Failure reported by a content-store collaborator.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Nothing is stored under the key.
    #[error("no content stored under {key}")]
    NotFound {
        /// Requested key.
        key: String,
    },

    /// The key is not a relative, `/`-separated path without `.`/`..` segments.
    #[error("invalid content key {key:?}")]
    InvalidKey {
        /// Offending key.
        key: String,
    },

    /// The backend failed.
    #[error("io error on {key}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The backend did not answer within the deadline.
    #[error("operation on {key} timed out after {after:?}")]
    Timeout {
        /// Key being accessed.
        key: String,
        /// Deadline that elapsed.
        after: Duration,
    },

    /// Too many earlier calls are still running against the backend.
    #[error("storage busy on {key}: {limit} calls already in flight")]
    Saturated {
        /// Key being accessed.
        key: String,
        /// Configured in-flight limit.
        limit: usize,
    },
}

impl StorageError {
    /// Key the failed operation addressed.
    pub fn key(&self) -> &str {
        match self {
            Self::NotFound { key }
            | Self::InvalidKey { key }
            | Self::Io { key, .. }
            | Self::Timeout { key, .. }
            | Self::Saturated { key, .. } => key,
        }
    }

    /// Whether the failure means the key is simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StorageError> for SspError {
    fn from(err: StorageError) -> Self {
        SspError::StorageUnavailable {
            key: err.key().to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_carry_context() {
        let err = SspError::ImplementationNotFound {
            document_id: "doc-1".into(),
            control_id: "AC-2(1)".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("doc-1"));
        assert!(msg.contains("AC-2(1)"));
    }

    #[test]
    fn test_storage_error_maps_to_unavailable() {
        let err: SspError = StorageError::Timeout {
            key: "documents/a.json".into(),
            after: Duration::from_millis(10),
        }
        .into();
        match err {
            SspError::StorageUnavailable { key, reason } => {
                assert_eq!(key, "documents/a.json");
                assert!(reason.contains("timed out"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_saturated_storage_maps_to_unavailable() {
        let err: SspError = StorageError::Saturated {
            key: "documents/a.json".into(),
            limit: 4,
        }
        .into();
        assert!(matches!(err, SspError::StorageUnavailable { ref key, .. } if key == "documents/a.json"));
        assert!(err.to_string().contains("4 calls already in flight"));
    }

    #[test]
    fn test_ambiguous_profile_lists_candidates() {
        let err = SspError::AmbiguousProfile {
            tier: Tier::Moderate,
            kind: ProfileKind::Standard,
            candidates: vec!["a_moderate.json".into(), "b_moderate.json".into()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 standard profiles match tier MODERATE"));
        assert!(msg.contains("b_moderate.json"));
    }
}
