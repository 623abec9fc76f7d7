//! # Compliance Document Model
//!
//! [`ComplianceDocument`] is the persisted unit. Its implementation records
//! are kept sorted by canonical control id with at most one record per id,
//! so the serialized form is stable and a lookup is a binary search.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use ssp_core::{ControlId, DocumentId, ImplementationStatus, ProfileKind, Tier, Timestamp};

/// Key prefix under which documents are persisted.
pub const DOCUMENT_PREFIX: &str = "documents/";

/// Lifecycle label given to new documents.
pub const DEFAULT_DOCUMENT_STATUS: &str = "draft";

/// `documents/<id>.json`
pub fn document_key(id: &DocumentId) -> String {
    format!("{DOCUMENT_PREFIX}{id}.json")
}

/// Parse a document id back out of a key produced by [`document_key`].
pub(crate) fn id_from_key(key: &str) -> Option<DocumentId> {
    let stem = key.strip_prefix(DOCUMENT_PREFIX)?.strip_suffix(".json")?;
    if stem.contains('/') {
        return None;
    }
    DocumentId::new(stem).ok()
}

/// How one control is implemented within one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationRecord {
    /// Canonical control id; unique within a document.
    pub control_id: ControlId,
    /// Implementation status.
    pub status: ImplementationStatus,
    /// How the control is met.
    #[serde(default)]
    pub description: String,
    /// Roles accountable for the control, deduplicated.
    #[serde(default)]
    pub responsible_roles: BTreeSet<String>,
    /// When the record was last written.
    pub last_updated: Timestamp,
}

impl ImplementationRecord {
    /// A `PLANNED` record with empty description and roles.
    pub fn planned(control_id: ControlId, at: Timestamp) -> Self {
        Self {
            control_id,
            status: ImplementationStatus::Planned,
            description: String::new(),
            responsible_roles: BTreeSet::new(),
            last_updated: at,
        }
    }
}

/// Provenance of the baseline a document was seeded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRef {
    /// Profile document key.
    pub source_key: String,
    /// SHA-256 hex of the profile document at creation time.
    pub digest: String,
}

/// A system security plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceDocument {
    /// Stable id; also the storage key stem.
    pub id: DocumentId,
    /// Human-readable title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Impact tier the baseline was resolved for.
    pub tier: Tier,
    /// Profile family the baseline was drawn from.
    #[serde(default)]
    pub profile_kind: ProfileKind,
    /// Free-form lifecycle label; not validated.
    pub status: String,
    /// One record per control, ordered by control id.
    pub implementations: Vec<ImplementationRecord>,
    /// Creation time.
    pub created: Timestamp,
    /// Time of the last persisted mutation.
    pub updated: Timestamp,
    /// Incremented on every persisted mutation; 1 at creation.
    #[serde(default)]
    pub revision: u64,
    /// Baseline the document was seeded from.
    pub baseline: BaselineRef,
}

impl ComplianceDocument {
    /// Record for `control_id`, if present.
    pub fn implementation(&self, control_id: &ControlId) -> Option<&ImplementationRecord> {
        self.implementations
            .binary_search_by(|r| r.control_id.cmp(control_id))
            .ok()
            .map(|i| &self.implementations[i])
    }

    /// Replace the record with the same canonical id, or insert it in order.
    /// Returns the replaced record.
    pub fn upsert(&mut self, record: ImplementationRecord) -> Option<ImplementationRecord> {
        match self
            .implementations
            .binary_search_by(|r| r.control_id.cmp(&record.control_id))
        {
            Ok(i) => Some(std::mem::replace(&mut self.implementations[i], record)),
            Err(i) => {
                self.implementations.insert(i, record);
                None
            }
        }
    }

    /// Canonical ids of every record, ordered.
    pub fn control_ids(&self) -> BTreeSet<ControlId> {
        self.implementations
            .iter()
            .map(|r| r.control_id.clone())
            .collect()
    }

    /// Restore the sorted, one-per-id invariant after loading. A later
    /// record for the same id wins.
    pub(crate) fn normalize(&mut self) {
        let by_id: BTreeMap<ControlId, ImplementationRecord> = std::mem::take(&mut self.implementations)
            .into_iter()
            .map(|r| (r.control_id.clone(), r))
            .collect();
        self.implementations = by_id.into_values().collect();
    }

    /// Summary view without records.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            tier: self.tier,
            status: self.status.clone(),
            created: self.created,
            updated: self.updated,
        }
    }
}

/// Listing entry: document metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document id.
    pub id: DocumentId,
    /// Document title.
    pub title: String,
    /// Impact tier.
    pub tier: Tier,
    /// Lifecycle label.
    pub status: String,
    /// Creation time.
    pub created: Timestamp,
    /// Time of the last persisted mutation.
    pub updated: Timestamp,
}

/// Creation request. Text fields are parsed by
/// [`DocumentStore::create`](crate::DocumentStore::create).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewDocument {
    /// Caller-chosen id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// `LOW`, `MODERATE` or `HIGH`, case-insensitive.
    pub tier: String,
    /// Profile family to seed from.
    #[serde(default)]
    pub kind: ProfileKind,
}

impl NewDocument {
    /// Request for a standard-profile document.
    pub fn new(title: impl Into<String>, tier: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tier: tier.into(),
            ..Self::default()
        }
    }

    /// Use `id` instead of a generated one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Seed from the `kind` profile family.
    pub fn with_kind(mut self, kind: ProfileKind) -> Self {
        self.kind = kind;
        self
    }
}
