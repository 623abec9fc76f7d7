//! # Compliance Document Store
//!
//! Create, read, list, update and delete compliance documents held in a
//! [`ContentStore`].
//!
//! ## Concurrency
//!
//! Mutations on one document are serialized by a per-document mutex held
//! across the whole read-modify-write, so two concurrent upserts on the same
//! document both land. Different documents never contend. Return values and
//! error kinds are the same as for an unsynchronized store; the lock table
//! only rules out lost updates within one process.
//!
//! An upsert that fails with `StorageUnavailable` left the stored document
//! untouched, including when the content store timed out mid-write.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use ssp_baseline::BaselineResolver;
use ssp_core::{
    Clock, ControlId, DocumentId, IdGenerator, ImplementationStatus, SspError, SspResult,
    SystemClock, Tier, Timestamp, UuidGenerator,
};
use ssp_storage::ContentStore;

use crate::document::{
    document_key, id_from_key, BaselineRef, ComplianceDocument, DocumentSummary,
    ImplementationRecord, NewDocument, DEFAULT_DOCUMENT_STATUS, DOCUMENT_PREFIX,
};

/// Persistent home of compliance documents.
pub struct DocumentStore {
    store: Arc<dyn ContentStore>,
    resolver: Arc<BaselineResolver>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    locks: DashMap<DocumentId, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("resolver", &self.resolver)
            .field("locked_documents", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Store over `store`, seeding new documents from `resolver`. Uses the
    /// system clock and random UUID ids.
    pub fn new(store: Arc<dyn ContentStore>, resolver: Arc<BaselineResolver>) -> Self {
        Self {
            store,
            resolver,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            locks: DashMap::new(),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the id generator.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// The baseline resolver documents are seeded from.
    pub fn resolver(&self) -> &Arc<BaselineResolver> {
        &self.resolver
    }

    /// The time source.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    /// Create a document seeded with one `PLANNED` record per required
    /// control of its baseline.
    ///
    /// # Errors
    ///
    /// - [`SspError::InvalidTier`] / [`SspError::InvalidDocumentId`] for bad
    ///   request text.
    /// - Any baseline resolution error.
    /// - [`SspError::DocumentExists`] when the id is taken.
    /// - [`SspError::StorageUnavailable`] / [`SspError::Serialization`].
    pub fn create(&self, request: NewDocument) -> SspResult<ComplianceDocument> {
        let tier: Tier = request.tier.parse()?;
        let id = match request.id.as_deref() {
            Some(raw) => DocumentId::new(raw)?,
            None => self.ids.next_id(),
        };
        let baseline = self.resolver.resolve(tier, request.kind)?;
        let now = self.clock.now();

        let doc = ComplianceDocument {
            id: id.clone(),
            title: request.title,
            description: request.description,
            tier,
            profile_kind: request.kind,
            status: DEFAULT_DOCUMENT_STATUS.to_string(),
            implementations: baseline
                .controls
                .iter()
                .map(|c| ImplementationRecord::planned(c.clone(), now))
                .collect(),
            created: now,
            updated: now,
            revision: 1,
            baseline: BaselineRef {
                source_key: baseline.source_key.clone(),
                digest: baseline.source_digest.clone(),
            },
        };

        let lock = self.lock_for(&id);
        let _guard = lock.lock();
        let key = document_key(&id);
        match self.store.read(&key) {
            Ok(_) => return Err(SspError::DocumentExists { id: id.to_string() }),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
        self.write_document(&doc)?;
        tracing::info!(
            document_id = %id,
            %tier,
            kind = %doc.profile_kind,
            controls = doc.implementations.len(),
            "created compliance document"
        );
        Ok(doc)
    }

    /// The document with `id`.
    ///
    /// # Errors
    ///
    /// [`SspError::DocumentNotFound`] when absent.
    pub fn get(&self, id: &DocumentId) -> SspResult<ComplianceDocument> {
        self.read_document(id)
    }

    /// Summaries of every document, ordered by id.
    ///
    /// # Errors
    ///
    /// [`SspError::StorageUnavailable`] / [`SspError::Serialization`].
    pub fn list(&self) -> SspResult<Vec<DocumentSummary>> {
        let mut summaries = Vec::new();
        for key in self.store.list(DOCUMENT_PREFIX)? {
            let Some(id) = id_from_key(&key) else {
                continue;
            };
            match self.read_document(&id) {
                Ok(doc) => summaries.push(doc.summary()),
                // Deleted between listing and reading.
                Err(SspError::DocumentNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    /// Replace the free-form lifecycle label.
    ///
    /// # Errors
    ///
    /// [`SspError::DocumentNotFound`] when absent.
    pub fn set_status(&self, id: &DocumentId, label: &str) -> SspResult<ComplianceDocument> {
        let label = label.trim().to_string();
        self.modify(id, |doc, _| {
            doc.status = label;
            Ok(())
        })?;
        self.read_document(id)
    }

    /// Remove the document.
    ///
    /// # Errors
    ///
    /// [`SspError::DocumentNotFound`] when absent.
    pub fn delete(&self, id: &DocumentId) -> SspResult<()> {
        let lock = self.lock_for(id);
        let _guard = lock.lock();
        match self.store.delete(&document_key(id)) {
            Ok(()) => {
                tracing::info!(document_id = %id, "deleted compliance document");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(SspError::DocumentNotFound { id: id.to_string() }),
            Err(e) => Err(e.into()),
        }
    }

    // -----------------------------------------------------------------------
    // Implementation records
    // -----------------------------------------------------------------------

    /// Replace or add the record for `control`.
    ///
    /// `control` is canonicalized first, so `ac.2.1` updates the record
    /// created for `AC-2(1)`. Controls outside the baseline are accepted.
    ///
    /// # Errors
    ///
    /// - [`SspError::MalformedIdentifier`] / [`SspError::InvalidStatus`].
    /// - [`SspError::DocumentNotFound`] when the document is absent.
    pub fn upsert_implementation<I, S>(
        &self,
        id: &DocumentId,
        control: &str,
        status: &str,
        description: &str,
        roles: I,
    ) -> SspResult<ImplementationRecord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let control_id = ControlId::parse(control)?;
        let status: ImplementationStatus = status.parse()?;
        let responsible_roles: BTreeSet<String> = roles
            .into_iter()
            .map(|r| {
                let r: String = r.into();
                r.trim().to_string()
            })
            .filter(|r| !r.is_empty())
            .collect();
        let description = description.trim().to_string();

        let record = self.modify(id, move |doc, now| {
            let record = ImplementationRecord {
                control_id,
                status,
                description,
                responsible_roles,
                last_updated: now,
            };
            doc.upsert(record.clone());
            Ok(record)
        })?;
        tracing::debug!(
            document_id = %id,
            control_id = %record.control_id,
            status = %record.status,
            "upserted implementation"
        );
        Ok(record)
    }

    /// The record for `control`.
    ///
    /// # Errors
    ///
    /// [`SspError::ImplementationNotFound`] when the document has no record
    /// for the canonical id.
    pub fn get_implementation(&self, id: &DocumentId, control: &str) -> SspResult<ImplementationRecord> {
        let control_id = ControlId::parse(control)?;
        let doc = self.read_document(id)?;
        doc.implementation(&control_id)
            .cloned()
            .ok_or_else(|| SspError::ImplementationNotFound {
                document_id: id.to_string(),
                control_id: control_id.to_string(),
            })
    }

    /// Records of the document in canonical order, optionally only those
    /// with exactly `status_filter`.
    ///
    /// # Errors
    ///
    /// [`SspError::InvalidStatus`] for an unrecognized filter.
    pub fn list_implementations(
        &self,
        id: &DocumentId,
        status_filter: Option<&str>,
    ) -> SspResult<Vec<ImplementationRecord>> {
        let filter = status_filter
            .map(str::parse::<ImplementationStatus>)
            .transpose()?;
        let doc = self.read_document(id)?;
        Ok(doc
            .implementations
            .into_iter()
            .filter(|r| filter.map_or(true, |s| r.status == s))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Read-modify-write
    // -----------------------------------------------------------------------

    /// Run `mutate` against a fresh copy of the document under its lock.
    ///
    /// On success the copy is stamped (`updated = now`, `revision + 1`) and
    /// written whole; on error nothing is written. `mutate` receives the
    /// timestamp the document will carry.
    ///
    /// # Errors
    ///
    /// [`SspError::DocumentNotFound`], the mutation's own error, or a
    /// storage failure on write.
    pub fn modify<T, F>(&self, id: &DocumentId, mutate: F) -> SspResult<T>
    where
        F: FnOnce(&mut ComplianceDocument, Timestamp) -> SspResult<T>,
    {
        let lock = self.lock_for(id);
        let _guard = lock.lock();

        let mut doc = self.read_document(id)?;
        let now = self.clock.now();
        let out = mutate(&mut doc, now)?;
        doc.updated = now;
        doc.revision += 1;
        self.write_document(&doc)?;
        Ok(out)
    }

    fn lock_for(&self, id: &DocumentId) -> Arc<Mutex<()>> {
        Arc::clone(
            &self
                .locks
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    fn read_document(&self, id: &DocumentId) -> SspResult<ComplianceDocument> {
        let key = document_key(id);
        let bytes = match self.store.read(&key) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => {
                return Err(SspError::DocumentNotFound { id: id.to_string() })
            }
            Err(e) => return Err(e.into()),
        };
        let mut doc: ComplianceDocument =
            serde_json::from_slice(&bytes).map_err(|e| SspError::Serialization {
                key: key.clone(),
                reason: e.to_string(),
            })?;
        if doc.id != *id {
            return Err(SspError::Serialization {
                key,
                reason: format!("document id {} does not match its key", doc.id),
            });
        }
        doc.normalize();
        Ok(doc)
    }

    fn write_document(&self, doc: &ComplianceDocument) -> SspResult<()> {
        let key = document_key(&doc.id);
        let bytes = serde_json::to_vec_pretty(doc).map_err(|e| SspError::Serialization {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.store.write(&key, &bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssp_core::{FixedClock, ProfileKind, SequentialIds};
    use ssp_storage::MemoryContentStore;

    const MODERATE: &str = r#"{"profile":{"metadata":{"title":"Moderate"},"imports":[
        {"href":"catalog.json","include-controls":[{"with-ids":["ac-1","ac-2","si-4"]}]}]}}"#;

    fn fixture() -> (Arc<MemoryContentStore>, Arc<FixedClock>, DocumentStore) {
        let content = Arc::new(
            MemoryContentStore::with_entries([("profiles/standard/moderate.json", MODERATE)]).unwrap(),
        );
        let clock = Arc::new(FixedClock::new(Timestamp::parse("2026-03-01T09:00:00Z").unwrap()));
        let resolver = Arc::new(BaselineResolver::new(content.clone()));
        let store = DocumentStore::new(content.clone(), resolver)
            .with_clock(clock.clone())
            .with_id_generator(Arc::new(SequentialIds::new("plan")));
        (content, clock, store)
    }

    fn no_roles() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn test_create_seeds_planned_records() {
        let (_, _, store) = fixture();
        let doc = store.create(NewDocument::new("Payroll", "moderate")).unwrap();
        assert_eq!(doc.id.as_str(), "plan-1");
        assert_eq!(doc.tier, Tier::Moderate);
        assert_eq!(doc.status, "draft");
        assert_eq!(doc.revision, 1);
        assert_eq!(doc.implementations.len(), 3);
        assert!(doc
            .implementations
            .iter()
            .all(|r| r.status == ImplementationStatus::Planned && r.responsible_roles.is_empty()));
        assert_eq!(store.get(&doc.id).unwrap(), doc);
    }

    #[test]
    fn test_create_rejects_bad_tier_and_duplicate_id() {
        let (_, _, store) = fixture();
        assert!(matches!(
            store.create(NewDocument::new("x", "extreme")),
            Err(SspError::InvalidTier { .. })
        ));
        store.create(NewDocument::new("x", "MODERATE").with_id("fixed")).unwrap();
        assert!(matches!(
            store.create(NewDocument::new("y", "MODERATE").with_id("fixed")),
            Err(SspError::DocumentExists { .. })
        ));
        assert!(matches!(
            store.create(NewDocument::new("y", "MODERATE").with_id("../up")),
            Err(SspError::InvalidDocumentId { .. })
        ));
    }

    #[test]
    fn test_create_without_profile_fails_and_persists_nothing() {
        let (content, _, store) = fixture();
        assert!(matches!(
            store.create(NewDocument::new("x", "HIGH")),
            Err(SspError::ProfileNotFound { .. })
        ));
        assert!(content.list(DOCUMENT_PREFIX).unwrap().is_empty());
        assert!(matches!(
            store.create(NewDocument::new("x", "MODERATE").with_kind(ProfileKind::AgencySpecific)),
            Err(SspError::ProfileNotFound { kind: ProfileKind::AgencySpecific, .. })
        ));
    }

    #[test]
    fn test_get_missing() {
        let (_, _, store) = fixture();
        let missing = DocumentId::new("nope").unwrap();
        match store.get(&missing) {
            Err(SspError::DocumentNotFound { id }) => assert_eq!(id, "nope"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_upsert_normalizes_and_stamps() {
        let (_, clock, store) = fixture();
        let doc = store.create(NewDocument::new("Payroll", "MODERATE")).unwrap();
        clock.advance_secs(60);
        let rec = store
            .upsert_implementation(&doc.id, "ac.2", "partially implemented", " MFA rollout ", ["ISSO", " ", "Admin"])
            .unwrap();
        assert_eq!(rec.control_id.to_string(), "AC-2");
        assert_eq!(rec.status, ImplementationStatus::PartiallyImplemented);
        assert_eq!(rec.description, "MFA rollout");
        assert_eq!(rec.responsible_roles.len(), 2);

        let after = store.get(&doc.id).unwrap();
        assert_eq!(after.implementations.len(), 3);
        assert_eq!(after.revision, 2);
        assert_eq!(after.updated, clock.now());
        assert_eq!(after.created, doc.created);
        assert_eq!(store.get_implementation(&doc.id, "AC-2").unwrap(), rec);
    }

    #[test]
    fn test_upsert_extra_control_appends() {
        let (_, _, store) = fixture();
        let doc = store.create(NewDocument::new("Payroll", "MODERATE")).unwrap();
        store
            .upsert_implementation(&doc.id, "SC-7", "IMPLEMENTED", "", no_roles())
            .unwrap();
        assert_eq!(store.get(&doc.id).unwrap().implementations.len(), 4);
    }

    #[test]
    fn test_failed_upsert_writes_nothing() {
        let (_, _, store) = fixture();
        let doc = store.create(NewDocument::new("Payroll", "MODERATE")).unwrap();
        assert!(matches!(
            store.upsert_implementation(&doc.id, "AC-2", "DONE", "", no_roles()),
            Err(SspError::InvalidStatus { .. })
        ));
        assert!(matches!(
            store.upsert_implementation(&doc.id, "AC-", "IMPLEMENTED", "", no_roles()),
            Err(SspError::MalformedIdentifier { .. })
        ));
        let failing: SspResult<()> = store.modify(&doc.id, |d, _| {
            d.title = "changed".to_string();
            Err(SspError::InvalidStatus { input: "x".to_string() })
        });
        assert!(failing.is_err());
        let after = store.get(&doc.id).unwrap();
        assert_eq!(after.revision, 1);
        assert_eq!(after.title, "Payroll");
    }

    #[test]
    fn test_get_implementation_not_found() {
        let (_, _, store) = fixture();
        let doc = store.create(NewDocument::new("Payroll", "MODERATE")).unwrap();
        match store.get_implementation(&doc.id, "ac-3") {
            Err(SspError::ImplementationNotFound { document_id, control_id }) => {
                assert_eq!(document_id, "plan-1");
                assert_eq!(control_id, "AC-3");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_list_implementations_filter() {
        let (_, _, store) = fixture();
        let doc = store.create(NewDocument::new("Payroll", "MODERATE")).unwrap();
        store
            .upsert_implementation(&doc.id, "SI-4", "implemented", "", no_roles())
            .unwrap();
        let all = store.list_implementations(&doc.id, None).unwrap();
        assert_eq!(all.len(), 3);
        let done = store.list_implementations(&doc.id, Some("IMPLEMENTED")).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].control_id.to_string(), "SI-4");
        assert_eq!(store.list_implementations(&doc.id, Some("planned")).unwrap().len(), 2);
        assert!(matches!(
            store.list_implementations(&doc.id, Some("finished")),
            Err(SspError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_list_summaries_ordered_by_id() {
        let (content, _, store) = fixture();
        store.create(NewDocument::new("B", "MODERATE").with_id("beta")).unwrap();
        store.create(NewDocument::new("A", "MODERATE").with_id("alpha")).unwrap();
        content.write("documents/readme.txt", b"ignored").unwrap();
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_set_status_and_delete() {
        let (_, _, store) = fixture();
        let doc = store.create(NewDocument::new("Payroll", "MODERATE")).unwrap();
        let updated = store.set_status(&doc.id, " in-review ").unwrap();
        assert_eq!(updated.status, "in-review");
        assert_eq!(updated.revision, 2);
        store.delete(&doc.id).unwrap();
        assert!(matches!(store.get(&doc.id), Err(SspError::DocumentNotFound { .. })));
        assert!(matches!(store.delete(&doc.id), Err(SspError::DocumentNotFound { .. })));
        assert!(matches!(
            store.set_status(&doc.id, "x"),
            Err(SspError::DocumentNotFound { .. })
        ));
    }

    #[test]
    fn test_corrupt_document_is_serialization_error() {
        let (content, _, store) = fixture();
        content.write("documents/broken.json", b"{\"id\":").unwrap();
        assert!(matches!(
            store.get(&DocumentId::new("broken").unwrap()),
            Err(SspError::Serialization { .. })
        ));
    }
}
