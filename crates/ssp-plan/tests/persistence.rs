//! # Filesystem Persistence
//!
//! Documents written through one store instance are read back by a fresh
//! instance over the same directory, exactly as persisted.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use ssp_baseline::BaselineResolver;
use ssp_core::{ImplementationStatus, SspError};
use ssp_plan::{DocumentStore, NewDocument, Validator};
use ssp_storage::{ContentStore, FsContentStore, TimeoutStore};

const HIGH_PROFILE: &str = "\
profile:
  metadata:
    title: High Baseline
  imports:
    - href: shared/low_controls.yaml
      include-controls:
        - with-ids: [sc-7, sc-8.1]
";

const SHARED_LOW: &str = "\
profile:
  imports:
    - include-controls:
        - with-ids: [ac-1, ac-2]
";

fn open(root: &std::path::Path) -> (Arc<DocumentStore>, Validator) {
    let fs_store = Arc::new(FsContentStore::new(root));
    let content: Arc<dyn ContentStore> =
        Arc::new(TimeoutStore::new(fs_store, Duration::from_secs(5)));
    let resolver = Arc::new(BaselineResolver::new(content.clone()));
    let documents = Arc::new(DocumentStore::new(content, resolver));
    let validator = Validator::new(documents.clone());
    (documents, validator)
}

fn seed_profiles(root: &std::path::Path) {
    let dir = root.join("profiles").join("standard");
    fs::create_dir_all(dir.join("shared")).unwrap();
    fs::write(dir.join("high.yaml"), HIGH_PROFILE).unwrap();
    fs::write(dir.join("shared").join("low_controls.yaml"), SHARED_LOW).unwrap();
}

#[test]
fn documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    seed_profiles(dir.path());

    let id = {
        let (documents, _) = open(dir.path());
        let doc = documents
            .create(NewDocument::new("Ledger", "high").with_id("ledger"))
            .unwrap();
        assert_eq!(doc.implementations.len(), 4);
        documents
            .upsert_implementation(&doc.id, "SC-8(1)", "IMPLEMENTED", "TLS 1.3", ["NetOps"])
            .unwrap();
        doc.id
    };

    assert!(dir.path().join("documents").join("ledger.json").is_file());

    let (documents, validator) = open(dir.path());
    let doc = documents.get(&id).unwrap();
    assert_eq!(doc.revision, 2);
    let record = documents.get_implementation(&id, "sc.8.1").unwrap();
    assert_eq!(record.status, ImplementationStatus::Implemented);
    assert_eq!(record.description, "TLS 1.3");

    let report = validator.validate(&id).unwrap();
    assert!(report.valid);
    assert_eq!(report.implementation_percentage, 25.0);
    assert!(!report.baseline_drift);

    let listed = documents.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
}

#[test]
fn persisted_json_is_self_contained() {
    let dir = tempfile::tempdir().unwrap();
    seed_profiles(dir.path());
    let (documents, _) = open(dir.path());
    documents
        .create(NewDocument::new("Ledger", "HIGH").with_id("ledger"))
        .unwrap();

    let raw = fs::read(dir.path().join("documents").join("ledger.json")).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(v["id"], "ledger");
    assert_eq!(v["tier"], "HIGH");
    assert_eq!(v["status"], "draft");
    assert_eq!(v["baseline"]["source_key"], "profiles/standard/high.yaml");
    assert_eq!(v["implementations"].as_array().unwrap().len(), 4);
    assert_eq!(v["implementations"][0]["control_id"], "AC-1");
}

#[test]
fn delete_removes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    seed_profiles(dir.path());
    let (documents, _) = open(dir.path());
    let doc = documents
        .create(NewDocument::new("Ledger", "HIGH").with_id("ledger"))
        .unwrap();
    documents.delete(&doc.id).unwrap();
    assert!(!dir.path().join("documents").join("ledger.json").exists());
    assert!(matches!(
        documents.get(&doc.id),
        Err(SspError::DocumentNotFound { .. })
    ));
}
