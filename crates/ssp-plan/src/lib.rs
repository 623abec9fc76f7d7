#![deny(missing_docs)]

//! # ssp-plan — Compliance Documents and Validation
//!
//! A compliance document (system security plan) records, per control, how a
//! system implements it. Documents are created against a baseline: creation
//! resolves the required controls for the document's tier and seeds one
//! `PLANNED` record per control. Callers then upsert records, and the
//! [`Validator`] scores the document against its baseline on demand.
//!
//! ## Persistence
//!
//! Each document is one self-contained JSON object under
//! `documents/<id>.json` in a [`ContentStore`](ssp_storage::ContentStore),
//! always read and written whole. Every mutation goes through
//! [`DocumentStore::modify`]: the document's lock is held across
//! read, mutate and write, and nothing is written when the mutation fails.
//!
//! ## Scoring
//!
//! `implementation_percentage = 100 * (implemented + 0.5 * partial) / total`
//! over the records actually present, rounded to two decimals, `0` for an
//! empty document. Alternative and not-applicable records count toward the
//! total with zero weight.
//!
//! ## Crate Policy
//!
//! - Depends on `ssp-core`, `ssp-storage` and `ssp-baseline` internally.
//! - Time and ids come from injected [`Clock`](ssp_core::Clock) and
//!   [`IdGenerator`](ssp_core::IdGenerator) implementations.

pub mod document;
pub mod store;
pub mod validation;

pub use document::{
    document_key, BaselineRef, ComplianceDocument, DocumentSummary, ImplementationRecord,
    NewDocument, DEFAULT_DOCUMENT_STATUS, DOCUMENT_PREFIX,
};
pub use store::DocumentStore;
pub use validation::{evaluate, ValidationReport, Validator};
