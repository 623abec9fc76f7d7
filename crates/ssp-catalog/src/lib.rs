#![deny(missing_docs)]

//! # ssp-catalog — Control Catalog Accessor
//!
//! Read-only access to security-control reference data: the ordered list of
//! control families, per-control metadata (title, description, family), and
//! a bounded substring search.
//!
//! ## Backing Data
//!
//! - [`Catalog::builtin()`]: a static NIST SP 800-53 reference table that
//!   stands in when no formal catalog is configured.
//! - [`Catalog::from_oscal_json()`] / [`Catalog::load()`]: an OSCAL catalog
//!   document (`catalog.groups[].controls[]`, enhancements nested under their
//!   base control), read directly or through a [`ContentStore`].
//!
//! ## Key Design Principles
//!
//! 1. **Identifier comparison goes through [`ControlId`].** Lookup keys,
//!    result ordering and deduplication all use the canonical identifier,
//!    so `AC-10` sorts after `AC-9` regardless of how the source spelled it.
//!
//! 2. **Catalog order is preserved.** [`Catalog::families()`] returns
//!    families in the order the catalog defines them, not alphabetically.
//!
//! ## Crate Policy
//!
//! - No business logic beyond lookup and filtering.
//! - Catalogs are immutable after construction.
//!
//! [`ContentStore`]: ssp_storage::ContentStore
//! [`ControlId`]: ssp_core::ControlId

pub mod builtin;
pub mod catalog;
pub mod oscal;
pub mod search;

pub use catalog::{Catalog, ControlFamily, ControlMetadata};
pub use search::{SearchFilter, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
