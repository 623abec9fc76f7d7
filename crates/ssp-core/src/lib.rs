#![deny(missing_docs)]

//! # ssp-core — Foundational Types for the SSP Stack
//!
//! This crate is the leaf of the workspace DAG. It defines the value types
//! every other crate agrees on: the canonical control identifier, the
//! baseline tier and profile kind, the implementation status vocabulary,
//! UTC timestamps, document identifiers, and the error taxonomy.
//!
//! ## Key Design Principles
//!
//! 1. **One canonical control identifier.** Every textual rendering of a
//!    control (`AC-2(1)`, `ac.2.1`, `AC 2 (1)`, ...) parses into a single
//!    [`ControlId`]. Equality, hashing and ordering are defined on the
//!    structured value, never on raw text, so `AC-10` sorts after `AC-9`.
//!
//! 2. **Closed vocabularies are enums.** [`Tier`], [`ProfileKind`] and
//!    [`ImplementationStatus`] parse from caller text exactly once, at the
//!    boundary, and fail with a typed error otherwise.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] is UTC with seconds precision.
//!
//! 4. **Injectable time and identity.** [`Clock`] and [`IdGenerator`] are
//!    traits so stores can be driven deterministically in tests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ssp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod control;
pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

pub use control::{ControlId, Grammar, RenderForm};
pub use domain::{ImplementationStatus, ProfileKind, Tier};
pub use error::{SspError, SspResult, StorageError};
pub use identity::{DocumentId, IdGenerator, SequentialIds, UuidGenerator};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
