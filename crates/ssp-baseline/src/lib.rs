#![deny(missing_docs)]

//! # ssp-baseline — Baseline Resolution
//!
//! Answers one question: which controls does a (tier, profile kind) pair
//! require? The answer comes from OSCAL-shaped profile documents held in a
//! [`ContentStore`](ssp_storage::ContentStore) under `profiles/<kind>/`.
//!
//! ## Resolution Pipeline
//!
//! 1. **Locate** ([`locate`]): list `profiles/<kind>/`, keep `.json`,
//!    `.yaml` and `.yml` keys whose file name contains the tier keyword
//!    (`"moderate"` for `MODERATE`), sorted. [`ProfileMatching`] decides
//!    what happens when more than one key qualifies.
//! 2. **Parse** ([`profile`]): JSON or YAML by extension.
//! 3. **Walk** ([`resolver`]): collect every `include-controls` id, recurse
//!    into imported profiles found in the store, drop `exclude-controls`.
//!    Every id is canonicalized; one malformed id fails the resolution.
//! 4. **Cache** ([`cache`]): the immutable [`BaselineProfile`] is kept per
//!    (tier, kind) until explicitly invalidated.
//!
//! ## Key Design Principles
//!
//! 1. **A baseline never understates requirements.** A profile that yields
//!    no controls is [`EmptyProfile`](ssp_core::SspError::EmptyProfile),
//!    and a corrupt id is never skipped.
//!
//! 2. **Explicit cache lifetime.** [`BaselineCache`] is an ordinary value,
//!    built once and shared by `Arc`; tests construct their own.
//!
//! ## Crate Policy
//!
//! - Depends on `ssp-core` and `ssp-storage` internally.
//! - No OSCAL schema validation: unknown fields are ignored.

pub mod cache;
pub mod locate;
pub mod profile;
pub mod resolver;

pub use cache::BaselineCache;
pub use locate::{profile_prefix, ProfileMatching};
pub use profile::{ProfileDocument, ProfileFormat, PROFILE_EXTENSIONS};
pub use resolver::{BaselineProfile, BaselineResolver};
