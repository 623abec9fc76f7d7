//! # Catalog Model
//!
//! [`Catalog`] holds the families in catalog order and the controls keyed by
//! canonical [`ControlId`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;
use ssp_core::{ControlId, SspError, SspResult};

use crate::builtin;

/// A control family: two-letter code plus display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlFamily {
    /// Uppercase family code, e.g. `AC`.
    pub code: String,
    /// Display title, e.g. `Access Control`.
    pub title: String,
}

/// Descriptive metadata for one control or control enhancement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlMetadata {
    /// Canonical identifier.
    pub id: ControlId,
    /// Control title, e.g. `Account Management`.
    pub title: String,
    /// Control statement or summary.
    pub description: String,
    /// Family code, always equal to `id.family()`.
    pub family: String,
}

/// Immutable control catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    families: Vec<ControlFamily>,
    controls: BTreeMap<ControlId, ControlMetadata>,
}

impl Catalog {
    /// Build a catalog from families (in catalog order) and controls.
    ///
    /// Controls are keyed by canonical identifier; a later duplicate
    /// replaces an earlier one.
    pub fn new(
        families: Vec<ControlFamily>,
        controls: impl IntoIterator<Item = ControlMetadata>,
    ) -> Self {
        let controls = controls.into_iter().map(|c| (c.id.clone(), c)).collect();
        Self { families, controls }
    }

    /// The built-in NIST SP 800-53 reference table, built once per process.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(builtin::build)
    }

    /// Families in catalog-defined order.
    pub fn families(&self) -> &[ControlFamily] {
        &self.families
    }

    /// Family with the given code (case-insensitive).
    pub fn family(&self, code: &str) -> Option<&ControlFamily> {
        let code = code.trim();
        self.families
            .iter()
            .find(|f| f.code.eq_ignore_ascii_case(code))
    }

    /// Metadata for `id`.
    ///
    /// # Errors
    ///
    /// [`SspError::ControlNotFound`] when the identifier is valid but the
    /// catalog has no such control.
    pub fn control(&self, id: &ControlId) -> SspResult<&ControlMetadata> {
        self.controls
            .get(id)
            .ok_or_else(|| SspError::ControlNotFound { id: id.to_string() })
    }

    /// Parse `text` and look the control up.
    ///
    /// # Errors
    ///
    /// [`SspError::MalformedIdentifier`] or [`SspError::ControlNotFound`].
    pub fn control_by_text(&self, text: &str) -> SspResult<&ControlMetadata> {
        let id = ControlId::parse(text)?;
        self.control(&id)
    }

    /// All controls in canonical identifier order.
    pub fn controls(&self) -> impl Iterator<Item = &ControlMetadata> {
        self.controls.values()
    }

    /// Number of controls (enhancements included).
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Whether the catalog holds no controls.
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}
