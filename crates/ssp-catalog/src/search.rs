//! # Catalog Search
//!
//! Substring match on the rendered identifier (either form) or title,
//! exact match on family, results in canonical identifier order and
//! truncated to a bounded limit.

use serde::Deserialize;
use ssp_core::RenderForm;

use crate::catalog::{Catalog, ControlMetadata};

/// Result count when the filter sets no limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 25;

/// Hard ceiling on result count, whatever the filter asks for.
pub const MAX_SEARCH_LIMIT: usize = 200;

/// Search criteria. Every unset criterion matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchFilter {
    /// Case-insensitive substring of the id (`ac-2`, `AC.2`) or title.
    pub text: Option<String>,
    /// Family code, matched exactly but case-insensitively.
    pub family: Option<String>,
    /// Maximum results; defaults to [`DEFAULT_SEARCH_LIMIT`], capped at
    /// [`MAX_SEARCH_LIMIT`].
    pub limit: Option<usize>,
}

impl SearchFilter {
    /// Filter on free text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Restrict to one family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The limit actually applied.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .min(MAX_SEARCH_LIMIT)
    }

    fn matches(&self, needle: Option<&str>, family: Option<&str>, control: &ControlMetadata) -> bool {
        if let Some(family) = family {
            if !control.family.eq_ignore_ascii_case(family) {
                return false;
            }
        }
        match needle {
            None => true,
            Some(needle) => {
                control
                    .id
                    .render(RenderForm::Hyphenated)
                    .to_lowercase()
                    .contains(needle)
                    || control
                        .id
                        .render(RenderForm::Dotted)
                        .to_lowercase()
                        .contains(needle)
                    || control.title.to_lowercase().contains(needle)
            }
        }
    }
}

impl Catalog {
    /// Controls matching `filter`, in canonical identifier order.
    pub fn search(&self, filter: &SearchFilter) -> Vec<&ControlMetadata> {
        let needle = filter
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        let family = filter.family.as_deref().map(str::trim);
        let limit = filter.effective_limit();

        let results: Vec<&ControlMetadata> = self
            .controls()
            .filter(|c| filter.matches(needle.as_deref(), family, c))
            .take(limit)
            .collect();
        tracing::debug!(
            text = ?filter.text,
            family = ?filter.family,
            limit,
            hits = results.len(),
            "catalog search"
        );
        results
    }
}
