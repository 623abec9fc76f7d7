//! # Profile Documents
//!
//! The OSCAL profile subset the resolver reads:
//!
//! ```yaml
//! profile:
//!   metadata:
//!     title: Moderate Baseline
//!   imports:
//!     - href: base_low.json
//!       include-controls:
//!         - with-ids: [ac-1, ac-2, si-4]
//!       exclude-controls:
//!         - with-ids: [ac-2.1]
//! ```
//!
//! Ids stay raw strings here; canonicalization happens in the resolver so a
//! malformed id is reported with the key of the document that carried it.

use serde::Deserialize;
use ssp_core::{SspError, SspResult};

/// Serialization format of a profile document, chosen by key extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

/// Key extensions recognized as profile documents, with their format.
pub const PROFILE_EXTENSIONS: &[(&str, ProfileFormat)] = &[
    ("json", ProfileFormat::Json),
    ("yaml", ProfileFormat::Yaml),
    ("yml", ProfileFormat::Yaml),
];

impl ProfileFormat {
    /// Format implied by `key`'s extension, if it names a profile document.
    pub fn from_key(key: &str) -> Option<Self> {
        let name = key.rsplit('/').next().unwrap_or(key);
        let (_, extension) = name.rsplit_once('.')?;
        PROFILE_EXTENSIONS
            .iter()
            .find(|(ext, _)| extension.eq_ignore_ascii_case(ext))
            .map(|(_, format)| *format)
    }
}

/// Top-level wrapper. `profile` is absent for non-profile documents such as
/// OSCAL catalogs that an import may point at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileDocument {
    /// The profile body.
    #[serde(default)]
    pub profile: Option<ProfileBody>,
}

/// `profile` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileBody {
    /// Descriptive metadata.
    #[serde(default)]
    pub metadata: Option<ProfileMetadata>,
    /// Imported resources and their control selections, in document order.
    #[serde(default)]
    pub imports: Vec<Import>,
}

/// `profile.metadata`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileMetadata {
    /// Human-readable profile title.
    #[serde(default)]
    pub title: Option<String>,
}

/// One entry of `profile.imports`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Import {
    /// Reference to the imported resource: a catalog, a URL, or another
    /// profile document in the store.
    #[serde(default)]
    pub href: Option<String>,
    /// Controls selected from the import.
    #[serde(default, rename = "include-controls")]
    pub include_controls: Vec<Selection>,
    /// Controls removed from the selection.
    #[serde(default, rename = "exclude-controls")]
    pub exclude_controls: Vec<Selection>,
}

/// An `include-controls` / `exclude-controls` selector.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Selection {
    /// Control identifiers in any accepted spelling.
    #[serde(default, rename = "with-ids")]
    pub with_ids: Vec<String>,
}

impl ProfileBody {
    /// Metadata title, when present and non-blank.
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Every included id string, in document order.
    pub fn included_ids(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .flat_map(|i| i.include_controls.iter())
            .flat_map(|s| s.with_ids.iter())
            .map(String::as_str)
    }

    /// Every excluded id string, in document order.
    pub fn excluded_ids(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .flat_map(|i| i.exclude_controls.iter())
            .flat_map(|s| s.with_ids.iter())
            .map(String::as_str)
    }
}

/// Decode `bytes` stored under `key`.
///
/// # Errors
///
/// [`SspError::InvalidProfile`] when the extension is not a profile format
/// or the bytes do not decode.
pub fn parse_profile(key: &str, bytes: &[u8]) -> SspResult<ProfileDocument> {
    let invalid = |reason: String| SspError::InvalidProfile {
        key: key.to_string(),
        reason,
    };
    match ProfileFormat::from_key(key) {
        Some(ProfileFormat::Json) => {
            serde_json::from_slice(bytes).map_err(|e| invalid(e.to_string()))
        }
        Some(ProfileFormat::Yaml) => {
            serde_yaml::from_slice(bytes).map_err(|e| invalid(e.to_string()))
        }
        None => Err(invalid("unsupported profile format".to_string())),
    }
}
