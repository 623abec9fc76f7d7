//! # OSCAL Catalog Loader
//!
//! Reads the subset of an OSCAL catalog document the accessor needs:
//!
//! ```json
//! { "catalog": { "groups": [
//!     { "id": "ac", "title": "Access Control", "controls": [
//!         { "id": "ac-2", "title": "Account Management",
//!           "parts": [{ "name": "statement", "prose": "..." }],
//!           "controls": [{ "id": "ac-2.1", "title": "..." }] } ] } ] } }
//! ```
//!
//! Groups become families in document order. Enhancements nest under their
//! base control and are flattened. Unknown fields are ignored; no schema
//! validation is performed.

use serde::Deserialize;
use ssp_core::{ControlId, SspError, SspResult};
use ssp_storage::ContentStore;

use crate::catalog::{Catalog, ControlFamily, ControlMetadata};

#[derive(Debug, Deserialize)]
struct Document {
    catalog: CatalogBody,
}

#[derive(Debug, Deserialize)]
struct CatalogBody {
    #[serde(default)]
    groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct Group {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    controls: Vec<Control>,
}

#[derive(Debug, Deserialize)]
struct Control {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    parts: Vec<Part>,
    #[serde(default)]
    controls: Vec<Control>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    name: String,
    #[serde(default)]
    prose: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Part {
    fn collect_prose(&self, out: &mut Vec<String>) {
        if let Some(prose) = self.prose.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            out.push(prose.to_string());
        }
        for part in &self.parts {
            part.collect_prose(out);
        }
    }
}

fn statement(control: &Control) -> String {
    let mut prose = Vec::new();
    for part in control.parts.iter().filter(|p| p.name == "statement") {
        part.collect_prose(&mut prose);
    }
    prose.join(" ")
}

fn flatten(control: &Control, out: &mut Vec<ControlMetadata>) -> SspResult<()> {
    let id = ControlId::parse(&control.id)?;
    out.push(ControlMetadata {
        family: id.family().to_string(),
        id,
        title: control.title.trim().to_string(),
        description: statement(control),
    });
    for child in &control.controls {
        flatten(child, out)?;
    }
    Ok(())
}

impl Catalog {
    /// Build a catalog from OSCAL catalog JSON.
    ///
    /// # Errors
    ///
    /// [`SspError::Serialization`] when the bytes are not a catalog document;
    /// [`SspError::MalformedIdentifier`] when a control id does not parse.
    pub fn from_oscal_json(bytes: &[u8]) -> SspResult<Catalog> {
        Self::parse_oscal("<inline>", bytes)
    }

    /// Read and parse an OSCAL catalog stored under `key`.
    ///
    /// # Errors
    ///
    /// [`SspError::StorageUnavailable`] when the store fails, otherwise as
    /// [`Catalog::from_oscal_json`].
    pub fn load(store: &dyn ContentStore, key: &str) -> SspResult<Catalog> {
        let bytes = store.read(key)?;
        let catalog = Self::parse_oscal(key, &bytes)?;
        tracing::info!(
            key,
            families = catalog.families().len(),
            controls = catalog.len(),
            "loaded OSCAL catalog"
        );
        Ok(catalog)
    }

    fn parse_oscal(key: &str, bytes: &[u8]) -> SspResult<Catalog> {
        let doc: Document = serde_json::from_slice(bytes).map_err(|e| SspError::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        let mut families = Vec::with_capacity(doc.catalog.groups.len());
        let mut controls = Vec::new();
        for group in &doc.catalog.groups {
            families.push(ControlFamily {
                code: group.id.trim().to_ascii_uppercase(),
                title: group.title.trim().to_string(),
            });
            for control in &group.controls {
                flatten(control, &mut controls)?;
            }
        }
        Ok(Catalog::new(families, controls))
    }
}
