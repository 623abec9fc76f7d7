//! # Compliance Validation
//!
//! Joins a document's records against its baseline's required set.
//!
//! | Field | Computed over |
//! |-------|---------------|
//! | `missing_controls` | required ids with no record |
//! | `extra_controls` | records outside the baseline |
//! | `counts_by_status` | every record present |
//! | `total_controls` | every record present |
//! | `implementation_percentage` | every record present |
//!
//! `total_controls` is the record count, not the baseline size; the two
//! differ whenever records were added outside the baseline or removed
//! from it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use ssp_baseline::BaselineProfile;
use ssp_core::{ControlId, DocumentId, ImplementationStatus, SspResult, Tier, Timestamp};

use crate::document::ComplianceDocument;
use crate::store::DocumentStore;

/// Outcome of validating one document against its baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Document that was validated.
    pub document_id: DocumentId,
    /// The document's tier.
    pub tier: Tier,
    /// True iff no required control is missing.
    pub valid: bool,
    /// Required by the baseline but absent from the document, ordered.
    pub missing_controls: Vec<ControlId>,
    /// Present in the document but not required by the baseline, ordered.
    pub extra_controls: Vec<ControlId>,
    /// Every status, zero when absent.
    pub counts_by_status: BTreeMap<ImplementationStatus, usize>,
    /// Number of records in the document.
    pub total_controls: usize,
    /// Number of controls the baseline requires.
    pub required_controls: usize,
    /// 0.00 to 100.00, two decimals.
    pub implementation_percentage: f64,
    /// The baseline source changed since the document was created.
    pub baseline_drift: bool,
    /// When the report was produced.
    pub generated_at: Timestamp,
}

/// Score `doc` against `baseline`.
pub fn evaluate(
    doc: &ComplianceDocument,
    baseline: &BaselineProfile,
    generated_at: Timestamp,
) -> ValidationReport {
    let declared = doc.control_ids();
    let missing_controls: Vec<ControlId> = baseline.controls.difference(&declared).cloned().collect();
    let extra_controls: Vec<ControlId> = declared.difference(&baseline.controls).cloned().collect();

    let mut counts_by_status: BTreeMap<ImplementationStatus, usize> =
        ImplementationStatus::all().iter().map(|s| (*s, 0)).collect();
    for record in &doc.implementations {
        *counts_by_status.entry(record.status).or_insert(0) += 1;
    }

    let total_controls = doc.implementations.len();
    let implementation_percentage = if total_controls == 0 {
        0.0
    } else {
        let earned: f64 = doc
            .implementations
            .iter()
            .map(|r| r.status.score_weight())
            .sum();
        round2(100.0 * earned / total_controls as f64)
    };

    ValidationReport {
        document_id: doc.id.clone(),
        tier: doc.tier,
        valid: missing_controls.is_empty(),
        missing_controls,
        extra_controls,
        counts_by_status,
        total_controls,
        required_controls: baseline.controls.len(),
        implementation_percentage,
        baseline_drift: baseline.source_key != doc.baseline.source_key
            || baseline.source_digest != doc.baseline.digest,
        generated_at,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Validates stored documents against their current baselines.
#[derive(Debug, Clone)]
pub struct Validator {
    documents: Arc<DocumentStore>,
}

impl Validator {
    /// Validator over `documents` and its resolver.
    pub fn new(documents: Arc<DocumentStore>) -> Self {
        Self { documents }
    }

    /// Validate the document with `id`.
    ///
    /// The baseline is resolved for the document's tier and kind through
    /// the shared resolver, so a cached baseline is used when present.
    ///
    /// # Errors
    ///
    /// [`SspError::DocumentNotFound`](ssp_core::SspError::DocumentNotFound)
    /// or any baseline resolution error.
    pub fn validate(&self, id: &DocumentId) -> SspResult<ValidationReport> {
        let doc = self.documents.get(id)?;
        let baseline = self
            .documents
            .resolver()
            .resolve(doc.tier, doc.profile_kind)?;
        let report = evaluate(&doc, &baseline, self.documents.clock().now());
        tracing::debug!(
            document_id = %id,
            valid = report.valid,
            missing = report.missing_controls.len(),
            percentage = report.implementation_percentage,
            drift = report.baseline_drift,
            "validated compliance document"
        );
        Ok(report)
    }
}
