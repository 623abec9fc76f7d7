//! # Validate Subcommand
//!
//! Prints the validation report for one document. Exit code 0 when the
//! document covers its baseline, 2 when controls are missing, so scripts can
//! gate on the result without parsing the report.

use anyhow::Result;
use clap::Args;
use ssp_core::DocumentId;
use ssp_plan::ValidationReport;

use crate::context::SspContext;

/// Exit code for a document that does not cover its baseline.
pub const EXIT_INVALID: u8 = 2;

/// Arguments for the `ssp validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document id.
    pub doc: DocumentId,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, ctx: &SspContext) -> Result<u8> {
    let report = ctx.validator.validate(&args.doc)?;
    crate::print_json(&report)?;
    Ok(exit_code(&report))
}

fn exit_code(report: &ValidationReport) -> u8 {
    if report.valid {
        0
    } else {
        tracing::info!(
            document_id = %report.document_id,
            missing = report.missing_controls.len(),
            "document does not cover its baseline"
        );
        EXIT_INVALID
    }
}
