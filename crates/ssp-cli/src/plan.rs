//! # Plan Subcommand
//!
//! Compliance document lifecycle: create a plan against a tier's baseline,
//! record control implementations, inspect and delete plans.

use anyhow::Result;
use clap::{Args, Subcommand};
use ssp_core::{DocumentId, ProfileKind};
use ssp_plan::NewDocument;

use crate::context::SspContext;

/// Arguments for the `ssp plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Operation to run.
    #[command(subcommand)]
    pub command: PlanCommand,
}

/// Compliance document operations.
#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Create a document seeded with the tier's required controls.
    Create {
        /// Human-readable title.
        #[arg(long)]
        title: String,
        /// LOW, MODERATE or HIGH (any case).
        #[arg(long)]
        tier: String,
        /// Free-text description.
        #[arg(long, default_value = "")]
        description: String,
        /// Profile family the baseline is drawn from.
        #[arg(long, default_value_t = ProfileKind::Standard)]
        kind: ProfileKind,
        /// Explicit document id; generated when omitted.
        #[arg(long)]
        id: Option<String>,
    },

    /// Print a whole document.
    Show {
        /// Document id.
        doc: DocumentId,
    },

    /// Summaries of every stored document.
    List,

    /// Delete a document.
    Delete {
        /// Document id.
        doc: DocumentId,
    },

    /// Set the document's lifecycle status label.
    Status {
        /// Document id.
        doc: DocumentId,
        /// New status label.
        label: String,
    },

    /// Create or replace the record for one control.
    Set {
        /// Document id.
        doc: DocumentId,
        /// Control identifier in any accepted spelling.
        control: String,
        /// implemented, partially_implemented, planned, alternative,
        /// not_applicable (any case).
        status: String,
        /// How the control is implemented.
        #[arg(long, default_value = "")]
        description: String,
        /// Responsible role; repeat for several.
        #[arg(long = "role")]
        roles: Vec<String>,
    },

    /// Print the record for one control.
    Get {
        /// Document id.
        doc: DocumentId,
        /// Control identifier in any accepted spelling.
        control: String,
    },

    /// List records, optionally only those with one status.
    Implementations {
        /// Document id.
        doc: DocumentId,
        /// Only records with this status.
        #[arg(long)]
        status: Option<String>,
    },
}

/// Execute the plan subcommand.
pub fn run_plan(args: &PlanArgs, ctx: &SspContext) -> Result<u8> {
    let documents = &ctx.documents;
    match &args.command {
        PlanCommand::Create {
            title,
            tier,
            description,
            kind,
            id,
        } => {
            let mut request = NewDocument::new(title.as_str(), tier.as_str())
                .with_description(description.as_str())
                .with_kind(*kind);
            if let Some(id) = id {
                request = request.with_id(id.as_str());
            }
            crate::print_json(&documents.create(request)?)?;
        }
        PlanCommand::Show { doc } => crate::print_json(&documents.get(doc)?)?,
        PlanCommand::List => crate::print_json(&documents.list()?)?,
        PlanCommand::Delete { doc } => {
            documents.delete(doc)?;
            crate::print_json(&serde_json::json!({ "deleted": doc }))?;
        }
        PlanCommand::Status { doc, label } => {
            crate::print_json(&documents.set_status(doc, label)?)?
        }
        PlanCommand::Set {
            doc,
            control,
            status,
            description,
            roles,
        } => {
            let record =
                documents.upsert_implementation(doc, control, status, description, roles.iter().cloned())?;
            crate::print_json(&record)?;
        }
        PlanCommand::Get { doc, control } => {
            crate::print_json(&documents.get_implementation(doc, control)?)?
        }
        PlanCommand::Implementations { doc, status } => {
            crate::print_json(&documents.list_implementations(doc, status.as_deref())?)?
        }
    }
    Ok(0)
}
