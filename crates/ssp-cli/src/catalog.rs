//! # Catalog Subcommand
//!
//! Read-only queries over the active catalog: the built-in reference table,
//! or the OSCAL catalog named by `catalog` in the configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use ssp_catalog::{Catalog, SearchFilter, DEFAULT_SEARCH_LIMIT};

use crate::context::SspContext;

/// Arguments for the `ssp catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Operation to run.
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog queries.
#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// List control families in catalog order.
    Families,

    /// Show one control.
    Show {
        /// Control identifier in any accepted spelling.
        id: String,
    },

    /// Search controls by id or title.
    Search {
        /// Case-insensitive substring of the id or title.
        #[arg(long)]
        text: Option<String>,
        /// Restrict to one family code, e.g. `AC`.
        #[arg(long)]
        family: Option<String>,
        /// Maximum number of results.
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
}

/// Execute the catalog subcommand.
pub fn run_catalog(args: &CatalogArgs, ctx: &SspContext) -> Result<u8> {
    let catalog = ctx.catalog()?;
    query(&args.command, &catalog)
}

fn query(command: &CatalogCommand, catalog: &Catalog) -> Result<u8> {
    match command {
        CatalogCommand::Families => crate::print_json(catalog.families())?,
        CatalogCommand::Show { id } => crate::print_json(catalog.control_by_text(id)?)?,
        CatalogCommand::Search {
            text,
            family,
            limit,
        } => {
            let filter = search_filter(text.as_deref(), family.as_deref(), *limit);
            crate::print_json(&catalog.search(&filter))?;
        }
    }
    Ok(0)
}

fn search_filter(text: Option<&str>, family: Option<&str>, limit: usize) -> SearchFilter {
    SearchFilter {
        text: text.map(str::to_string),
        family: family.map(str::to_string),
        limit: Some(limit),
    }
}
