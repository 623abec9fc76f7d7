#![deny(missing_docs)]

//! # ssp-cli — SSP Stack Command-Line Interface
//!
//! Provides the `ssp` command, a thin harness that maps each core operation
//! onto one subcommand and prints its result as pretty JSON on stdout.
//!
//! ## Subcommands
//!
//! - `ssp control parse` — Canonicalize a control identifier.
//! - `ssp catalog` — Families, control lookup and search.
//! - `ssp baseline resolve` — Required controls for a tier.
//! - `ssp plan` — Create, inspect, update and delete compliance documents.
//! - `ssp validate` — Score a document against its baseline.
//!
//! ```bash
//! ssp --root ./content plan create --title "Payroll" --tier moderate
//! ssp plan set <DOC> AC-2 partially_implemented --role ISSO
//! ssp validate <DOC>
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the library crates; no business logic here.
//! - Handlers return `anyhow::Result<u8>`; the `u8` is the process exit code.

pub mod baseline;
pub mod catalog;
pub mod config;
pub mod context;
pub mod control;
pub mod plan;
pub mod validate;

use anyhow::{Context, Result};
use serde::Serialize;

pub use config::SspConfig;
pub use context::SspContext;

/// Render `value` as pretty JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to encode result as JSON")
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", to_pretty_json(value)?);
    Ok(())
}
