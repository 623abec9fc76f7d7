//! # Baseline Subcommand

use anyhow::Result;
use clap::{Args, Subcommand};
use ssp_core::{ProfileKind, Tier};

use crate::context::SspContext;

/// Arguments for the `ssp baseline` subcommand.
#[derive(Args, Debug)]
pub struct BaselineArgs {
    /// Operation to run.
    #[command(subcommand)]
    pub command: BaselineCommand,
}

/// Baseline queries.
#[derive(Subcommand, Debug)]
pub enum BaselineCommand {
    /// Resolve the required controls of a tier from its profile.
    Resolve {
        /// LOW, MODERATE or HIGH (any case).
        #[arg(long)]
        tier: Tier,
        /// Profile family under `profiles/`.
        #[arg(long, default_value_t = ProfileKind::Standard)]
        kind: ProfileKind,
    },
}

/// Execute the baseline subcommand.
pub fn run_baseline(args: &BaselineArgs, ctx: &SspContext) -> Result<u8> {
    match &args.command {
        BaselineCommand::Resolve { tier, kind } => {
            let profile = ctx.resolver.resolve(*tier, *kind)?;
            crate::print_json(profile.as_ref())?;
            Ok(0)
        }
    }
}
