//! # ssp — SSP Stack CLI
//!
//! Entry point for the `ssp` command.
//!
//! ## Usage
//!
//! ```bash
//! ssp control parse "ac.2.1" --form dotted
//! ssp catalog search --text "account" --family AC
//! ssp baseline resolve --tier MODERATE
//! ssp plan create --title "Payroll" --tier moderate --id payroll
//! ssp plan set payroll AC-2 implemented --description "SSO" --role ISSO
//! ssp validate payroll
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ssp_cli::baseline::{run_baseline, BaselineArgs};
use ssp_cli::catalog::{run_catalog, CatalogArgs};
use ssp_cli::control::{run_control, ControlArgs};
use ssp_cli::plan::{run_plan, PlanArgs};
use ssp_cli::validate::{run_validate, ValidateArgs};
use ssp_cli::{SspConfig, SspContext};

/// SSP Stack: security control catalogs, baselines and system security plans.
#[derive(Parser, Debug)]
#[command(name = "ssp", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Content store root; overrides `content_root` from the config file.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Emit log lines as JSON objects instead of plain text.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and render control identifiers.
    Control(ControlArgs),

    /// Query the control catalog.
    Catalog(CatalogArgs),

    /// Resolve tier baselines from profiles.
    Baseline(BaselineArgs),

    /// Manage compliance documents.
    Plan(PlanArgs),

    /// Validate a document against its baseline.
    Validate(ValidateArgs),
}

fn env_filter(verbose: u8) -> EnvFilter {
    if std::env::var_os("RUST_LOG").is_some() {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

fn init_logging(verbose: u8, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let result = SspConfig::resolve(cli.config.as_deref(), cli.root.as_deref()).and_then(|config| {
        let ctx = SspContext::open(config);
        match &cli.command {
            Commands::Control(args) => run_control(args),
            Commands::Catalog(args) => run_catalog(args, &ctx),
            Commands::Baseline(args) => run_baseline(args, &ctx),
            Commands::Plan(args) => run_plan(args, &ctx),
            Commands::Validate(args) => run_validate(args, &ctx),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
