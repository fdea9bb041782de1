//! # renovo CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use renovo_cli::migrate::{run_migrate, MigrateArgs};
use renovo_cli::projects::{run_projects, run_show, ProjectsArgs, ShowArgs};
use renovo_cli::rollup::{run_rollup, RollupArgs};
use renovo_cli::validate::{run_validate, ValidateArgs};

/// Renovo — renovation project tracker toolchain.
///
/// Validates and migrates project documents, lists repository contents,
/// and reports material quantity roll-ups.
#[derive(Parser, Debug)]
#[command(name = "renovo", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse, migrate, and validate a project document file.
    Validate(ValidateArgs),

    /// Run the legacy migration over a project document file.
    Migrate(MigrateArgs),

    /// List the projects of a repository root.
    Projects(ProjectsArgs),

    /// Print one project document after load.
    Show(ShowArgs),

    /// Material quantity roll-up report.
    Rollup(RollupArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Migrate(args) => run_migrate(&args),
        Commands::Projects(args) => run_projects(&args),
        Commands::Show(args) => run_show(&args),
        Commands::Rollup(args) => run_rollup(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
