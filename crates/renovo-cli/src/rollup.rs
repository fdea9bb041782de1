//! # Rollup Subcommand
//!
//! Material quantity report: required vs purchased vs remaining, computed
//! on demand from the validated document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use renovo_store::{material_rollup, project_rollup, MaterialRollup, Repository};

/// Arguments for the `renovo rollup` subcommand.
#[derive(Args, Debug)]
pub struct RollupArgs {
    /// Repository root directory (must contain index.json).
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,

    /// Project id; defaults to the repository's default project.
    #[arg(value_name = "PROJECT_ID")]
    pub project_id: Option<String>,

    /// Restrict the report to one material id.
    #[arg(long, value_name = "MATERIAL_ID")]
    pub material: Option<String>,
}

/// Execute the rollup subcommand.
pub fn run_rollup(args: &RollupArgs) -> Result<u8> {
    let repo = Repository::open(&args.root)
        .with_context(|| format!("failed to open repository at {}", args.root.display()))?;
    let project_id = args
        .project_id
        .clone()
        .unwrap_or_else(|| repo.get_default_project_id());
    let project = repo.get_project(&project_id)?;

    let rollups = match &args.material {
        Some(material_id) => vec![material_rollup(&project, material_id)],
        None => project_rollup(&project),
    };

    if rollups.is_empty() {
        println!("No materials in use for project {project_id}.");
        return Ok(0);
    }
    for rollup in &rollups {
        print_rollup(rollup);
    }
    Ok(0)
}

fn print_rollup(rollup: &MaterialRollup) {
    println!(
        "{}: required {:.2}, purchased {:.2}, remaining {:.2}",
        rollup.material_id, rollup.required_qty, rollup.purchased_qty, rollup.remaining_qty
    );
}
