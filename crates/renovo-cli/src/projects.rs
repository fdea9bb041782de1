//! # Projects and Show Subcommands
//!
//! Repository listing and single-project inspection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use renovo_store::Repository;

/// Arguments for the `renovo projects` subcommand.
#[derive(Args, Debug)]
pub struct ProjectsArgs {
    /// Repository root directory (must contain index.json).
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,
}

/// Arguments for the `renovo show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Repository root directory (must contain index.json).
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,

    /// Project id; defaults to the repository's default project.
    #[arg(value_name = "PROJECT_ID")]
    pub project_id: Option<String>,
}

/// Execute the projects subcommand.
pub fn run_projects(args: &ProjectsArgs) -> Result<u8> {
    let repo = Repository::open(&args.root)
        .with_context(|| format!("failed to open repository at {}", args.root.display()))?;
    let default_id = repo.get_default_project_id();
    for id in repo.list_project_ids() {
        let marker = if id == default_id { " (default)" } else { "" };
        match repo.get_project(&id) {
            Ok(project) => println!("{id}{marker} — \"{}\"", project.name),
            Err(e) => println!("{id}{marker} — unreadable: {e}"),
        }
    }
    Ok(0)
}

/// Execute the show subcommand, printing the loaded document as pretty
/// JSON (post-migration, validated form).
pub fn run_show(args: &ShowArgs) -> Result<u8> {
    let repo = Repository::open(&args.root)
        .with_context(|| format!("failed to open repository at {}", args.root.display()))?;
    let project_id = args
        .project_id
        .clone()
        .unwrap_or_else(|| repo.get_default_project_id());
    let project = repo.get_project(&project_id)?;
    let mut body = serde_json::to_string_pretty(&project)?;
    body.push('\n');
    print!("{body}");
    Ok(0)
}
