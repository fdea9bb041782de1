//! # Migrate Subcommand
//!
//! Applies the legacy migration to a document file, printing the result or
//! writing it back in place with `--write`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use renovo_store::document::{read_raw, write_project};
use renovo_store::migrate::migrate;
use renovo_store::validate::validate;

/// Arguments for the `renovo migrate` subcommand.
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Project document to migrate.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the migrated document back to the file instead of printing.
    /// The result must validate before anything is written.
    #[arg(long)]
    pub write: bool,
}

/// Execute the migrate subcommand.
///
/// Returns exit code: 0 on success, 1 when the migrated document fails
/// validation (nothing is written in that case).
pub fn run_migrate(args: &MigrateArgs) -> Result<u8> {
    let raw = read_raw(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let migrated = migrate(raw);

    let project = match validate(&migrated) {
        Ok(p) => p,
        Err(e) => {
            println!("FAIL: migrated document does not validate — {e}");
            return Ok(1);
        }
    };

    if args.write {
        write_project(&args.file, &project)
            .with_context(|| format!("failed to write {}", args.file.display()))?;
        println!("Migrated {} in place.", args.file.display());
    } else {
        let mut body = serde_json::to_string_pretty(&project)?;
        body.push('\n');
        print!("{body}");
    }
    Ok(0)
}
