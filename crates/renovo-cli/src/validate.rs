//! # Validate Subcommand
//!
//! Runs a single document through the same load path the repository uses:
//! parse, legacy migration, then the validation engine.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use renovo_store::document::read_raw;
use renovo_store::migrate::migrate;
use renovo_store::validate::validate;

/// Arguments for the `renovo validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Project document to validate.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the document validates, 1 on a validation
/// failure.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let raw = read_raw(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    match validate(&migrate(raw)) {
        Ok(project) => {
            println!(
                "OK: {} — \"{}\" ({} sections, {} items, {} ledger entries)",
                args.file.display(),
                project.name,
                project.sections.len(),
                project.items.len(),
                project.purchase_ledger.len()
            );
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {} — {e}", args.file.display());
            Ok(1)
        }
    }
}
