//! # renovo-cli — Renovation Tracker Command-Line Interface
//!
//! Thin host surface over `renovo-store`. Every command is glue: argument
//! parsing and report printing live here, all repository semantics live in
//! the domain crates.
//!
//! ## Subcommands
//!
//! - `validate` — parse, migrate, and validate a project document file
//! - `migrate` — run the legacy migration, printing or writing the result
//! - `projects` — list the projects of a repository root
//! - `show` — print one project document after load
//! - `rollup` — material quantity roll-up report
//!
//! ## Crate Policy
//!
//! - Handlers return `anyhow::Result<u8>` exit codes; `main` maps them to
//!   the process exit status.
//! - No business logic here — handlers delegate to `renovo-store`.

pub mod migrate;
pub mod projects;
pub mod rollup;
pub mod validate;
