//! # renovo-core — Foundational Types for the Renovo Tracker
//!
//! Leaf crate of the Renovo workspace. Defines the primitives every other
//! crate builds on; depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One error hierarchy.** Every repository operation returns
//!    [`RepoError`], whose four primary kinds (`NotFound`, `Validation`,
//!    `Conflict`, `Io`) carry enough structure for a caller to decide
//!    whether to retry, block a destructive action, or surface the message
//!    verbatim.
//!
//! 2. **UTC-only timestamps.** The [`Timestamp`] type enforces UTC with Z
//!    suffix and seconds precision, so serialized documents are
//!    byte-deterministic and diff-friendly.
//!
//! 3. **No bare id generation.** New entity ids come from [`new_id()`];
//!    catalog ids backfilled from legacy names come from [`slugify()`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `renovo-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod id;
pub mod temporal;

pub use error::RepoError;
pub use id::{new_id, slugify};
pub use temporal::Timestamp;
