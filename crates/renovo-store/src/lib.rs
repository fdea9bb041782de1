//! # renovo-store — The Project Repository
//!
//! Loads project documents, migrates legacy shapes, enforces every
//! cross-entity invariant, applies atomic mutations, and posts append-only
//! purchase ledger rows.
//!
//! ## Write Path
//!
//! Every external mutation enters [`Repository::mutate`], which runs the
//! strict sequence:
//!
//! ```text
//! lock(project) → load → migrate → validate → transform
//!              → normalize orderings → validate → ledger guard → persist
//! ```
//!
//! On any failure the on-disk document is left byte-identical to its
//! pre-call state. The per-project lock serializes writers; persistence
//! writes to a temporary sibling and atomically renames, so concurrent
//! readers observe either the pre- or post-state, never a torn document.
//!
//! ## Module Map
//!
//! - [`index`] — maps project ids to document locations.
//! - [`document`] — raw read/parse and atomic pretty-printed writes.
//! - [`migrate`] — idempotent legacy-shape migration.
//! - [`validate`] — the pure validation engine.
//! - [`normalize`] — dense re-indexing of ordered collections.
//! - [`repository`] — the mutation transaction manager.
//! - [`ops`] — per-entity operations expressed as transforms.
//! - [`rollup`] — derived material quantity roll-ups.

pub mod document;
pub mod index;
pub mod migrate;
pub mod normalize;
pub mod ops;
pub mod repository;
pub mod rollup;
pub mod validate;

pub use index::{IndexEntry, IndexResolver, ProjectIndex};
pub use repository::Repository;
pub use rollup::{material_rollup, project_rollup, MaterialRollup};
