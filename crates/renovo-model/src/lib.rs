//! # renovo-model — Typed Project Document Model
//!
//! The single-tenant renovation tracker persists one JSON document per
//! project. This crate defines that document as typed Rust: the
//! [`Project`] root aggregate and every collection it owns by composition.
//! There is no partial persistence — a project is read in full and written
//! in full by `renovo-store`.
//!
//! ## Key Design Principles
//!
//! 1. **Wire names are camelCase.** Every struct carries
//!    `#[serde(rename_all = "camelCase")]` so the Rust field names stay
//!    idiomatic while documents keep their historical shape.
//!
//! 2. **Collections default to empty.** Absent arrays deserialize to empty
//!    vectors; the migrator still backfills them explicitly so that
//!    serialized documents always carry every collection.
//!
//! 3. **Lifecycle lives with the entity.** The purchase invoice
//!    draft→confirmed transition is a guarded method on
//!    [`PurchaseInvoice`], not a convention scattered through callers.
//!
//! Cross-entity invariants (referential integrity, dense orderings) are
//! not enforced here — that is the validation engine's job in
//! `renovo-store`.

pub mod attachment;
pub mod invoice;
pub mod item;
pub mod ledger;
pub mod material;
pub mod note;
pub mod project;
pub mod section;
pub mod service;
pub mod unit;

pub use attachment::{Attachment, AttachmentScope, ATTACHMENT_CATEGORY_INVOICE};
pub use invoice::{
    ExtractionRecord, InvoiceLine, InvoiceStateError, InvoiceStatus, InvoiceTotals,
    PurchaseInvoice, ReviewRecord,
};
pub use item::{Expense, Item, ItemDates, ItemStatus, MaterialLine};
pub use ledger::{LedgerEntry, LedgerEntryType};
pub use material::{CatalogItem, MaterialCategory, UNCATEGORIZED_CATEGORY_ID};
pub use note::Note;
pub use project::{Project, ProjectOverview};
pub use section::Section;
pub use service::{ServiceField, ServiceSection, ServiceSubsection};
pub use unit::{Room, Unit};
