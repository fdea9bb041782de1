//! # Entity Operations
//!
//! One public function per repository operation, each a thin wrapper that
//! builds a transform closure and hands it to
//! [`Repository::mutate`](crate::repository::Repository::mutate). The
//! transform does its own existence checks before touching anything, so a
//! not-found or conflict condition surfaces before validation runs and
//! before anything is persisted.
//!
//! Payloads are flat serde structs keyed by the document field names.
//! Patch structs use `Option` for "leave unchanged" and, for nullable
//! fields, `Option<Option<T>>` so that "set to null" and "leave unchanged"
//! stay distinguishable on the wire.
//!
//! ## Cascade Rules
//!
//! Deletions cascade inside the same transform, so cascade and deletion
//! are validated and persisted atomically:
//!
//! - delete unit → items pointing at it have `unitId` nulled;
//! - delete section → its items are removed, notes linking it are
//!   unlinked, attachments scoped to it (or to its items/expenses) are
//!   removed;
//! - delete category → its catalog members move to `"uncategorized"`.

use renovo_core::RepoError;
use renovo_model::{AttachmentScope, Project};
use serde::{Deserialize, Deserializer};

pub mod attachments;
pub mod invoices;
pub mod items;
pub mod materials;
pub mod notes;
pub mod sections;
pub mod services;
pub mod units;

pub use attachments::{add_attachment, delete_attachment, update_attachment};
pub use invoices::{confirm_invoice_draft, create_invoice_draft, update_invoice_draft};
pub use items::{
    add_expense, add_item, add_material_line, delete_expense, delete_item,
    delete_material_line, update_expense, update_item, update_material_line,
};
pub use materials::{
    add_catalog_item, add_material_category, delete_catalog_item, delete_material_category,
    move_material_category, update_catalog_item, update_material_category,
};
pub use notes::{add_note, delete_note, update_note};
pub use sections::{
    add_section, delete_section, move_section, set_section_position, update_section,
};
pub use services::{
    add_service_field, add_service_section, add_service_subsection, delete_service_field,
    delete_service_section, delete_service_subsection, update_service_field,
    update_service_section, update_service_subsection,
};
pub use units::{add_room, add_unit, delete_room, delete_unit, update_room, update_unit};

/// Direction for move-up / move-down reorder operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    /// Toward index 0.
    Up,
    /// Toward the end of the collection.
    Down,
}

/// Reject a create whose id is already taken.
pub(crate) fn require_free_id(kind: &str, id: &str, taken: bool) -> Result<(), RepoError> {
    if taken {
        return Err(RepoError::conflict(format!(
            "{kind} id \"{id}\" already exists"
        )));
    }
    Ok(())
}

/// Remove attachments scoped to a deleted entity. Runs as part of the
/// deleting transform; if one of the removed attachments is still
/// referenced by an invoice, the post-transform validation rejects the
/// whole mutation.
pub(crate) fn drop_scoped_attachments(
    project: &mut Project,
    scope: AttachmentScope,
    scope_id: &str,
) {
    project
        .attachments
        .retain(|a| !(a.scope_type == scope && a.scope_id.as_deref() == Some(scope_id)));
}

/// Deserialize a nullable patch field: absent stays `None` via
/// `#[serde(default)]`, an explicit `null` becomes `Some(None)`.
pub(crate) fn nullable_field<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
