//! Attachment operations.
//!
//! The repository never touches attachment bytes; `storageKey` is an
//! opaque handle written by the upload collaborator. Scope references are
//! checked on create, and an attachment referenced by a purchase invoice
//! cannot be deleted.

use renovo_core::{new_id, RepoError, Timestamp};
use renovo_model::{Attachment, AttachmentScope, Project};
use serde::Deserialize;

use crate::ops::{nullable_field, require_free_id};
use crate::repository::Repository;

/// Payload for [`add_attachment`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttachment {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// What the attachment is scoped to.
    pub scope_type: AttachmentScope,
    /// Scoped entity id; required unless project-scoped.
    #[serde(default)]
    pub scope_id: Option<String>,
    /// Free-form category, e.g. `"photo"`, `"invoice"`.
    #[serde(default)]
    pub category: String,
    /// Original filename.
    pub original_name: String,
    /// MIME type guessed by the upload collaborator.
    #[serde(default)]
    pub mime_type: String,
    /// File size in bytes.
    #[serde(default)]
    pub size_bytes: u64,
    /// Opaque storage key.
    pub storage_key: String,
    /// Upload time.
    pub uploaded_at: Timestamp,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Patch payload for [`update_attachment`]. Scope and storage fields are
/// immutable after upload; only the descriptive metadata can change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPatch {
    /// New category.
    #[serde(default)]
    pub category: Option<String>,
    /// New original name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// New note, or clear it.
    #[serde(default, deserialize_with = "nullable_field")]
    pub note: Option<Option<String>>,
}

/// Record an uploaded file's metadata.
///
/// `project`-scoped uploads force `scopeId` to null; every other scope
/// requires an existing referent of the matching kind.
pub fn add_attachment(
    repo: &Repository,
    project_id: &str,
    payload: NewAttachment,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let scope_id = match (payload.scope_type, payload.scope_id) {
            (AttachmentScope::Project, _) => None,
            (scope, None) => {
                return Err(RepoError::validation(
                    "Attachment.scopeId",
                    format!("is required for {scope}-scoped attachments."),
                ));
            }
            (AttachmentScope::Section, Some(id)) => {
                if project.section(&id).is_none() {
                    return Err(RepoError::not_found("section", &id));
                }
                Some(id)
            }
            (AttachmentScope::Item, Some(id)) => {
                if project.item(&id).is_none() {
                    return Err(RepoError::not_found("item", &id));
                }
                Some(id)
            }
            (AttachmentScope::Expense, Some(id)) => {
                if !project.has_expense(&id) {
                    return Err(RepoError::not_found("expense", &id));
                }
                Some(id)
            }
        };

        let id = payload.id.unwrap_or_else(new_id);
        require_free_id("attachment", &id, project.attachment(&id).is_some())?;
        project.attachments.push(Attachment {
            id,
            project_id: project.id.clone(),
            scope_type: payload.scope_type,
            scope_id,
            category: payload.category,
            original_name: payload.original_name,
            mime_type: payload.mime_type,
            size_bytes: payload.size_bytes,
            storage_key: payload.storage_key,
            uploaded_at: payload.uploaded_at,
            note: payload.note,
        });
        Ok(())
    })
}

/// Update an attachment's descriptive metadata.
pub fn update_attachment(
    repo: &Repository,
    project_id: &str,
    attachment_id: &str,
    patch: AttachmentPatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let referenced = invoice_referencing(project, attachment_id);
        let attachment = project
            .attachment_mut(attachment_id)
            .ok_or_else(|| RepoError::not_found("attachment", attachment_id))?;
        if let Some(category) = patch.category {
            // Recategorizing away from "invoice" would orphan the invoice.
            if let Some(invoice_id) = referenced {
                if category != renovo_model::ATTACHMENT_CATEGORY_INVOICE {
                    return Err(RepoError::conflict(format!(
                        "attachment \"{attachment_id}\" backs invoice \"{invoice_id}\" and must keep category \"invoice\""
                    )));
                }
            }
            attachment.category = category;
        }
        if let Some(original_name) = patch.original_name {
            attachment.original_name = original_name;
        }
        if let Some(note) = patch.note {
            attachment.note = note;
        }
        Ok(())
    })
}

/// Delete an attachment. Rejected while a purchase invoice references it.
pub fn delete_attachment(
    repo: &Repository,
    project_id: &str,
    attachment_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if project.attachment(attachment_id).is_none() {
            return Err(RepoError::not_found("attachment", attachment_id));
        }
        if let Some(invoice_id) = invoice_referencing(project, attachment_id) {
            return Err(RepoError::conflict(format!(
                "attachment \"{attachment_id}\" is still referenced by invoice \"{invoice_id}\""
            )));
        }
        project.attachments.retain(|a| a.id != attachment_id);
        Ok(())
    })
}

/// Id of the first invoice referencing an attachment, if any.
fn invoice_referencing(project: &Project, attachment_id: &str) -> Option<String> {
    project
        .purchase_invoices
        .iter()
        .find(|i| i.attachment_id == attachment_id)
        .map(|i| i.id.clone())
}
