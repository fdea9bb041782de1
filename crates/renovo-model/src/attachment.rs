//! # Attachments
//!
//! File attachment metadata. The bytes themselves live behind an opaque
//! `storageKey` written by the upload collaborator; the repository never
//! interprets it, only the scope/category metadata around it.
//!
//! ## Scope Invariant
//!
//! `scopeId` must reference an existing section/item/expense matching
//! `scopeType`; `project`-scoped attachments force `scopeId = null`.

use renovo_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Attachment category used by the purchase invoice workflow. An invoice's
/// `attachmentId` must point at an attachment of this category.
pub const ATTACHMENT_CATEGORY_INVOICE: &str = "invoice";

/// What kind of entity an attachment is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentScope {
    /// Attached to the project as a whole (`scopeId` must be null).
    Project,
    /// Attached to a section.
    Section,
    /// Attached to an item.
    Item,
    /// Attached to an expense inside an item.
    Expense,
}

impl std::fmt::Display for AttachmentScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Project => "project",
            Self::Section => "section",
            Self::Item => "item",
            Self::Expense => "expense",
        };
        f.write_str(s)
    }
}

/// Metadata for one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Attachment id, unique within the project.
    pub id: String,
    /// Owning project id (denormalized for the upload collaborator).
    pub project_id: String,
    /// What the attachment is scoped to.
    pub scope_type: AttachmentScope,
    /// Id of the scoped entity; null iff `scope_type` is `project`.
    #[serde(default)]
    pub scope_id: Option<String>,
    /// Free-form category, e.g. `"photo"`, `"plan"`, `"invoice"`.
    #[serde(default)]
    pub category: String,
    /// Original filename as uploaded.
    pub original_name: String,
    /// MIME type guessed by the upload collaborator.
    #[serde(default)]
    pub mime_type: String,
    /// File size in bytes.
    #[serde(default)]
    pub size_bytes: u64,
    /// Opaque storage key; never interpreted by the repository.
    pub storage_key: String,
    /// Upload time.
    pub uploaded_at: Timestamp,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
