//! # Notes
//!
//! Free-form project notes, optionally linked to a section. Deleting a
//! section nulls `linkedSectionId` on notes that referenced it; the notes
//! themselves survive.

use serde::{Deserialize, Serialize};

/// A project note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Note id, unique within the project.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Note body.
    #[serde(default)]
    pub content: String,
    /// Section this note relates to, if any; must reference an existing
    /// section while set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_section_id: Option<String>,
}
