//! Note operations.

use renovo_core::{new_id, RepoError};
use renovo_model::{Note, Project};
use serde::Deserialize;

use crate::ops::{nullable_field, require_free_id};
use crate::repository::Repository;

/// Payload for [`add_note`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Display title.
    pub title: String,
    /// Note body.
    #[serde(default)]
    pub content: String,
    /// Section the note relates to, if any; must exist when set.
    #[serde(default)]
    pub linked_section_id: Option<String>,
}

/// Patch payload for [`update_note`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New body.
    #[serde(default)]
    pub content: Option<String>,
    /// Link to another section, or unlink.
    #[serde(default, deserialize_with = "nullable_field")]
    pub linked_section_id: Option<Option<String>>,
}

/// Create a note.
pub fn add_note(
    repo: &Repository,
    project_id: &str,
    payload: NewNote,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if let Some(section_id) = &payload.linked_section_id {
            if project.section(section_id).is_none() {
                return Err(RepoError::not_found("section", section_id));
            }
        }
        let id = payload.id.unwrap_or_else(new_id);
        require_free_id("note", &id, project.notes.iter().any(|n| n.id == id))?;
        project.notes.push(Note {
            id,
            title: payload.title,
            content: payload.content,
            linked_section_id: payload.linked_section_id,
        });
        Ok(())
    })
}

/// Update a note.
pub fn update_note(
    repo: &Repository,
    project_id: &str,
    note_id: &str,
    patch: NotePatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if let Some(Some(section_id)) = &patch.linked_section_id {
            if project.section(section_id).is_none() {
                return Err(RepoError::not_found("section", section_id));
            }
        }
        let note = project
            .note_mut(note_id)
            .ok_or_else(|| RepoError::not_found("note", note_id))?;
        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(linked) = patch.linked_section_id {
            note.linked_section_id = linked;
        }
        Ok(())
    })
}

/// Delete a note.
pub fn delete_note(
    repo: &Repository,
    project_id: &str,
    note_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if !project.notes.iter().any(|n| n.id == note_id) {
            return Err(RepoError::not_found("note", note_id));
        }
        project.notes.retain(|n| n.id != note_id);
        Ok(())
    })
}
