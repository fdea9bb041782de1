//! Section operations: create, update, delete with cascades, and the
//! reorder family (move up/down, set explicit position).
//!
//! Reorders splice within the normalized-order snapshot and leave dense
//! renumbering to the manager's normalization pass; out-of-range targets
//! clamp to the collection bounds.

use renovo_core::{new_id, RepoError};
use renovo_model::{AttachmentScope, Project, Section};
use serde::Deserialize;

use crate::normalize::splice_to_index;
use crate::ops::{drop_scoped_attachments, require_free_id, MoveDirection};
use crate::repository::Repository;

/// Physically sort sections into display order, splice one to `target`,
/// and renumber by the new physical index. Renumbering here (not just in
/// the manager's normalization pass) is required: after a splice the old
/// position values are stale, and sorting by them would undo the move.
fn reorder_sections(project: &mut Project, section_id: &str, target: usize) -> bool {
    project.sections.sort_by_key(|s| s.position);
    if !splice_to_index(&mut project.sections, |s| s.id == section_id, target) {
        return false;
    }
    for (index, section) in project.sections.iter_mut().enumerate() {
        section.position = index;
    }
    true
}

/// Payload for [`add_section`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Display title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Patch payload for [`update_section`]. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Append a new section at the end of the ordering.
pub fn add_section(
    repo: &Repository,
    project_id: &str,
    payload: NewSection,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let id = payload.id.unwrap_or_else(new_id);
        require_free_id("section", &id, project.section(&id).is_some())?;
        let position = project.sections.len();
        project.sections.push(Section {
            id,
            title: payload.title,
            description: payload.description,
            position,
        });
        Ok(())
    })
}

/// Update a section's title/description.
pub fn update_section(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    patch: SectionPatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let section = project
            .section_mut(section_id)
            .ok_or_else(|| RepoError::not_found("section", section_id))?;
        if let Some(title) = patch.title {
            section.title = title;
        }
        if let Some(description) = patch.description {
            section.description = description;
        }
        Ok(())
    })
}

/// Delete a section.
///
/// Cascades: the section's items are removed, notes linked to it are
/// unlinked (the notes survive), and attachments scoped to the section or
/// to any removed item/expense are dropped. Remaining sections are
/// re-indexed densely by the normalization pass.
pub fn delete_section(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if project.section(section_id).is_none() {
            return Err(RepoError::not_found("section", section_id));
        }
        project.sections.retain(|s| s.id != section_id);

        let removed: Vec<_> = project
            .items
            .iter()
            .filter(|i| i.section_id == section_id)
            .cloned()
            .collect();
        project.items.retain(|i| i.section_id != section_id);

        for note in &mut project.notes {
            if note.linked_section_id.as_deref() == Some(section_id) {
                note.linked_section_id = None;
            }
        }

        drop_scoped_attachments(project, AttachmentScope::Section, section_id);
        for item in &removed {
            drop_scoped_attachments(project, AttachmentScope::Item, &item.id);
            for expense in &item.expenses {
                drop_scoped_attachments(project, AttachmentScope::Expense, &expense.id);
            }
        }
        Ok(())
    })
}

/// Move a section one step up or down in the ordering. Moving the first
/// section up (or the last down) is a no-op.
pub fn move_section(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    direction: MoveDirection,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let current = project
            .section(section_id)
            .ok_or_else(|| RepoError::not_found("section", section_id))?
            .position;
        let target = match direction {
            MoveDirection::Up => current.saturating_sub(1),
            MoveDirection::Down => current + 1,
        };
        reorder_sections(project, section_id, target);
        Ok(())
    })
}

/// Splice a section to an explicit index, clamping out-of-range targets.
pub fn set_section_position(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    position: usize,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if !reorder_sections(project, section_id, position) {
            return Err(RepoError::not_found("section", section_id));
        }
        Ok(())
    })
}
