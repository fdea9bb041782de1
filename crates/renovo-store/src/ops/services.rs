//! Service tree operations: section → subsection → field.
//!
//! `linkedSections` on a field are loose references to main section ids
//! and are intentionally not checked against existence.

use renovo_core::{new_id, RepoError};
use renovo_model::{Project, ServiceField, ServiceSection, ServiceSubsection};
use serde::Deserialize;

use crate::ops::require_free_id;
use crate::repository::Repository;

/// Payload for [`add_service_section`] and [`add_service_subsection`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceNode {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
}

/// Payload for [`add_service_field`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceField {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Loose references to main section ids (not validated).
    #[serde(default)]
    pub linked_sections: Vec<String>,
}

/// Patch payload for [`update_service_field`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFieldPatch {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Replace the linked-section list.
    #[serde(default)]
    pub linked_sections: Option<Vec<String>>,
}

fn subsection_mut<'a>(
    project: &'a mut Project,
    section_id: &str,
    subsection_id: &str,
) -> Result<&'a mut ServiceSubsection, RepoError> {
    let section = project
        .service_section_mut(section_id)
        .ok_or_else(|| RepoError::not_found("service section", section_id))?;
    section
        .subsections
        .iter_mut()
        .find(|s| s.id == subsection_id)
        .ok_or_else(|| RepoError::not_found("service subsection", subsection_id))
}

// ─── Sections ────────────────────────────────────────────────────────

/// Create a top-level service section.
pub fn add_service_section(
    repo: &Repository,
    project_id: &str,
    payload: NewServiceNode,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let id = payload.id.unwrap_or_else(new_id);
        require_free_id(
            "service section",
            &id,
            project.service_section(&id).is_some(),
        )?;
        project.service_sections.push(ServiceSection {
            id,
            name: payload.name,
            subsections: Vec::new(),
        });
        Ok(())
    })
}

/// Rename a service section.
pub fn update_service_section(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    name: String,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let section = project
            .service_section_mut(section_id)
            .ok_or_else(|| RepoError::not_found("service section", section_id))?;
        section.name = name;
        Ok(())
    })
}

/// Delete a service section and its whole subtree.
pub fn delete_service_section(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if project.service_section(section_id).is_none() {
            return Err(RepoError::not_found("service section", section_id));
        }
        project.service_sections.retain(|s| s.id != section_id);
        Ok(())
    })
}

// ─── Subsections ─────────────────────────────────────────────────────

/// Add a subsection to a service section.
pub fn add_service_subsection(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    payload: NewServiceNode,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let section = project
            .service_section_mut(section_id)
            .ok_or_else(|| RepoError::not_found("service section", section_id))?;
        let id = payload.id.unwrap_or_else(new_id);
        require_free_id(
            "service subsection",
            &id,
            section.subsections.iter().any(|s| s.id == id),
        )?;
        section.subsections.push(ServiceSubsection {
            id,
            name: payload.name,
            fields: Vec::new(),
        });
        Ok(())
    })
}

/// Rename a subsection.
pub fn update_service_subsection(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    subsection_id: &str,
    name: String,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let subsection = subsection_mut(project, section_id, subsection_id)?;
        subsection.name = name;
        Ok(())
    })
}

/// Delete a subsection and its fields.
pub fn delete_service_subsection(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    subsection_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let section = project
            .service_section_mut(section_id)
            .ok_or_else(|| RepoError::not_found("service section", section_id))?;
        if !section.subsections.iter().any(|s| s.id == subsection_id) {
            return Err(RepoError::not_found("service subsection", subsection_id));
        }
        section.subsections.retain(|s| s.id != subsection_id);
        Ok(())
    })
}

// ─── Fields ──────────────────────────────────────────────────────────

/// Add a field to a subsection.
pub fn add_service_field(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    subsection_id: &str,
    payload: NewServiceField,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let subsection = subsection_mut(project, section_id, subsection_id)?;
        let id = payload.id.unwrap_or_else(new_id);
        require_free_id(
            "service field",
            &id,
            subsection.fields.iter().any(|f| f.id == id),
        )?;
        subsection.fields.push(ServiceField {
            id,
            name: payload.name,
            notes: payload.notes,
            linked_sections: payload.linked_sections,
        });
        Ok(())
    })
}

/// Update a field.
pub fn update_service_field(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    subsection_id: &str,
    field_id: &str,
    patch: ServiceFieldPatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let subsection = subsection_mut(project, section_id, subsection_id)?;
        let field = subsection
            .fields
            .iter_mut()
            .find(|f| f.id == field_id)
            .ok_or_else(|| RepoError::not_found("service field", field_id))?;
        if let Some(name) = patch.name {
            field.name = name;
        }
        if let Some(notes) = patch.notes {
            field.notes = notes;
        }
        if let Some(linked) = patch.linked_sections {
            field.linked_sections = linked;
        }
        Ok(())
    })
}

/// Delete a field.
pub fn delete_service_field(
    repo: &Repository,
    project_id: &str,
    section_id: &str,
    subsection_id: &str,
    field_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let subsection = subsection_mut(project, section_id, subsection_id)?;
        if !subsection.fields.iter().any(|f| f.id == field_id) {
            return Err(RepoError::not_found("service field", field_id));
        }
        subsection.fields.retain(|f| f.id != field_id);
        Ok(())
    })
}
