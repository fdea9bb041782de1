//! Material category and catalog operations.
//!
//! The reserved `"uncategorized"` category cannot be deleted; deleting any
//! other category reassigns its catalog members to the reserved one.
//! Catalog entries cannot be deleted while an item material line (or an
//! invoice line) still references them.

use renovo_core::{slugify, RepoError};
use renovo_model::{
    CatalogItem, MaterialCategory, Project, UNCATEGORIZED_CATEGORY_ID,
};
use serde::Deserialize;

use crate::normalize::splice_to_index;
use crate::ops::{nullable_field, require_free_id, MoveDirection};
use crate::repository::Repository;

// ─── Payloads ────────────────────────────────────────────────────────

/// Payload for [`add_material_category`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaterialCategory {
    /// Explicit id; slugified from the name when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Patch payload for [`update_material_category`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialCategoryPatch {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description, or clear it.
    #[serde(default, deserialize_with = "nullable_field")]
    pub description: Option<Option<String>>,
}

/// Payload for [`add_catalog_item`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogItem {
    /// Explicit id; slugified from the name when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Owning category; must exist.
    pub category_id: String,
    /// Display name.
    pub name: String,
    /// Unit of measure, e.g. `"m"`, `"pcs"`.
    pub unit_type: String,
    /// Estimated unit price.
    #[serde(default)]
    pub estimated_price: Option<f64>,
    /// Reference sample or product URL.
    #[serde(default)]
    pub sample_url: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Patch payload for [`update_catalog_item`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemPatch {
    /// Move the entry to another category; must exist.
    #[serde(default)]
    pub category_id: Option<String>,
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New unit of measure.
    #[serde(default)]
    pub unit_type: Option<String>,
    /// New estimated price, or clear it.
    #[serde(default, deserialize_with = "nullable_field")]
    pub estimated_price: Option<Option<f64>>,
    /// New sample URL, or clear it.
    #[serde(default, deserialize_with = "nullable_field")]
    pub sample_url: Option<Option<String>>,
    /// New notes, or clear them.
    #[serde(default, deserialize_with = "nullable_field")]
    pub notes: Option<Option<String>>,
}

// ─── Categories ──────────────────────────────────────────────────────

/// Append a new material category at the end of the ordering.
pub fn add_material_category(
    repo: &Repository,
    project_id: &str,
    payload: NewMaterialCategory,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let id = payload.id.unwrap_or_else(|| slugify(&payload.name));
        require_free_id("category", &id, project.material_category(&id).is_some())?;
        let sort_order = project.material_categories.len();
        project.material_categories.push(MaterialCategory {
            id,
            name: payload.name,
            description: payload.description,
            sort_order,
        });
        Ok(())
    })
}

/// Update a category's name/description.
pub fn update_material_category(
    repo: &Repository,
    project_id: &str,
    category_id: &str,
    patch: MaterialCategoryPatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let category = project
            .material_categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| RepoError::not_found("category", category_id))?;
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(description) = patch.description {
            category.description = description;
        }
        Ok(())
    })
}

/// Delete a material category, reassigning its catalog members to the
/// reserved `"uncategorized"` category. The reserved category itself
/// cannot be deleted.
pub fn delete_material_category(
    repo: &Repository,
    project_id: &str,
    category_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if category_id == UNCATEGORIZED_CATEGORY_ID {
            return Err(RepoError::conflict(format!(
                "the reserved \"{UNCATEGORIZED_CATEGORY_ID}\" category cannot be deleted"
            )));
        }
        if project.material_category(category_id).is_none() {
            return Err(RepoError::not_found("category", category_id));
        }
        project.material_categories.retain(|c| c.id != category_id);
        for entry in &mut project.material_catalog {
            if entry.category_id == category_id {
                entry.category_id = UNCATEGORIZED_CATEGORY_ID.to_string();
            }
        }
        Ok(())
    })
}

/// Move a category one step up or down in the ordering.
pub fn move_material_category(
    repo: &Repository,
    project_id: &str,
    category_id: &str,
    direction: MoveDirection,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let current = project
            .material_category(category_id)
            .ok_or_else(|| RepoError::not_found("category", category_id))?
            .sort_order;
        let target = match direction {
            MoveDirection::Up => current.saturating_sub(1),
            MoveDirection::Down => current + 1,
        };
        // Sort into display order, splice, renumber by the new physical
        // index; stale sort orders would otherwise undo the move when the
        // manager's normalization pass re-sorts.
        project.material_categories.sort_by_key(|c| c.sort_order);
        splice_to_index(
            &mut project.material_categories,
            |c| c.id == category_id,
            target,
        );
        for (index, category) in project.material_categories.iter_mut().enumerate() {
            category.sort_order = index;
        }
        Ok(())
    })
}

// ─── Catalog ─────────────────────────────────────────────────────────

/// Create a catalog entry. When no id is supplied, the name is slugified
/// and suffixed until free.
pub fn add_catalog_item(
    repo: &Repository,
    project_id: &str,
    payload: NewCatalogItem,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if project.material_category(&payload.category_id).is_none() {
            return Err(RepoError::not_found("category", &payload.category_id));
        }
        let id = match payload.id {
            Some(id) => {
                require_free_id("material", &id, project.catalog_item(&id).is_some())?;
                id
            }
            None => free_catalog_id(project, &payload.name),
        };
        project.material_catalog.push(CatalogItem {
            id,
            category_id: payload.category_id,
            name: payload.name,
            unit_type: payload.unit_type,
            estimated_price: payload.estimated_price,
            sample_url: payload.sample_url,
            notes: payload.notes,
        });
        Ok(())
    })
}

/// Update a catalog entry.
pub fn update_catalog_item(
    repo: &Repository,
    project_id: &str,
    material_id: &str,
    patch: CatalogItemPatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if let Some(category_id) = &patch.category_id {
            if project.material_category(category_id).is_none() {
                return Err(RepoError::not_found("category", category_id));
            }
        }
        let entry = project
            .catalog_item_mut(material_id)
            .ok_or_else(|| RepoError::not_found("material", material_id))?;
        if let Some(category_id) = patch.category_id {
            entry.category_id = category_id;
        }
        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(unit_type) = patch.unit_type {
            entry.unit_type = unit_type;
        }
        if let Some(price) = patch.estimated_price {
            entry.estimated_price = price;
        }
        if let Some(url) = patch.sample_url {
            entry.sample_url = url;
        }
        if let Some(notes) = patch.notes {
            entry.notes = notes;
        }
        Ok(())
    })
}

/// Delete a catalog entry. Rejected while any item material line or
/// invoice line still references it; ledger rows referencing it are
/// history and do not block deletion.
pub fn delete_catalog_item(
    repo: &Repository,
    project_id: &str,
    material_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if project.catalog_item(material_id).is_none() {
            return Err(RepoError::not_found("material", material_id));
        }
        let in_item_use = project
            .items
            .iter()
            .any(|i| i.materials.iter().any(|l| l.material_id == material_id));
        if in_item_use {
            return Err(RepoError::conflict(format!(
                "material \"{material_id}\" is still referenced by an item material line"
            )));
        }
        let in_invoice_use = project.purchase_invoices.iter().any(|inv| {
            inv.lines
                .iter()
                .any(|l| l.material_id.as_deref() == Some(material_id))
        });
        if in_invoice_use {
            return Err(RepoError::conflict(format!(
                "material \"{material_id}\" is still referenced by an invoice line"
            )));
        }
        project.material_catalog.retain(|m| m.id != material_id);
        Ok(())
    })
}

/// First free slug-based id for a new catalog entry: the plain slug, then
/// `-2`, `-3`, ... on collision.
fn free_catalog_id(project: &Project, name: &str) -> String {
    let base = slugify(name);
    if project.catalog_item(&base).is_none() {
        return base;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base}-{n}");
        if project.catalog_item(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}
