//! Item operations, including the embedded material lines and expenses.

use renovo_core::{new_id, RepoError};
use renovo_model::{
    AttachmentScope, Expense, Item, ItemDates, ItemStatus, MaterialLine, Project,
};
use serde::Deserialize;

use crate::ops::{drop_scoped_attachments, nullable_field, require_free_id};
use crate::repository::Repository;

// ─── Payloads ────────────────────────────────────────────────────────

/// Payload for [`add_item`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Owning section; must exist.
    pub section_id: String,
    /// Unit the work applies to, if any; must exist when set.
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Display title.
    pub title: String,
    /// Workflow status.
    #[serde(default)]
    pub status: ItemStatus,
    /// Cost estimate.
    #[serde(default)]
    pub estimate: f64,
    /// Planned dates.
    #[serde(default)]
    pub dates: Option<ItemDates>,
    /// Assigned people or crews.
    #[serde(default)]
    pub performers: Vec<String>,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Short working note.
    #[serde(default)]
    pub note: String,
}

/// Patch payload for [`update_item`]. Absent fields stay unchanged;
/// nullable fields distinguish "set null" from "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    /// Move the item to another section; must exist.
    #[serde(default)]
    pub section_id: Option<String>,
    /// Re-tie to a unit (`Some(Some(id))`), detach (`Some(None)`), or
    /// leave unchanged (`None`).
    #[serde(default, deserialize_with = "nullable_field")]
    pub unit_id: Option<Option<String>>,
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New status.
    #[serde(default)]
    pub status: Option<ItemStatus>,
    /// New estimate.
    #[serde(default)]
    pub estimate: Option<f64>,
    /// New planned dates, or clear them.
    #[serde(default, deserialize_with = "nullable_field")]
    pub dates: Option<Option<ItemDates>>,
    /// Replace the performer list.
    #[serde(default)]
    pub performers: Option<Vec<String>>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New working note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Payload for [`add_material_line`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaterialLine {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Catalog entry the line draws from; must exist.
    pub material_id: String,
    /// Required quantity.
    pub quantity: f64,
    /// Product or vendor URL.
    #[serde(default)]
    pub url: String,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Patch payload for [`update_material_line`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLinePatch {
    /// Point the line at another catalog entry; must exist.
    #[serde(default)]
    pub material_id: Option<String>,
    /// New quantity.
    #[serde(default)]
    pub quantity: Option<f64>,
    /// New URL.
    #[serde(default)]
    pub url: Option<String>,
    /// New note, or clear it.
    #[serde(default, deserialize_with = "nullable_field")]
    pub note: Option<Option<String>>,
}

/// Payload for [`add_expense`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// Explicit id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// What the money went to.
    #[serde(default)]
    pub description: String,
    /// Amount in the project currency.
    pub amount: f64,
    /// Date of the expense.
    #[serde(default)]
    pub date: Option<chrono::NaiveDate>,
}

/// Patch payload for [`update_expense`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New amount.
    #[serde(default)]
    pub amount: Option<f64>,
    /// New date, or clear it.
    #[serde(default, deserialize_with = "nullable_field")]
    pub date: Option<Option<chrono::NaiveDate>>,
}

// ─── Items ───────────────────────────────────────────────────────────

/// Create a new item in an existing section.
pub fn add_item(
    repo: &Repository,
    project_id: &str,
    payload: NewItem,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if project.section(&payload.section_id).is_none() {
            return Err(RepoError::not_found("section", &payload.section_id));
        }
        if let Some(unit_id) = &payload.unit_id {
            if project.unit(unit_id).is_none() {
                return Err(RepoError::not_found("unit", unit_id));
            }
        }
        let id = payload.id.unwrap_or_else(new_id);
        require_free_id("item", &id, project.item(&id).is_some())?;
        project.items.push(Item {
            id,
            section_id: payload.section_id,
            unit_id: payload.unit_id,
            title: payload.title,
            status: payload.status,
            estimate: payload.estimate,
            dates: payload.dates,
            performers: payload.performers,
            description: payload.description,
            note: payload.note,
            materials: Vec::new(),
            expenses: Vec::new(),
        });
        Ok(())
    })
}

/// Update an item's scalar fields and references.
pub fn update_item(
    repo: &Repository,
    project_id: &str,
    item_id: &str,
    patch: ItemPatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if let Some(section_id) = &patch.section_id {
            if project.section(section_id).is_none() {
                return Err(RepoError::not_found("section", section_id));
            }
        }
        if let Some(Some(unit_id)) = &patch.unit_id {
            if project.unit(unit_id).is_none() {
                return Err(RepoError::not_found("unit", unit_id));
            }
        }
        let item = project
            .item_mut(item_id)
            .ok_or_else(|| RepoError::not_found("item", item_id))?;
        if let Some(section_id) = patch.section_id {
            item.section_id = section_id;
        }
        if let Some(unit_id) = patch.unit_id {
            item.unit_id = unit_id;
        }
        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(status) = patch.status {
            item.status = status;
        }
        if let Some(estimate) = patch.estimate {
            item.estimate = estimate;
        }
        if let Some(dates) = patch.dates {
            item.dates = dates;
        }
        if let Some(performers) = patch.performers {
            item.performers = performers;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(note) = patch.note {
            item.note = note;
        }
        Ok(())
    })
}

/// Delete an item. Attachments scoped to the item or its expenses are
/// dropped in the same transform.
pub fn delete_item(
    repo: &Repository,
    project_id: &str,
    item_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let item = project
            .item(item_id)
            .cloned()
            .ok_or_else(|| RepoError::not_found("item", item_id))?;
        project.items.retain(|i| i.id != item_id);

        drop_scoped_attachments(project, AttachmentScope::Item, item_id);
        for expense in &item.expenses {
            drop_scoped_attachments(project, AttachmentScope::Expense, &expense.id);
        }
        Ok(())
    })
}

// ─── Material lines ──────────────────────────────────────────────────

/// Add a material requirement line to an item.
pub fn add_material_line(
    repo: &Repository,
    project_id: &str,
    item_id: &str,
    payload: NewMaterialLine,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if project.catalog_item(&payload.material_id).is_none() {
            return Err(RepoError::not_found("material", &payload.material_id));
        }
        let item = project
            .item_mut(item_id)
            .ok_or_else(|| RepoError::not_found("item", item_id))?;
        let id = payload.id.unwrap_or_else(new_id);
        require_free_id(
            "material line",
            &id,
            item.materials.iter().any(|l| l.id == id),
        )?;
        item.materials.push(MaterialLine {
            id,
            material_id: payload.material_id,
            quantity: payload.quantity,
            url: payload.url,
            note: payload.note,
        });
        Ok(())
    })
}

/// Update a material line on an item.
pub fn update_material_line(
    repo: &Repository,
    project_id: &str,
    item_id: &str,
    line_id: &str,
    patch: MaterialLinePatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        if let Some(material_id) = &patch.material_id {
            if project.catalog_item(material_id).is_none() {
                return Err(RepoError::not_found("material", material_id));
            }
        }
        let item = project
            .item_mut(item_id)
            .ok_or_else(|| RepoError::not_found("item", item_id))?;
        let line = item
            .materials
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or_else(|| RepoError::not_found("material line", line_id))?;
        if let Some(material_id) = patch.material_id {
            line.material_id = material_id;
        }
        if let Some(quantity) = patch.quantity {
            line.quantity = quantity;
        }
        if let Some(url) = patch.url {
            line.url = url;
        }
        if let Some(note) = patch.note {
            line.note = note;
        }
        Ok(())
    })
}

/// Remove a material line from an item.
pub fn delete_material_line(
    repo: &Repository,
    project_id: &str,
    item_id: &str,
    line_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let item = project
            .item_mut(item_id)
            .ok_or_else(|| RepoError::not_found("item", item_id))?;
        if !item.materials.iter().any(|l| l.id == line_id) {
            return Err(RepoError::not_found("material line", line_id));
        }
        item.materials.retain(|l| l.id != line_id);
        Ok(())
    })
}

// ─── Expenses ────────────────────────────────────────────────────────

/// Record an expense against an item.
pub fn add_expense(
    repo: &Repository,
    project_id: &str,
    item_id: &str,
    payload: NewExpense,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let id = payload.id.clone().unwrap_or_else(new_id);
        // Expense ids are unique project-wide; attachments may scope to them.
        require_free_id("expense", &id, project.has_expense(&id))?;
        let item = project
            .item_mut(item_id)
            .ok_or_else(|| RepoError::not_found("item", item_id))?;
        item.expenses.push(Expense {
            id,
            description: payload.description,
            amount: payload.amount,
            date: payload.date,
        });
        Ok(())
    })
}

/// Update an expense on an item.
pub fn update_expense(
    repo: &Repository,
    project_id: &str,
    item_id: &str,
    expense_id: &str,
    patch: ExpensePatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let item = project
            .item_mut(item_id)
            .ok_or_else(|| RepoError::not_found("item", item_id))?;
        let expense = item
            .expenses
            .iter_mut()
            .find(|e| e.id == expense_id)
            .ok_or_else(|| RepoError::not_found("expense", expense_id))?;
        if let Some(description) = patch.description {
            expense.description = description;
        }
        if let Some(amount) = patch.amount {
            expense.amount = amount;
        }
        if let Some(date) = patch.date {
            expense.date = date;
        }
        Ok(())
    })
}

/// Remove an expense from an item, dropping attachments scoped to it.
pub fn delete_expense(
    repo: &Repository,
    project_id: &str,
    item_id: &str,
    expense_id: &str,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let item = project
            .item_mut(item_id)
            .ok_or_else(|| RepoError::not_found("item", item_id))?;
        if !item.expenses.iter().any(|e| e.id == expense_id) {
            return Err(RepoError::not_found("expense", expense_id));
        }
        item.expenses.retain(|e| e.id != expense_id);
        drop_scoped_attachments(project, AttachmentScope::Expense, expense_id);
        Ok(())
    })
}
