//! # Item — A Unit of Renovation Work
//!
//! Items are the workhorse entity: a task inside a section, optionally tied
//! to a unit/room, carrying material requirement lines and expenses.
//!
//! ## Invariants (checked by the validation engine)
//!
//! - `sectionId` must reference an existing section.
//! - `unitId`, if present, must reference an existing unit.
//! - Every material line's `materialId` must reference a catalog entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Not started.
    #[default]
    Todo,
    /// Work underway.
    InProgress,
    /// Waiting on something external.
    Blocked,
    /// Finished.
    Done,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Planned start/end dates for an item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDates {
    /// Planned start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Planned end date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// A material requirement line embedded in an item, referencing the
/// project-level catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLine {
    /// Line id, unique within the item.
    pub id: String,
    /// Catalog entry this line draws from.
    pub material_id: String,
    /// Required quantity, in the catalog entry's unit type.
    pub quantity: f64,
    /// Product or vendor URL for this specific purchase.
    #[serde(default)]
    pub url: String,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An expense recorded against an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense id, unique within the project (attachments may scope to it).
    pub id: String,
    /// What the money went to.
    #[serde(default)]
    pub description: String,
    /// Amount in the project currency.
    pub amount: f64,
    /// Date of the expense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// A renovation work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Item id, unique within the project.
    pub id: String,
    /// Owning section.
    pub section_id: String,
    /// Unit this work applies to, if any. Deleting the unit detaches
    /// (nulls) this reference rather than deleting the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    /// Display title.
    pub title: String,
    /// Workflow status.
    #[serde(default)]
    pub status: ItemStatus,
    /// Cost estimate in the project currency.
    #[serde(default)]
    pub estimate: f64,
    /// Planned dates, if scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<ItemDates>,
    /// People or crews assigned to the work.
    #[serde(default)]
    pub performers: Vec<String>,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Short working note.
    #[serde(default)]
    pub note: String,
    /// Material requirement lines.
    #[serde(default)]
    pub materials: Vec<MaterialLine>,
    /// Expenses recorded against this item.
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(serde_json::to_value(ItemStatus::Todo).unwrap(), "todo");
        assert_eq!(
            serde_json::to_value(ItemStatus::InProgress).unwrap(),
            "in_progress"
        );
        assert_eq!(serde_json::to_value(ItemStatus::Blocked).unwrap(), "blocked");
        assert_eq!(serde_json::to_value(ItemStatus::Done).unwrap(), "done");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result: Result<ItemStatus, _> = serde_json::from_value(json!("paused"));
        assert!(result.is_err());
    }

    #[test]
    fn test_minimal_item_deserializes_with_defaults() {
        let item: Item = serde_json::from_value(json!({
            "id": "i-1",
            "sectionId": "s-1",
            "title": "Rough-in"
        }))
        .unwrap();
        assert_eq!(item.status, ItemStatus::Todo);
        assert_eq!(item.estimate, 0.0);
        assert!(item.unit_id.is_none());
        assert!(item.materials.is_empty());
        assert!(item.expenses.is_empty());
    }

    #[test]
    fn test_material_line_wire_shape() {
        let line = MaterialLine {
            id: "ml-1".into(),
            material_id: "copper-pipe".into(),
            quantity: 10.0,
            url: "https://vendor.example/pipe".into(),
            note: None,
        };
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["materialId"], "copper-pipe");
        assert!(value.get("note").is_none());
    }
}
