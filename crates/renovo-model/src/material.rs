//! # Material Categories and Catalog
//!
//! The catalog is the project-level list of reusable material definitions
//! referenced by item material lines and invoice lines. Categories group
//! catalog entries and carry the same dense `sortOrder` invariant as
//! section positions.
//!
//! ## Reserved Category
//!
//! The `"uncategorized"` category always exists and cannot be deleted.
//! Deleting any other category reassigns its catalog members to it.

use serde::{Deserialize, Serialize};

/// Id of the reserved category that absorbs orphaned catalog entries.
pub const UNCATEGORIZED_CATEGORY_ID: &str = "uncategorized";

/// A grouping of catalog entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialCategory {
    /// Category id, unique within the project.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Zero-based position in the category ordering.
    pub sort_order: usize,
}

impl MaterialCategory {
    /// The reserved category that every project carries.
    pub fn uncategorized(sort_order: usize) -> Self {
        Self {
            id: UNCATEGORIZED_CATEGORY_ID.to_string(),
            name: "Uncategorized".to_string(),
            description: None,
            sort_order,
        }
    }
}

/// A reusable material definition in the project catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Catalog id, unique within the project (often a slug like
    /// `"copper-pipe"`).
    pub id: String,
    /// Owning category; must reference an existing category.
    pub category_id: String,
    /// Display name.
    pub name: String,
    /// Unit of measure, e.g. `"m"`, `"pcs"`, `"m2"`.
    pub unit_type: String,
    /// Estimated unit price, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<f64>,
    /// URL of a reference sample or product page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_url: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncategorized_constructor() {
        let cat = MaterialCategory::uncategorized(0);
        assert_eq!(cat.id, UNCATEGORIZED_CATEGORY_ID);
        assert_eq!(cat.name, "Uncategorized");
        assert_eq!(cat.sort_order, 0);
    }

    #[test]
    fn test_catalog_item_wire_shape() {
        let entry: CatalogItem = serde_json::from_value(serde_json::json!({
            "id": "copper-pipe",
            "categoryId": "plumbing",
            "name": "Copper pipe 22mm",
            "unitType": "m"
        }))
        .unwrap();
        assert_eq!(entry.category_id, "plumbing");
        assert!(entry.estimated_price.is_none());
    }
}
