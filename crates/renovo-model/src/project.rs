//! # Project — The Root Aggregate
//!
//! One renovation project, one JSON document. The project owns all child
//! collections by composition; no child has independent store identity.
//!
//! Lookup helpers here are read-only conveniences used by the store's
//! operation transforms. Mutation goes through the store's transaction
//! manager, never directly through this type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::invoice::PurchaseInvoice;
use crate::item::Item;
use crate::ledger::LedgerEntry;
use crate::material::{CatalogItem, MaterialCategory};
use crate::note::Note;
use crate::section::Section;
use crate::service::ServiceSection;
use crate::unit::Unit;

/// Structured overview block shown on the project dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    /// One-paragraph summary of the project.
    #[serde(default)]
    pub summary: String,
    /// Total budget in the project currency, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_total: Option<f64>,
    /// Planned start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// A full renovation project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Street address of the property.
    #[serde(default)]
    pub address: String,
    /// Free-form phase label, e.g. `"design"`, `"construction"`.
    #[serde(default)]
    pub phase: String,
    /// Target completion date, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_completion_date: Option<NaiveDate>,
    /// Dashboard overview block.
    #[serde(default)]
    pub overview: ProjectOverview,
    /// Ordered work-breakdown sections.
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Work items across all sections.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Units/rooms of the property.
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Ordered material categories.
    #[serde(default)]
    pub material_categories: Vec<MaterialCategory>,
    /// Reusable material catalog.
    #[serde(default)]
    pub material_catalog: Vec<CatalogItem>,
    /// Building services tree.
    #[serde(default)]
    pub service_sections: Vec<ServiceSection>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Vec<Note>,
    /// File attachment metadata.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Purchase invoices.
    #[serde(default)]
    pub purchase_invoices: Vec<PurchaseInvoice>,
    /// Append-only purchase ledger, newest entries first.
    #[serde(default)]
    pub purchase_ledger: Vec<LedgerEntry>,
}

impl Project {
    /// Look up a section by id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Look up a section by id, mutably.
    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Look up an item by id.
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Look up an item by id, mutably.
    pub fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Look up a unit by id.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Look up a unit by id, mutably.
    pub fn unit_mut(&mut self, id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Look up a material category by id.
    pub fn material_category(&self, id: &str) -> Option<&MaterialCategory> {
        self.material_categories.iter().find(|c| c.id == id)
    }

    /// Look up a catalog entry by id.
    pub fn catalog_item(&self, id: &str) -> Option<&CatalogItem> {
        self.material_catalog.iter().find(|m| m.id == id)
    }

    /// Look up a catalog entry by id, mutably.
    pub fn catalog_item_mut(&mut self, id: &str) -> Option<&mut CatalogItem> {
        self.material_catalog.iter_mut().find(|m| m.id == id)
    }

    /// Look up a service section by id.
    pub fn service_section(&self, id: &str) -> Option<&ServiceSection> {
        self.service_sections.iter().find(|s| s.id == id)
    }

    /// Look up a service section by id, mutably.
    pub fn service_section_mut(&mut self, id: &str) -> Option<&mut ServiceSection> {
        self.service_sections.iter_mut().find(|s| s.id == id)
    }

    /// Look up a note by id, mutably.
    pub fn note_mut(&mut self, id: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Look up an attachment by id.
    pub fn attachment(&self, id: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.id == id)
    }

    /// Look up an attachment by id, mutably.
    pub fn attachment_mut(&mut self, id: &str) -> Option<&mut Attachment> {
        self.attachments.iter_mut().find(|a| a.id == id)
    }

    /// Look up an invoice by id.
    pub fn invoice(&self, id: &str) -> Option<&PurchaseInvoice> {
        self.purchase_invoices.iter().find(|i| i.id == id)
    }

    /// Look up an invoice by id, mutably.
    pub fn invoice_mut(&mut self, id: &str) -> Option<&mut PurchaseInvoice> {
        self.purchase_invoices.iter_mut().find(|i| i.id == id)
    }

    /// Whether any item anywhere carries an expense with this id.
    pub fn has_expense(&self, expense_id: &str) -> bool {
        self.items
            .iter()
            .any(|i| i.expenses.iter().any(|e| e.id == expense_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_document_deserializes() {
        let project: Project = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Maple St 12"
        }))
        .unwrap();
        assert!(project.sections.is_empty());
        assert!(project.purchase_ledger.is_empty());
        assert_eq!(project.overview, ProjectOverview::default());
    }

    #[test]
    fn test_serialized_document_carries_collections() {
        let project: Project = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Maple St 12"
        }))
        .unwrap();
        let value = serde_json::to_value(&project).unwrap();
        // Full-document persistence: every collection appears even when empty.
        for key in [
            "sections",
            "items",
            "units",
            "materialCategories",
            "materialCatalog",
            "serviceSections",
            "notes",
            "attachments",
            "purchaseInvoices",
            "purchaseLedger",
        ] {
            assert!(value.get(key).is_some(), "missing collection {key}");
        }
    }

    #[test]
    fn test_lookup_helpers() {
        let project: Project = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Maple St 12",
            "sections": [{"id": "s-1", "title": "Demo", "position": 0}],
            "items": [{
                "id": "i-1", "sectionId": "s-1", "title": "Strip walls",
                "expenses": [{"id": "e-1", "amount": 120.0}]
            }]
        }))
        .unwrap();
        assert!(project.section("s-1").is_some());
        assert!(project.section("s-2").is_none());
        assert!(project.item("i-1").is_some());
        assert!(project.has_expense("e-1"));
        assert!(!project.has_expense("e-2"));
    }
}
