//! # Material Roll-Up Query
//!
//! Derived quantity totals per material, computed on demand from the
//! validated document. Nothing here is stored: caching these numbers
//! could diverge from the source collections, so callers recompute.
//!
//! Required quantity sums item material lines; purchased quantity sums
//! ledger entries with the sign implied by the entry type (purchases add,
//! adjustments subtract).

use std::collections::BTreeMap;

use renovo_model::Project;

/// Derived quantity totals for one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRollup {
    /// Catalog entry (or historical material id from the ledger).
    pub material_id: String,
    /// Total quantity required across item material lines.
    pub required_qty: f64,
    /// Net quantity purchased per the ledger.
    pub purchased_qty: f64,
    /// `required_qty - purchased_qty`.
    pub remaining_qty: f64,
}

/// Roll up one material's quantities.
pub fn material_rollup(project: &Project, material_id: &str) -> MaterialRollup {
    let required_qty: f64 = project
        .items
        .iter()
        .flat_map(|item| item.materials.iter())
        .filter(|line| line.material_id == material_id)
        .map(|line| line.quantity)
        .sum();
    let purchased_qty: f64 = project
        .purchase_ledger
        .iter()
        .filter(|entry| entry.material_id == material_id)
        .map(|entry| entry.signed_quantity())
        .sum();
    MaterialRollup {
        material_id: material_id.to_string(),
        required_qty,
        purchased_qty,
        remaining_qty: required_qty - purchased_qty,
    }
}

/// Roll up every material that appears in an item material line or a
/// ledger entry, sorted by material id.
///
/// Materials that exist only in the ledger (the catalog entry was deleted
/// later) still appear; ledger rows are history, not live references.
pub fn project_rollup(project: &Project) -> Vec<MaterialRollup> {
    let mut ids: BTreeMap<&str, ()> = BTreeMap::new();
    for item in &project.items {
        for line in &item.materials {
            ids.insert(&line.material_id, ());
        }
    }
    for entry in &project.purchase_ledger {
        ids.insert(&entry.material_id, ());
    }
    ids.keys()
        .map(|id| material_rollup(project, id))
        .collect()
}
