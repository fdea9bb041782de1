//! # Legacy Document Migrator
//!
//! Backward-compatible defaulting and renaming for older document shapes,
//! applied to the untyped parse result before validation ever sees it.
//!
//! Passes run in a fixed order:
//!
//! 1. Section position backfill and dense renumbering.
//! 2. Unit/room defaulting (`units` defaults empty, the obsolete
//!    `kitchen_living_area` room type becomes `kitchen`, negative or
//!    non-integer `bedrooms` reset to 0).
//! 3. Material category seeding (the reserved `uncategorized` category)
//!    and dense sort-order normalization.
//! 4. Material catalog backfill: legacy inline `name`/`unitType` material
//!    lines on items are upserted into the catalog and rewritten to
//!    reference the resulting catalog id.
//! 5. Empty-array defaulting for the remaining collections.
//!
//! ## Invariant
//!
//! Migration is idempotent: running it twice on an already-migrated
//! document produces no further change. Shapes that cannot be defaulted
//! are left in place for the validation engine to reject — migration
//! never drops data silently.

use renovo_core::slugify;
use renovo_model::UNCATEGORIZED_CATEGORY_ID;
use serde_json::{json, Map, Value};

/// Apply all migration passes to a parsed document.
pub fn migrate(mut doc: Value) -> Value {
    if let Some(obj) = doc.as_object_mut() {
        backfill_section_positions(obj);
        default_units(obj);
        seed_material_categories(obj);
        backfill_material_catalog(obj);
        default_collections(obj);
    }
    doc
}

/// Ensure `key` holds an array, defaulting to empty.
fn ensure_array(obj: &mut Map<String, Value>, key: &str) {
    if !obj.get(key).map(Value::is_array).unwrap_or(false) {
        obj.insert(key.to_string(), json!([]));
    }
}

/// Pass 1: assign index-based positions to sections missing a valid one,
/// then renumber the whole collection densely (stable by position, ties by
/// document order).
fn backfill_section_positions(obj: &mut Map<String, Value>) {
    ensure_array(obj, "sections");
    let sections = match obj.get_mut("sections").and_then(Value::as_array_mut) {
        Some(s) => s,
        None => return,
    };

    let mut order: Vec<(usize, u64)> = sections
        .iter()
        .enumerate()
        .map(|(idx, section)| {
            let pos = section
                .get("position")
                .and_then(Value::as_u64)
                .unwrap_or(idx as u64);
            (idx, pos)
        })
        .collect();
    order.sort_by_key(|&(idx, pos)| (pos, idx));

    let mut dense = vec![0usize; sections.len()];
    for (new_pos, &(idx, _)) in order.iter().enumerate() {
        dense[idx] = new_pos;
    }
    for (idx, section) in sections.iter_mut().enumerate() {
        if let Some(map) = section.as_object_mut() {
            map.insert("position".to_string(), json!(dense[idx]));
        }
    }
}

/// Pass 2: unit and room defaulting.
fn default_units(obj: &mut Map<String, Value>) {
    ensure_array(obj, "units");
    let units = match obj.get_mut("units").and_then(Value::as_array_mut) {
        Some(u) => u,
        None => return,
    };

    for unit in units.iter_mut() {
        let unit = match unit.as_object_mut() {
            Some(u) => u,
            None => continue,
        };

        let bedrooms = normalize_bedrooms(unit.get("bedrooms"));
        unit.insert("bedrooms".to_string(), json!(bedrooms));

        if let Some(rooms) = unit.get_mut("rooms").and_then(Value::as_array_mut) {
            for room in rooms.iter_mut() {
                if let Some(room) = room.as_object_mut() {
                    if room.get("roomType").and_then(Value::as_str)
                        == Some("kitchen_living_area")
                    {
                        room.insert("roomType".to_string(), json!("kitchen"));
                    }
                }
            }
        } else {
            unit.insert("rooms".to_string(), json!([]));
        }
    }
}

/// Reset negative or non-integer bedroom counts to 0; accept
/// integer-valued floats written by older clients.
fn normalize_bedrooms(value: Option<&Value>) -> u64 {
    match value {
        Some(v) => {
            if let Some(n) = v.as_u64() {
                n
            } else if let Some(f) = v.as_f64() {
                if f >= 0.0 && f.fract() == 0.0 {
                    f as u64
                } else {
                    0
                }
            } else {
                0
            }
        }
        None => 0,
    }
}

/// Pass 3: ensure the reserved uncategorized category exists and renumber
/// sort orders densely.
fn seed_material_categories(obj: &mut Map<String, Value>) {
    ensure_array(obj, "materialCategories");
    let categories = match obj.get_mut("materialCategories").and_then(Value::as_array_mut) {
        Some(c) => c,
        None => return,
    };

    let has_reserved = categories.iter().any(|c| {
        c.get("id").and_then(Value::as_str) == Some(UNCATEGORIZED_CATEGORY_ID)
    });
    if !has_reserved {
        categories.push(json!({
            "id": UNCATEGORIZED_CATEGORY_ID,
            "name": "Uncategorized",
            "sortOrder": categories.len(),
        }));
    }

    let mut order: Vec<(usize, u64)> = categories
        .iter()
        .enumerate()
        .map(|(idx, category)| {
            let sort = category
                .get("sortOrder")
                .and_then(Value::as_u64)
                .unwrap_or(idx as u64);
            (idx, sort)
        })
        .collect();
    order.sort_by_key(|&(idx, sort)| (sort, idx));

    let mut dense = vec![0usize; categories.len()];
    for (new_sort, &(idx, _)) in order.iter().enumerate() {
        dense[idx] = new_sort;
    }
    for (idx, category) in categories.iter_mut().enumerate() {
        if let Some(map) = category.as_object_mut() {
            map.insert("sortOrder".to_string(), json!(dense[idx]));
        }
    }
}

/// Pass 4: upsert legacy inline material lines into the catalog.
///
/// A legacy line carries `name`/`unitType` instead of `materialId`. The
/// catalog is matched case-insensitively on name + unit type; a miss
/// creates a new entry under the reserved category with a slugified id.
/// The line is then rewritten to reference the catalog id.
fn backfill_material_catalog(obj: &mut Map<String, Value>) {
    ensure_array(obj, "materialCatalog");
    ensure_array(obj, "items");

    // Work on an owned copy of the catalog so items can be walked mutably.
    let mut catalog: Vec<Value> = obj
        .get("materialCatalog")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if let Some(items) = obj.get_mut("items").and_then(Value::as_array_mut) {
        for item in items.iter_mut() {
            let materials = match item
                .get_mut("materials")
                .and_then(Value::as_array_mut)
            {
                Some(m) => m,
                None => continue,
            };
            for line in materials.iter_mut() {
                let line = match line.as_object_mut() {
                    Some(l) => l,
                    None => continue,
                };
                if line.contains_key("materialId") {
                    continue;
                }
                let name = match line.get("name").and_then(Value::as_str) {
                    Some(n) => n.to_string(),
                    None => continue,
                };
                let unit_type = line
                    .get("unitType")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();

                let material_id = upsert_catalog_entry(&mut catalog, &name, &unit_type);
                line.insert("materialId".to_string(), json!(material_id));
                line.remove("name");
                line.remove("unitType");
            }
        }
    }

    obj.insert("materialCatalog".to_string(), Value::Array(catalog));
}

/// Find a catalog entry by case-insensitive name + unit type, creating one
/// under the reserved category when absent. Returns the catalog id.
fn upsert_catalog_entry(catalog: &mut Vec<Value>, name: &str, unit_type: &str) -> String {
    let name_lower = name.to_lowercase();
    let unit_lower = unit_type.to_lowercase();

    for entry in catalog.iter() {
        let entry_name = entry.get("name").and_then(Value::as_str).unwrap_or("");
        let entry_unit = entry.get("unitType").and_then(Value::as_str).unwrap_or("");
        if entry_name.to_lowercase() == name_lower && entry_unit.to_lowercase() == unit_lower {
            if let Some(id) = entry.get("id").and_then(Value::as_str) {
                return id.to_string();
            }
        }
    }

    let mut id = slugify(name);
    let taken = |candidate: &str, catalog: &[Value]| {
        catalog
            .iter()
            .any(|e| e.get("id").and_then(Value::as_str) == Some(candidate))
    };
    let mut suffix = 2;
    while taken(&id, catalog) {
        id = format!("{}-{}", slugify(name), suffix);
        suffix += 1;
    }

    catalog.push(json!({
        "id": id,
        "categoryId": UNCATEGORIZED_CATEGORY_ID,
        "name": name,
        "unitType": unit_type,
    }));
    id
}

/// Pass 5: empty-array defaulting for collections older documents omit.
fn default_collections(obj: &mut Map<String, Value>) {
    for key in [
        "serviceSections",
        "purchaseInvoices",
        "purchaseLedger",
        "notes",
        "attachments",
    ] {
        ensure_array(obj, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_doc() -> Value {
        json!({
            "id": "p-1",
            "name": "Maple St 12",
            "sections": [
                {"id": "s-b", "title": "B"},
                {"id": "s-a", "title": "A", "position": 0},
                {"id": "s-c", "title": "C", "position": 7}
            ],
            "items": [{
                "id": "i-1", "sectionId": "s-a", "title": "Rough-in",
                "materials": [
                    {"id": "ml-1", "name": "Copper Pipe", "unitType": "m", "quantity": 10.0, "url": ""},
                    {"id": "ml-2", "materialId": "grout", "quantity": 2.0, "url": ""}
                ]
            }],
            "units": [{
                "id": "u-1", "name": "Main", "bedrooms": -2,
                "rooms": [{"id": "r-1", "roomType": "kitchen_living_area",
                           "widthMm": 3000, "lengthMm": 4000, "heightMm": 2700}]
            }],
            "materialCatalog": [
                {"id": "grout", "categoryId": "uncategorized", "name": "Grout", "unitType": "kg"}
            ]
        })
    }

    #[test]
    fn test_section_positions_become_dense() {
        let doc = migrate(legacy_doc());
        let sections = doc["sections"].as_array().unwrap();
        let mut positions: Vec<u64> = sections
            .iter()
            .map(|s| s["position"].as_u64().unwrap())
            .collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 1, 2]);
        // s-b backfills to its index (0) and ties with s-a's explicit 0;
        // ties resolve by document order, s-c (7) sorts last.
        assert_eq!(doc["sections"][0]["position"], 0);
        assert_eq!(doc["sections"][1]["position"], 1);
        assert_eq!(doc["sections"][2]["position"], 2);
    }

    #[test]
    fn test_negative_bedrooms_reset() {
        let doc = migrate(legacy_doc());
        assert_eq!(doc["units"][0]["bedrooms"], 0);
    }

    #[test]
    fn test_integer_valued_float_bedrooms_kept() {
        let doc = migrate(json!({
            "id": "p", "name": "n",
            "units": [{"id": "u-1", "name": "Main", "bedrooms": 2.0}]
        }));
        assert_eq!(doc["units"][0]["bedrooms"], 2);
    }

    #[test]
    fn test_fractional_bedrooms_reset() {
        let doc = migrate(json!({
            "id": "p", "name": "n",
            "units": [{"id": "u-1", "name": "Main", "bedrooms": 2.5}]
        }));
        assert_eq!(doc["units"][0]["bedrooms"], 0);
    }

    #[test]
    fn test_combined_room_type_rewritten() {
        let doc = migrate(legacy_doc());
        assert_eq!(doc["units"][0]["rooms"][0]["roomType"], "kitchen");
    }

    #[test]
    fn test_uncategorized_category_seeded() {
        let doc = migrate(legacy_doc());
        let categories = doc["materialCategories"].as_array().unwrap();
        assert!(categories
            .iter()
            .any(|c| c["id"] == UNCATEGORIZED_CATEGORY_ID));
    }

    #[test]
    fn test_category_sort_orders_become_dense() {
        let doc = migrate(json!({
            "id": "p", "name": "n",
            "materialCategories": [
                {"id": "plumbing", "name": "Plumbing", "sortOrder": 5},
                {"id": "uncategorized", "name": "Uncategorized", "sortOrder": 5}
            ]
        }));
        let sorts: Vec<u64> = doc["materialCategories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["sortOrder"].as_u64().unwrap())
            .collect();
        assert_eq!(sorts, vec![0, 1]);
    }

    #[test]
    fn test_inline_material_upserted_and_line_rewritten() {
        let doc = migrate(legacy_doc());
        let line = &doc["items"][0]["materials"][0];
        assert_eq!(line["materialId"], "copper-pipe");
        assert!(line.get("name").is_none());
        assert!(line.get("unitType").is_none());

        let catalog = doc["materialCatalog"].as_array().unwrap();
        let entry = catalog
            .iter()
            .find(|e| e["id"] == "copper-pipe")
            .expect("backfilled catalog entry");
        assert_eq!(entry["categoryId"], UNCATEGORIZED_CATEGORY_ID);
        assert_eq!(entry["name"], "Copper Pipe");
        assert_eq!(entry["unitType"], "m");
    }

    #[test]
    fn test_inline_material_matches_existing_case_insensitively() {
        let doc = migrate(json!({
            "id": "p", "name": "n",
            "items": [{
                "id": "i-1", "sectionId": "s-1", "title": "t",
                "materials": [
                    {"id": "ml-1", "name": "GROUT", "unitType": "KG", "quantity": 1.0, "url": ""}
                ]
            }],
            "materialCatalog": [
                {"id": "grout", "categoryId": "uncategorized", "name": "Grout", "unitType": "kg"}
            ]
        }));
        assert_eq!(doc["items"][0]["materials"][0]["materialId"], "grout");
        assert_eq!(doc["materialCatalog"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_slug_collision_gets_suffix() {
        let doc = migrate(json!({
            "id": "p", "name": "n",
            "items": [{
                "id": "i-1", "sectionId": "s-1", "title": "t",
                "materials": [
                    {"id": "ml-1", "name": "Grout", "unitType": "bag", "quantity": 1.0, "url": ""}
                ]
            }],
            // Same slug id, different unit type: no match, id is taken.
            "materialCatalog": [
                {"id": "grout", "categoryId": "uncategorized", "name": "Grout", "unitType": "kg"}
            ]
        }));
        assert_eq!(doc["items"][0]["materials"][0]["materialId"], "grout-2");
    }

    #[test]
    fn test_absent_collections_default_empty() {
        let doc = migrate(json!({"id": "p", "name": "n"}));
        for key in [
            "sections",
            "items",
            "units",
            "materialCatalog",
            "serviceSections",
            "purchaseInvoices",
            "purchaseLedger",
            "notes",
            "attachments",
        ] {
            assert!(doc[key].as_array().is_some(), "missing {key}");
            assert!(doc[key].as_array().unwrap().is_empty(), "{key} not empty");
        }
    }

    #[test]
    fn test_migration_is_idempotent() {
        let once = migrate(legacy_doc());
        let twice = migrate(once.clone());
        assert_eq!(once, twice);
    }

    proptest::proptest! {
        // Dense renumbering must be stable under re-migration no matter
        // how gappy or duplicated the stored positions are.
        #[test]
        fn prop_migration_idempotent_over_positions(
            positions in proptest::collection::vec(
                proptest::option::of(0u64..20), 0..8
            )
        ) {
            let sections: Vec<Value> = positions
                .iter()
                .enumerate()
                .map(|(i, pos)| {
                    let mut section = json!({"id": format!("s-{i}"), "title": format!("S{i}")});
                    if let Some(p) = pos {
                        section["position"] = json!(p);
                    }
                    section
                })
                .collect();
            let doc = json!({"id": "p", "name": "n", "sections": sections});

            let once = migrate(doc);
            let twice = migrate(once.clone());
            proptest::prop_assert_eq!(&once, &twice);

            let mut seen: Vec<u64> = once["sections"]
                .as_array()
                .unwrap()
                .iter()
                .map(|s| s["position"].as_u64().unwrap())
                .collect();
            seen.sort_unstable();
            let expected: Vec<u64> = (0..positions.len() as u64).collect();
            proptest::prop_assert_eq!(seen, expected);
        }
    }
}
