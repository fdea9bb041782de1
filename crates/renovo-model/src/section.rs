//! # Section — Ordered Work Breakdown
//!
//! Sections partition a project into ordered chunks of work ("Demolition",
//! "Plumbing", ...). Items belong to exactly one section.
//!
//! ## Invariant
//!
//! `position` values across all sections of a project form a dense,
//! zero-based permutation of `0..len` — no gaps, no duplicates. The store's
//! normalization pass re-assigns positions after every mutation; the
//! validation engine re-verifies them.

use serde::{Deserialize, Serialize};

/// A single section of the project work breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section id, unique within the project.
    pub id: String,
    /// Display title, e.g. `"Plumbing"`.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Zero-based position in the section ordering.
    pub position: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_is_camel_case() {
        let section = Section {
            id: "s-1".into(),
            title: "Plumbing".into(),
            description: "Pipes".into(),
            position: 2,
        };
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["id"], "s-1");
        assert_eq!(value["position"], 2);
        assert!(value.get("description").is_some());
    }

    #[test]
    fn test_description_defaults_empty() {
        let section: Section =
            serde_json::from_value(serde_json::json!({
                "id": "s-1", "title": "Demo", "position": 0
            }))
            .unwrap();
        assert_eq!(section.description, "");
    }
}
