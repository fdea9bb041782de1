//! # Ordering Normalization
//!
//! Derived-order maintenance for the two ordered collections: section
//! `position` and material category `sortOrder`.
//!
//! The mutation manager re-runs [`normalize_ordering`] on every transform
//! candidate, so operation code never renumbers by hand — it may leave
//! gaps or duplicates behind (after a delete, say) and the pass absorbs
//! them. Reorder operations splice within the normalized snapshot and are
//! then densified the same way; out-of-range targets clamp to the ends.

use renovo_model::Project;

/// Re-assign dense zero-based orderings to sections and material
/// categories, stable with respect to the current order values.
///
/// The collections are physically sorted as well, so serialized documents
/// list ordered entities in display order.
pub fn normalize_ordering(project: &mut Project) {
    project.sections.sort_by_key(|s| s.position);
    for (index, section) in project.sections.iter_mut().enumerate() {
        section.position = index;
    }

    project.material_categories.sort_by_key(|c| c.sort_order);
    for (index, category) in project.material_categories.iter_mut().enumerate() {
        category.sort_order = index;
    }
}

/// Splice the element matching `matches` to `target` within `items`,
/// clamping `target` to the collection bounds. Returns `false` when no
/// element matches.
///
/// This is a full re-index, not a swap: every element after the splice
/// point shifts, and the caller's normalization pass re-assigns dense
/// order values afterwards.
pub fn splice_to_index<T>(
    items: &mut Vec<T>,
    matches: impl Fn(&T) -> bool,
    target: usize,
) -> bool {
    let from = match items.iter().position(matches) {
        Some(i) => i,
        None => return false,
    };
    let element = items.remove(from);
    let target = target.min(items.len());
    items.insert(target, element);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use renovo_model::Section;
    use serde_json::json;

    fn project_with_positions(positions: &[usize]) -> Project {
        let sections: Vec<_> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                json!({"id": format!("s-{i}"), "title": format!("S{i}"), "position": p})
            })
            .collect();
        serde_json::from_value(json!({
            "id": "p-1", "name": "n",
            "sections": sections,
            "materialCategories": [
                {"id": "uncategorized", "name": "Uncategorized", "sortOrder": 0}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_gaps_are_closed() {
        let mut project = project_with_positions(&[0, 4, 9]);
        normalize_ordering(&mut project);
        let positions: Vec<usize> = project.sections.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(project.sections[2].id, "s-2");
    }

    #[test]
    fn test_duplicates_resolve_by_stable_order() {
        let mut project = project_with_positions(&[1, 1, 0]);
        normalize_ordering(&mut project);
        let order: Vec<&str> = project.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["s-2", "s-0", "s-1"]);
    }

    #[test]
    fn test_splice_moves_and_shifts() {
        let mut items: Vec<Section> = (0..4)
            .map(|i| Section {
                id: format!("s-{i}"),
                title: String::new(),
                description: String::new(),
                position: i,
            })
            .collect();
        assert!(splice_to_index(&mut items, |s| s.id == "s-3", 0));
        let order: Vec<&str> = items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["s-3", "s-0", "s-1", "s-2"]);
    }

    #[test]
    fn test_splice_clamps_out_of_range_target() {
        let mut items: Vec<Section> = (0..3)
            .map(|i| Section {
                id: format!("s-{i}"),
                title: String::new(),
                description: String::new(),
                position: i,
            })
            .collect();
        assert!(splice_to_index(&mut items, |s| s.id == "s-0", 99));
        let order: Vec<&str> = items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["s-1", "s-2", "s-0"]);
    }

    #[test]
    fn test_splice_unknown_id_is_noop() {
        let mut items: Vec<Section> = vec![];
        assert!(!splice_to_index(&mut items, |s: &Section| s.id == "s-9", 0));
    }

    proptest::proptest! {
        #[test]
        fn prop_normalize_always_yields_dense_ordering(
            positions in proptest::collection::vec(0usize..50, 0..12)
        ) {
            let mut project = project_with_positions(&positions);
            normalize_ordering(&mut project);
            let got: Vec<usize> = project.sections.iter().map(|s| s.position).collect();
            let expected: Vec<usize> = (0..positions.len()).collect();
            proptest::prop_assert_eq!(got, expected);
        }

        #[test]
        fn prop_normalize_idempotent(
            positions in proptest::collection::vec(0usize..50, 0..12)
        ) {
            let mut project = project_with_positions(&positions);
            normalize_ordering(&mut project);
            let once = project.clone();
            normalize_ordering(&mut project);
            proptest::prop_assert_eq!(project, once);
        }
    }
}
