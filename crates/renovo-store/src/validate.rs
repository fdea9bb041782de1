//! # Validation Engine
//!
//! Pure, total, side-effect-free validation of a parsed document.
//!
//! Field types and enum memberships are enforced by the typed serde decode
//! of [`Project`]; everything serde cannot express — referential integrity,
//! dense orderings, id uniqueness, scope rules — is checked here, entity by
//! entity, with stable messages naming the offending field and id.
//!
//! ## Trust Boundary
//!
//! Validation runs twice around every mutation: after loading (defense
//! against on-disk corruption) and immediately before persisting (defense
//! against an in-memory transform that broke an invariant). The first
//! violation found is returned; callers and tests match on substrings of
//! these messages, so the wording is part of the contract.

use std::collections::HashSet;

use renovo_core::RepoError;
use renovo_model::{AttachmentScope, Project, UNCATEGORIZED_CATEGORY_ID};
use serde_json::Value;

/// Decode and validate an untyped document into a typed, invariant-holding
/// [`Project`].
pub fn validate(doc: &Value) -> Result<Project, RepoError> {
    let project: Project = serde_json::from_value(doc.clone()).map_err(|e| {
        RepoError::validation("Project", format!("document failed to decode: {e}."))
    })?;
    check_invariants(&project)?;
    Ok(project)
}

/// Verify every cross-entity invariant on an already-typed project.
///
/// Used directly by the mutation manager on transform candidates, where no
/// re-decode is needed.
pub fn check_invariants(project: &Project) -> Result<(), RepoError> {
    check_unique_ids(project)?;
    check_section_positions(project)?;
    check_material_categories(project)?;
    check_catalog(project)?;
    check_items(project)?;
    check_notes(project)?;
    check_attachments(project)?;
    check_invoices(project)?;
    check_ledger(project)?;
    Ok(())
}

fn duplicate_of<'a>(ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Some(id);
        }
    }
    None
}

fn check_unique_ids(project: &Project) -> Result<(), RepoError> {
    let collections: [(&str, Vec<&str>); 8] = [
        ("Section.id", project.sections.iter().map(|s| s.id.as_str()).collect()),
        ("Item.id", project.items.iter().map(|i| i.id.as_str()).collect()),
        ("Unit.id", project.units.iter().map(|u| u.id.as_str()).collect()),
        (
            "MaterialCategory.id",
            project.material_categories.iter().map(|c| c.id.as_str()).collect(),
        ),
        (
            "CatalogItem.id",
            project.material_catalog.iter().map(|m| m.id.as_str()).collect(),
        ),
        ("Note.id", project.notes.iter().map(|n| n.id.as_str()).collect()),
        (
            "Attachment.id",
            project.attachments.iter().map(|a| a.id.as_str()).collect(),
        ),
        (
            "PurchaseInvoice.id",
            project.purchase_invoices.iter().map(|i| i.id.as_str()).collect(),
        ),
    ];
    for (field, ids) in collections {
        if let Some(dup) = duplicate_of(ids.into_iter()) {
            return Err(RepoError::validation(
                field,
                format!("\"{dup}\" is duplicated."),
            ));
        }
    }

    // Expense ids are referenced by expense-scoped attachments, so they
    // must be unique across the whole project, not just within one item.
    let expense_ids = project
        .items
        .iter()
        .flat_map(|i| i.expenses.iter().map(|e| e.id.as_str()));
    if let Some(dup) = duplicate_of(expense_ids) {
        return Err(RepoError::validation(
            "Expense.id",
            format!("\"{dup}\" is duplicated."),
        ));
    }

    for item in &project.items {
        if let Some(dup) = duplicate_of(item.materials.iter().map(|m| m.id.as_str())) {
            return Err(RepoError::validation(
                "Item.materials.id",
                format!("\"{dup}\" is duplicated."),
            ));
        }
    }
    for unit in &project.units {
        if let Some(dup) = duplicate_of(unit.rooms.iter().map(|r| r.id.as_str())) {
            return Err(RepoError::validation(
                "Unit.rooms.id",
                format!("\"{dup}\" is duplicated."),
            ));
        }
    }
    if let Some(dup) = duplicate_of(project.service_sections.iter().map(|s| s.id.as_str())) {
        return Err(RepoError::validation(
            "ServiceSection.id",
            format!("\"{dup}\" is duplicated."),
        ));
    }
    for section in &project.service_sections {
        if let Some(dup) = duplicate_of(section.subsections.iter().map(|s| s.id.as_str())) {
            return Err(RepoError::validation(
                "ServiceSection.subsections.id",
                format!("\"{dup}\" is duplicated."),
            ));
        }
        for subsection in &section.subsections {
            if let Some(dup) = duplicate_of(subsection.fields.iter().map(|f| f.id.as_str()))
            {
                return Err(RepoError::validation(
                    "ServiceSection.subsections.fields.id",
                    format!("\"{dup}\" is duplicated."),
                ));
            }
        }
    }
    for invoice in &project.purchase_invoices {
        if let Some(dup) = duplicate_of(invoice.lines.iter().map(|l| l.id.as_str())) {
            return Err(RepoError::validation(
                "PurchaseInvoice.lines.id",
                format!("\"{dup}\" is duplicated."),
            ));
        }
    }
    if let Some(dup) = duplicate_of(project.purchase_ledger.iter().map(|e| e.id.as_str())) {
        return Err(RepoError::validation(
            "LedgerEntry.id",
            format!("\"{dup}\" is duplicated."),
        ));
    }
    Ok(())
}

/// Positions must form a dense zero-based permutation of `0..len`.
fn check_dense(field: &str, mut values: Vec<usize>) -> Result<(), RepoError> {
    let len = values.len();
    values.sort_unstable();
    for (expected, actual) in values.into_iter().enumerate() {
        if expected != actual {
            return Err(RepoError::validation(
                field,
                format!("values must form a dense zero-based ordering 0..{len}."),
            ));
        }
    }
    Ok(())
}

fn check_section_positions(project: &Project) -> Result<(), RepoError> {
    check_dense(
        "Section.position",
        project.sections.iter().map(|s| s.position).collect(),
    )
}

fn check_material_categories(project: &Project) -> Result<(), RepoError> {
    if project.material_category(UNCATEGORIZED_CATEGORY_ID).is_none() {
        return Err(RepoError::validation(
            "MaterialCategory",
            format!("the reserved \"{UNCATEGORIZED_CATEGORY_ID}\" category must exist."),
        ));
    }
    check_dense(
        "MaterialCategory.sortOrder",
        project.material_categories.iter().map(|c| c.sort_order).collect(),
    )
}

fn check_catalog(project: &Project) -> Result<(), RepoError> {
    for entry in &project.material_catalog {
        if project.material_category(&entry.category_id).is_none() {
            return Err(RepoError::validation(
                "CatalogItem.categoryId",
                format!(
                    "\"{}\" must reference an existing category.",
                    entry.category_id
                ),
            ));
        }
    }
    Ok(())
}

fn check_items(project: &Project) -> Result<(), RepoError> {
    for item in &project.items {
        if project.section(&item.section_id).is_none() {
            return Err(RepoError::validation(
                "Item.sectionId",
                format!("\"{}\" must reference an existing section.", item.section_id),
            ));
        }
        if let Some(unit_id) = &item.unit_id {
            if project.unit(unit_id).is_none() {
                return Err(RepoError::validation(
                    "Item.unitId",
                    format!("\"{unit_id}\" must reference an existing unit."),
                ));
            }
        }
        for line in &item.materials {
            if project.catalog_item(&line.material_id).is_none() {
                return Err(RepoError::validation(
                    "Item.materials.materialId",
                    format!(
                        "\"{}\" must reference an existing catalog entry.",
                        line.material_id
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn check_notes(project: &Project) -> Result<(), RepoError> {
    for note in &project.notes {
        if let Some(section_id) = &note.linked_section_id {
            if project.section(section_id).is_none() {
                return Err(RepoError::validation(
                    "Note.linkedSectionId",
                    format!("\"{section_id}\" must reference an existing section."),
                ));
            }
        }
    }
    Ok(())
}

fn check_attachments(project: &Project) -> Result<(), RepoError> {
    for attachment in &project.attachments {
        match (attachment.scope_type, attachment.scope_id.as_deref()) {
            (AttachmentScope::Project, Some(_)) => {
                return Err(RepoError::validation(
                    "Attachment.scopeId",
                    "must be null for project-scoped attachments.",
                ));
            }
            (AttachmentScope::Project, None) => {}
            (scope, None) => {
                return Err(RepoError::validation(
                    "Attachment.scopeId",
                    format!("is required for {scope}-scoped attachments."),
                ));
            }
            (AttachmentScope::Section, Some(id)) => {
                if project.section(id).is_none() {
                    return Err(RepoError::validation(
                        "Attachment.scopeId",
                        format!("\"{id}\" must reference an existing section."),
                    ));
                }
            }
            (AttachmentScope::Item, Some(id)) => {
                if project.item(id).is_none() {
                    return Err(RepoError::validation(
                        "Attachment.scopeId",
                        format!("\"{id}\" must reference an existing item."),
                    ));
                }
            }
            (AttachmentScope::Expense, Some(id)) => {
                if !project.has_expense(id) {
                    return Err(RepoError::validation(
                        "Attachment.scopeId",
                        format!("\"{id}\" must reference an existing expense."),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn check_invoices(project: &Project) -> Result<(), RepoError> {
    for invoice in &project.purchase_invoices {
        match project.attachment(&invoice.attachment_id) {
            None => {
                return Err(RepoError::validation(
                    "PurchaseInvoice.attachmentId",
                    format!(
                        "\"{}\" must reference an existing attachment.",
                        invoice.attachment_id
                    ),
                ));
            }
            Some(attachment)
                if attachment.category != renovo_model::ATTACHMENT_CATEGORY_INVOICE =>
            {
                return Err(RepoError::validation(
                    "PurchaseInvoice.attachmentId",
                    format!(
                        "\"{}\" must reference an attachment of category \"invoice\".",
                        invoice.attachment_id
                    ),
                ));
            }
            Some(_) => {}
        }
        for line in &invoice.lines {
            if let Some(material_id) = &line.material_id {
                if project.catalog_item(material_id).is_none() {
                    return Err(RepoError::validation(
                        "PurchaseInvoice.lines.materialId",
                        format!("\"{material_id}\" must reference an existing catalog entry."),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn check_ledger(project: &Project) -> Result<(), RepoError> {
    for entry in &project.purchase_ledger {
        let invoice = match project.invoice(&entry.invoice_id) {
            Some(i) => i,
            None => {
                return Err(RepoError::validation(
                    "LedgerEntry.invoiceId",
                    format!("\"{}\" must reference an existing invoice.", entry.invoice_id),
                ));
            }
        };
        if invoice.line(&entry.invoice_line_id).is_none() {
            return Err(RepoError::validation(
                "LedgerEntry.invoiceLineId",
                format!(
                    "\"{}\" must reference a line on invoice \"{}\".",
                    entry.invoice_line_id, entry.invoice_id
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_doc() -> Value {
        json!({
            "id": "p-1",
            "name": "Maple St 12",
            "sections": [
                {"id": "s-1", "title": "Demolition", "position": 0},
                {"id": "s-2", "title": "Plumbing", "position": 1}
            ],
            "items": [],
            "units": [],
            "materialCategories": [
                {"id": "uncategorized", "name": "Uncategorized", "sortOrder": 0}
            ],
            "materialCatalog": [],
            "serviceSections": [],
            "notes": [],
            "attachments": [],
            "purchaseInvoices": [],
            "purchaseLedger": []
        })
    }

    #[test]
    fn test_valid_document_decodes() {
        let project = validate(&base_doc()).unwrap();
        assert_eq!(project.sections.len(), 2);
    }

    #[test]
    fn test_round_trip_preserves_project() {
        let project = validate(&base_doc()).unwrap();
        let serialized = serde_json::to_value(&project).unwrap();
        let reloaded = validate(&serialized).unwrap();
        assert_eq!(project, reloaded);
    }

    #[test]
    fn test_bad_enum_value_is_validation_error() {
        let mut doc = base_doc();
        doc["items"] = json!([{
            "id": "i-1", "sectionId": "s-1", "title": "t", "status": "paused"
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(matches!(err, RepoError::Validation { .. }));
    }

    #[test]
    fn test_item_with_unknown_section_rejected() {
        let mut doc = base_doc();
        doc["items"] = json!([{"id": "i-1", "sectionId": "s-9", "title": "t"}]);
        let err = validate(&doc).unwrap_err();
        assert!(err
            .to_string()
            .contains("Item.sectionId \"s-9\" must reference an existing section."));
    }

    #[test]
    fn test_item_with_unknown_unit_rejected() {
        let mut doc = base_doc();
        doc["items"] = json!([{
            "id": "i-1", "sectionId": "s-1", "unitId": "u-9", "title": "t"
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err
            .to_string()
            .contains("Item.unitId \"u-9\" must reference an existing unit."));
    }

    #[test]
    fn test_material_line_with_unknown_catalog_entry_rejected() {
        let mut doc = base_doc();
        doc["items"] = json!([{
            "id": "i-1", "sectionId": "s-1", "title": "t",
            "materials": [{"id": "ml-1", "materialId": "ghost", "quantity": 1.0, "url": ""}]
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("Item.materials.materialId"));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_duplicate_room_ids_rejected() {
        let mut doc = base_doc();
        doc["units"] = json!([{
            "id": "u-1", "name": "Apartment 2B",
            "rooms": [
                {"id": "r-1", "roomType": "kitchen"},
                {"id": "r-1", "roomType": "bathroom"}
            ]
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("Unit.rooms.id"));
        assert!(err.to_string().contains("r-1"));
    }

    #[test]
    fn test_duplicate_service_section_ids_rejected() {
        let mut doc = base_doc();
        doc["serviceSections"] = json!([
            {"id": "sv-1", "name": "Electrical"},
            {"id": "sv-1", "name": "Water"}
        ]);
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("ServiceSection.id"));
    }

    #[test]
    fn test_duplicate_service_subtree_ids_rejected() {
        let mut doc = base_doc();
        doc["serviceSections"] = json!([{
            "id": "sv-1", "name": "Electrical",
            "subsections": [
                {"id": "sv-1-1", "name": "Distribution"},
                {"id": "sv-1-1", "name": "Circuits"}
            ]
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("ServiceSection.subsections.id"));

        let mut doc = base_doc();
        doc["serviceSections"] = json!([{
            "id": "sv-1", "name": "Electrical",
            "subsections": [{
                "id": "sv-1-1", "name": "Distribution",
                "fields": [
                    {"id": "f-1", "name": "Panel rating"},
                    {"id": "f-1", "name": "Breaker count"}
                ]
            }]
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err
            .to_string()
            .contains("ServiceSection.subsections.fields.id"));
    }

    #[test]
    fn test_gapped_section_positions_rejected() {
        let mut doc = base_doc();
        doc["sections"][1]["position"] = json!(2);
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("Section.position"));
    }

    #[test]
    fn test_duplicate_section_positions_rejected() {
        let mut doc = base_doc();
        doc["sections"][1]["position"] = json!(0);
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("Section.position"));
    }

    #[test]
    fn test_duplicate_section_ids_rejected() {
        let mut doc = base_doc();
        doc["sections"][1]["id"] = json!("s-1");
        doc["sections"][1]["position"] = json!(1);
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("Section.id \"s-1\" is duplicated."));
    }

    #[test]
    fn test_missing_uncategorized_rejected() {
        let mut doc = base_doc();
        doc["materialCategories"] = json!([
            {"id": "plumbing", "name": "Plumbing", "sortOrder": 0}
        ]);
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("uncategorized"));
    }

    #[test]
    fn test_catalog_entry_with_unknown_category_rejected() {
        let mut doc = base_doc();
        doc["materialCatalog"] = json!([{
            "id": "copper-pipe", "categoryId": "ghost",
            "name": "Copper pipe", "unitType": "m"
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err
            .to_string()
            .contains("CatalogItem.categoryId \"ghost\" must reference an existing category."));
    }

    #[test]
    fn test_note_with_unknown_section_rejected() {
        let mut doc = base_doc();
        doc["notes"] = json!([{
            "id": "n-1", "title": "t", "content": "", "linkedSectionId": "s-9"
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("Note.linkedSectionId"));
    }

    #[test]
    fn test_project_scoped_attachment_with_scope_id_rejected() {
        let mut doc = base_doc();
        doc["attachments"] = json!([{
            "id": "a-1", "projectId": "p-1", "scopeType": "project",
            "scopeId": "s-1", "category": "photo", "originalName": "x.jpg",
            "mimeType": "image/jpeg", "sizeBytes": 1, "storageKey": "k",
            "uploadedAt": "2026-02-01T10:00:00Z"
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err
            .to_string()
            .contains("Attachment.scopeId must be null for project-scoped attachments."));
    }

    #[test]
    fn test_expense_scoped_attachment_requires_existing_expense() {
        let mut doc = base_doc();
        doc["attachments"] = json!([{
            "id": "a-1", "projectId": "p-1", "scopeType": "expense",
            "scopeId": "e-9", "category": "receipt", "originalName": "x.pdf",
            "mimeType": "application/pdf", "sizeBytes": 1, "storageKey": "k",
            "uploadedAt": "2026-02-01T10:00:00Z"
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err
            .to_string()
            .contains("\"e-9\" must reference an existing expense."));
    }

    #[test]
    fn test_invoice_requires_invoice_category_attachment() {
        let mut doc = base_doc();
        doc["attachments"] = json!([{
            "id": "a-1", "projectId": "p-1", "scopeType": "project",
            "scopeId": null, "category": "photo", "originalName": "x.pdf",
            "mimeType": "application/pdf", "sizeBytes": 1, "storageKey": "k",
            "uploadedAt": "2026-02-01T10:00:00Z"
        }]);
        doc["purchaseInvoices"] = json!([{
            "id": "inv-1", "status": "draft", "projectId": "p-1",
            "attachmentId": "a-1", "createdAt": "2026-02-01T10:00:00Z",
            "updatedAt": "2026-02-01T10:00:00Z"
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err
            .to_string()
            .contains("must reference an attachment of category \"invoice\"."));
    }

    #[test]
    fn test_ledger_entry_must_match_invoice_line() {
        let mut doc = base_doc();
        doc["attachments"] = json!([{
            "id": "a-1", "projectId": "p-1", "scopeType": "project",
            "scopeId": null, "category": "invoice", "originalName": "x.pdf",
            "mimeType": "application/pdf", "sizeBytes": 1, "storageKey": "k",
            "uploadedAt": "2026-02-01T10:00:00Z"
        }]);
        doc["purchaseInvoices"] = json!([{
            "id": "inv-1", "status": "confirmed", "projectId": "p-1",
            "attachmentId": "a-1", "createdAt": "2026-02-01T10:00:00Z",
            "updatedAt": "2026-02-01T10:00:00Z",
            "lines": [{
                "id": "line-1", "quantity": 1.0, "unitPrice": 2.0, "lineTotal": 2.0
            }]
        }]);
        doc["purchaseLedger"] = json!([{
            "id": "led-1", "projectId": "p-1", "invoiceId": "inv-1",
            "invoiceLineId": "line-2", "postedAt": "2026-02-01T11:00:00Z",
            "materialId": "m", "quantity": 1.0, "unitPrice": 2.0,
            "lineTotal": 2.0, "entryType": "purchase"
        }]);
        let err = validate(&doc).unwrap_err();
        assert!(err
            .to_string()
            .contains("LedgerEntry.invoiceLineId \"line-2\" must reference a line on invoice \"inv-1\"."));
    }
}
