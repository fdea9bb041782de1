//! Purchase invoice operations: draft creation, draft edits, and the
//! confirmation that posts ledger rows.
//!
//! Confirmation is the only code path that creates ledger entries. Every
//! payload entry must carry the confirmed invoice's id and reference one
//! of its lines; any mismatch rejects the whole confirmation before the
//! invoice or the ledger is touched.

use chrono::NaiveDate;
use renovo_core::{RepoError, Timestamp};
use renovo_model::{
    InvoiceLine, InvoiceStatus, InvoiceTotals, LedgerEntry, Project, PurchaseInvoice,
    ReviewRecord, ATTACHMENT_CATEGORY_INVOICE,
};
use serde::Deserialize;

use crate::ops::{nullable_field, require_free_id};
use crate::repository::Repository;

/// Patch payload for [`update_invoice_draft`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraftPatch {
    /// New vendor name.
    #[serde(default)]
    pub vendor_name: Option<String>,
    /// New invoice number.
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// New invoice date, or clear it.
    #[serde(default, deserialize_with = "nullable_field")]
    pub invoice_date: Option<Option<NaiveDate>>,
    /// New currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Replace the totals block.
    #[serde(default)]
    pub totals: Option<InvoiceTotals>,
    /// Replace the line list.
    #[serde(default)]
    pub lines: Option<Vec<InvoiceLine>>,
    /// Edit timestamp to stamp on `updatedAt`.
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Store an extraction result as a new draft invoice.
///
/// The invoice arrives fully formed from the extraction collaborator; the
/// repository forces it into `draft` status under this project and checks
/// that its attachment exists with category `"invoice"`.
pub fn create_invoice_draft(
    repo: &Repository,
    project_id: &str,
    mut invoice: PurchaseInvoice,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        require_free_id("invoice", &invoice.id, project.invoice(&invoice.id).is_some())?;
        match project.attachment(&invoice.attachment_id) {
            None => {
                return Err(RepoError::not_found("attachment", &invoice.attachment_id));
            }
            Some(attachment) if attachment.category != ATTACHMENT_CATEGORY_INVOICE => {
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
        invoice.status = InvoiceStatus::Draft;
        invoice.project_id = project.id.clone();
        invoice.confirmed_at = None;
        project.purchase_invoices.push(invoice);
        Ok(())
    })
}

/// Edit a draft invoice. Rejected with a conflict once the invoice has
/// left the draft state.
pub fn update_invoice_draft(
    repo: &Repository,
    project_id: &str,
    invoice_id: &str,
    patch: InvoiceDraftPatch,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        let invoice = project
            .invoice_mut(invoice_id)
            .ok_or_else(|| RepoError::not_found("invoice", invoice_id))?;
        invoice.require_draft()?;
        if let Some(vendor_name) = patch.vendor_name {
            invoice.vendor_name = vendor_name;
        }
        if let Some(invoice_number) = patch.invoice_number {
            invoice.invoice_number = invoice_number;
        }
        if let Some(invoice_date) = patch.invoice_date {
            invoice.invoice_date = invoice_date;
        }
        if let Some(currency) = patch.currency {
            invoice.currency = currency;
        }
        if let Some(totals) = patch.totals {
            invoice.totals = totals;
        }
        if let Some(lines) = patch.lines {
            invoice.lines = lines;
        }
        if let Some(updated_at) = patch.updated_at {
            invoice.updated_at = updated_at;
        }
        Ok(())
    })
}

/// Confirm a draft invoice and post its ledger entries.
///
/// Flips the invoice to `confirmed` (irreversibly), stamps
/// `confirmedAt`/`updatedAt`, and prepends `entries` to the project
/// ledger. Every entry must carry this invoice's id and reference one of
/// its lines; a mismatch rejects the confirmation with nothing written.
pub fn confirm_invoice_draft(
    repo: &Repository,
    project_id: &str,
    invoice_id: &str,
    review: ReviewRecord,
    confirmed_at: Timestamp,
    entries: Vec<LedgerEntry>,
) -> Result<Project, RepoError> {
    repo.mutate(project_id, |project| {
        {
            let invoice = project
                .invoice(invoice_id)
                .ok_or_else(|| RepoError::not_found("invoice", invoice_id))?;
            invoice.require_draft()?;
            for entry in &entries {
                if entry.invoice_id != invoice_id {
                    return Err(RepoError::validation(
                        "LedgerEntry.invoiceId",
                        format!(
                            "\"{}\" must match the invoice being confirmed (\"{invoice_id}\").",
                            entry.invoice_id
                        ),
                    ));
                }
                if invoice.line(&entry.invoice_line_id).is_none() {
                    return Err(RepoError::validation(
                        "LedgerEntry.invoiceLineId",
                        format!(
                            "\"{}\" must reference a line on invoice \"{invoice_id}\".",
                            entry.invoice_line_id
                        ),
                    ));
                }
            }
        }
        let invoice = match project.invoice_mut(invoice_id) {
            Some(i) => i,
            // Checked above while the borrow was shared.
            None => return Err(RepoError::not_found("invoice", invoice_id)),
        };
        invoice.confirm(review, confirmed_at)?;
        project.purchase_ledger.splice(0..0, entries);
        Ok(())
    })
}
