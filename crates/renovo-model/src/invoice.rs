//! # Purchase Invoice Lifecycle
//!
//! Models a purchase invoice extracted from an uploaded document and the
//! lifecycle that governs when it may change.
//!
//! ## States
//!
//! ```text
//! draft ──edit──▶ draft ──confirm──▶ confirmed (terminal in this design)
//! ```
//!
//! `voided` exists in the status enum so stored documents can carry it, but
//! no transition reaches it here — the only correction mechanism for a
//! confirmed invoice is an `adjustment` ledger entry.
//!
//! ## Invariant
//!
//! Only draft invoices are editable. Confirmation happens exactly once and
//! is the only code path that posts ledger rows.

use chrono::NaiveDate;
use renovo_core::{RepoError, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Status ──────────────────────────────────────────────────────────

/// Lifecycle state of a purchase invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Freshly extracted, editable.
    #[default]
    Draft,
    /// Confirmed and posted to the ledger; read-only.
    Confirmed,
    /// Voided. Reachable in stored documents only; no transition in scope.
    Voided,
}

impl InvoiceStatus {
    /// Whether an invoice in this state may be edited.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Confirmed => "confirmed",
            Self::Voided => "voided",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from invoice lifecycle guards.
#[derive(Error, Debug)]
pub enum InvoiceStateError {
    /// The invoice is past the draft state and may not be edited.
    #[error("invoice \"{id}\" has status {status}; only draft invoices can be modified")]
    NotDraft {
        /// Invoice id.
        id: String,
        /// Current status.
        status: String,
    },
}

impl From<InvoiceStateError> for RepoError {
    fn from(e: InvoiceStateError) -> Self {
        RepoError::Conflict(e.to_string())
    }
}

// ─── Embedded records ────────────────────────────────────────────────

/// Monetary totals of an invoice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Sum of line totals before tax.
    #[serde(default)]
    pub subtotal: f64,
    /// Tax amount, as printed on the invoice.
    #[serde(default)]
    pub tax: f64,
    /// Grand total.
    #[serde(default)]
    pub total: f64,
}

/// One extracted line of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    /// Line id, unique within the invoice.
    pub id: String,
    /// Raw text the extractor saw.
    #[serde(default)]
    pub source_text: String,
    /// Cleaned-up description.
    #[serde(default)]
    pub description: String,
    /// Quantity purchased.
    pub quantity: f64,
    /// Unit of measure as printed.
    #[serde(default)]
    pub unit_type: String,
    /// Price per unit.
    pub unit_price: f64,
    /// Line total as printed.
    pub line_total: f64,
    /// Catalog entry this line was matched to, if any; must reference an
    /// existing catalog entry while set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
    /// Extractor confidence for this line, 0.0–1.0.
    #[serde(default)]
    pub confidence: f64,
    /// Whether a human should double-check this line.
    #[serde(default)]
    pub needs_review: bool,
    /// Reviewer notes.
    #[serde(default)]
    pub notes: String,
}

/// Provenance of the extraction that produced a draft invoice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRecord {
    /// Extraction engine identifier.
    #[serde(default)]
    pub source: String,
    /// When extraction ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<Timestamp>,
    /// Overall document confidence, 0.0–1.0.
    #[serde(default)]
    pub overall_confidence: f64,
}

/// Human review metadata, filled in at confirmation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    /// Who reviewed the invoice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    /// When the review happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<Timestamp>,
    /// Reviewer notes.
    #[serde(default)]
    pub notes: String,
}

// ─── Invoice ─────────────────────────────────────────────────────────

/// A purchase invoice with its lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInvoice {
    /// Invoice id, unique within the project.
    pub id: String,
    /// Lifecycle status.
    #[serde(default)]
    pub status: InvoiceStatus,
    /// Owning project id.
    pub project_id: String,
    /// Source attachment; must reference an attachment of category
    /// `"invoice"`.
    pub attachment_id: String,
    /// Vendor name as printed.
    #[serde(default)]
    pub vendor_name: String,
    /// Vendor invoice number.
    #[serde(default)]
    pub invoice_number: String,
    /// Invoice date as printed, if extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,
    /// ISO 4217 currency code as printed. No conversion is performed.
    #[serde(default)]
    pub currency: String,
    /// Monetary totals.
    #[serde(default)]
    pub totals: InvoiceTotals,
    /// Extracted lines.
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
    /// Extraction provenance.
    #[serde(default)]
    pub extraction: ExtractionRecord,
    /// Review metadata.
    #[serde(default)]
    pub review: ReviewRecord,
    /// Creation time of the draft.
    pub created_at: Timestamp,
    /// Last modification time.
    pub updated_at: Timestamp,
    /// Confirmation time; set exactly once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<Timestamp>,
}

impl PurchaseInvoice {
    /// Guard: the invoice must still be a draft.
    pub fn require_draft(&self) -> Result<(), InvoiceStateError> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(InvoiceStateError::NotDraft {
                id: self.id.clone(),
                status: self.status.to_string(),
            })
        }
    }

    /// Confirm the draft (draft → confirmed), stamping review metadata and
    /// timestamps. Irreversible; there is no un-confirm.
    pub fn confirm(
        &mut self,
        review: ReviewRecord,
        confirmed_at: Timestamp,
    ) -> Result<(), InvoiceStateError> {
        self.require_draft()?;
        self.status = InvoiceStatus::Confirmed;
        self.review = review;
        self.confirmed_at = Some(confirmed_at);
        self.updated_at = confirmed_at;
        Ok(())
    }

    /// Look up a line by id.
    pub fn line(&self, line_id: &str) -> Option<&InvoiceLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
