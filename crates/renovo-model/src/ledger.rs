//! # Purchase Ledger
//!
//! Append-only record of posted purchases, derived from confirmed invoice
//! lines.
//!
//! ## Invariant
//!
//! Ledger entries are created only by invoice confirmation and are never
//! mutated or deleted afterwards. Corrections are new `adjustment` entries.
//! The mutation manager in `renovo-store` enforces this on every write by
//! checking that the prior ledger survives as an unchanged suffix of the
//! candidate ledger.

use chrono::NaiveDate;
use renovo_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Kind of a ledger entry, which determines its sign in quantity roll-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerEntryType {
    /// A purchase; its quantity counts toward purchased totals.
    Purchase,
    /// A correction; its quantity counts against purchased totals.
    Adjustment,
}

/// One posted row of the purchase ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Entry id, unique within the project.
    pub id: String,
    /// Owning project id.
    pub project_id: String,
    /// Invoice this entry was posted from.
    pub invoice_id: String,
    /// The specific invoice line; must belong to that invoice.
    pub invoice_line_id: String,
    /// When the entry was posted.
    pub posted_at: Timestamp,
    /// Material purchased. Kept even if the catalog entry is later
    /// deleted — ledger rows are history, not live references.
    pub material_id: String,
    /// Quantity purchased (or adjusted).
    pub quantity: f64,
    /// Unit of measure at posting time.
    #[serde(default)]
    pub unit_type: String,
    /// Unit price at posting time.
    pub unit_price: f64,
    /// Line total at posting time.
    pub line_total: f64,
    /// Vendor name at posting time.
    #[serde(default)]
    pub vendor_name: String,
    /// Invoice date at posting time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,
    /// Currency at posting time.
    #[serde(default)]
    pub currency: String,
    /// Entry kind.
    pub entry_type: LedgerEntryType,
    /// Free-form note, e.g. the reason for an adjustment.
    #[serde(default)]
    pub note: String,
}

impl LedgerEntry {
    /// Quantity with the sign implied by the entry type: purchases add,
    /// adjustments subtract.
    pub fn signed_quantity(&self) -> f64 {
        match self.entry_type {
            LedgerEntryType::Purchase => self.quantity,
            LedgerEntryType::Adjustment => -self.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(entry_type: LedgerEntryType, quantity: f64) -> LedgerEntry {
        LedgerEntry {
            id: "led-1".into(),
            project_id: "p-1".into(),
            invoice_id: "inv-1".into(),
            invoice_line_id: "line-1".into(),
            posted_at: Timestamp::parse("2026-02-11T09:00:00Z").unwrap(),
            material_id: "copper-pipe".into(),
            quantity,
            unit_type: "m".into(),
            unit_price: 4.5,
            line_total: quantity * 4.5,
            vendor_name: "BuildMart".into(),
            invoice_date: None,
            currency: "EUR".into(),
            entry_type,
            note: String::new(),
        }
    }

    #[test]
    fn test_purchase_counts_positive() {
        let entry = make_entry(LedgerEntryType::Purchase, 10.0);
        assert_eq!(entry.signed_quantity(), 10.0);
    }

    #[test]
    fn test_adjustment_counts_negative() {
        let entry = make_entry(LedgerEntryType::Adjustment, 3.0);
        assert_eq!(entry.signed_quantity(), -3.0);
    }

    #[test]
    fn test_entry_type_wire_values() {
        assert_eq!(
            serde_json::to_value(LedgerEntryType::Purchase).unwrap(),
            "purchase"
        );
        assert_eq!(
            serde_json::to_value(LedgerEntryType::Adjustment).unwrap(),
            "adjustment"
        );
    }
}
