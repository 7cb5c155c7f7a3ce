use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One line of an invoice. Line order is significant and preserved in the
/// canonical projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// An invoice as the platform hands it to the registry.
///
/// Only the identifying fields and the ordered line items participate in
/// the canonical projection; workflow state (`status`, `notes`) is mutable
/// platform data and never enters any hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Platform-assigned surrogate identifier. Unique per invoice record,
    /// but not part of the content projection.
    pub invoice_id: String,
    pub vendor_id: String,
    pub invoice_number: String,
    /// GST identification number of the counterpart buyer.
    pub buyer_gstin: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Invoice total.
    pub amount: Decimal,
    pub line_items: Vec<LineItem>,
    /// Workflow state (draft, listed, funded, settled, ...).
    pub status: String,
    pub notes: Option<String>,
}

impl Invoice {
    /// The stable projection used for hashing, signing, and Merkle
    /// rooting: identifying fields plus ordered line items, with decimals
    /// and dates rendered through their exact string forms.
    ///
    /// Two invoice records with the same projection are the same invoice
    /// as far as fraud detection is concerned, whatever their surrogate
    /// ids or workflow state say.
    pub fn canonical_projection(&self) -> Value {
        json!({
            "vendor_id": self.vendor_id,
            "invoice_number": self.invoice_number,
            "buyer_gstin": self.buyer_gstin,
            "invoice_date": self.invoice_date.format("%Y-%m-%d").to_string(),
            "due_date": self.due_date.format("%Y-%m-%d").to_string(),
            "amount": self.amount.to_string(),
            "line_items": self.line_items.iter().map(|item| json!({
                "description": item.description,
                "quantity": item.quantity.to_string(),
                "rate": item.rate.to_string(),
                "amount": item.amount.to_string(),
            })).collect::<Vec<Value>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use ivl_crypto::CanonicalHasher;
    use rust_decimal::Decimal;

    use super::*;

    fn sample_invoice() -> Invoice {
        Invoice {
            invoice_id: "inv-0001".into(),
            vendor_id: "VEND-042".into(),
            invoice_number: "2026/08/0117".into(),
            buyer_gstin: "29ABCDE1234F1Z5".into(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            amount: Decimal::new(120000, 2),
            line_items: vec![LineItem {
                description: "Steel fasteners, grade 8.8".into(),
                quantity: Decimal::new(500, 0),
                rate: Decimal::new(240, 2),
                amount: Decimal::new(120000, 2),
            }],
            status: "draft".into(),
            notes: None,
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let invoice = sample_invoice();
        assert_eq!(invoice.canonical_projection(), invoice.canonical_projection());
    }

    #[test]
    fn workflow_fields_do_not_affect_the_projection() {
        let draft = sample_invoice();
        let mut funded = draft.clone();
        funded.status = "funded".into();
        funded.notes = Some("paid out 2026-08-05".into());
        assert_eq!(draft.canonical_projection(), funded.canonical_projection());
    }

    #[test]
    fn surrogate_id_does_not_affect_the_projection() {
        let original = sample_invoice();
        let mut reinserted = original.clone();
        reinserted.invoice_id = "inv-9999".into();
        assert_eq!(
            CanonicalHasher::PROJECTION.hash_value(&original.canonical_projection()),
            CanonicalHasher::PROJECTION.hash_value(&reinserted.canonical_projection())
        );
    }

    #[test]
    fn content_fields_change_the_projection_hash() {
        let original = sample_invoice();
        let base = CanonicalHasher::PROJECTION.hash_value(&original.canonical_projection());

        let mut repriced = original.clone();
        repriced.amount = Decimal::new(130000, 2);
        assert_ne!(
            base,
            CanonicalHasher::PROJECTION.hash_value(&repriced.canonical_projection())
        );

        let mut renumbered = original.clone();
        renumbered.invoice_number = "2026/08/0118".into();
        assert_ne!(
            base,
            CanonicalHasher::PROJECTION.hash_value(&renumbered.canonical_projection())
        );
    }

    #[test]
    fn line_item_order_is_significant() {
        let mut invoice = sample_invoice();
        invoice.line_items.push(LineItem {
            description: "Delivery".into(),
            quantity: Decimal::ONE,
            rate: Decimal::new(50000, 2),
            amount: Decimal::new(50000, 2),
        });
        let forward = CanonicalHasher::PROJECTION.hash_value(&invoice.canonical_projection());
        invoice.line_items.reverse();
        let reversed = CanonicalHasher::PROJECTION.hash_value(&invoice.canonical_projection());
        assert_ne!(forward, reversed);
    }

    #[test]
    fn decimals_render_exactly() {
        let invoice = sample_invoice();
        let projection = invoice.canonical_projection();
        assert_eq!(projection["amount"], "1200.00");
        assert_eq!(projection["line_items"][0]["rate"], "2.40");
    }
}
