//! Canonical invoice data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Tolerance used when comparing source amounts with locally computed ones.
pub const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// A canonical invoice.
///
/// Field order is the serialization order: customer identity, items, totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Customer legal name.
    pub customer_name: String,

    /// Customer tax identifier (RUC).
    pub customer_tax_id: String,

    /// Line items in source order.
    pub items: Vec<LineItem>,

    /// Pre-tax total of all line items.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub net_amount: Decimal,

    /// Tax component (IGV).
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tax_amount: Decimal,

    /// Amount payable.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_amount: Decimal,
}

/// Whether two amounts differ by at most [`AMOUNT_TOLERANCE`].
///
/// Differences that overflow never agree.
pub fn amounts_agree(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b)
        .is_some_and(|diff| diff.abs() <= AMOUNT_TOLERANCE)
}

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product/service description.
    pub description: String,

    /// Quantity.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub quantity: Decimal,

    /// Unit price.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,

    /// Always `quantity * unit_price`.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub line_subtotal: Decimal,
}

impl LineItem {
    /// Create a line item, computing its subtotal.
    ///
    /// # Panics
    ///
    /// Panics if `quantity * unit_price` is out of range; use
    /// [`try_new`](Self::try_new) for untrusted input.
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            line_subtotal: quantity * unit_price,
        }
    }

    /// Like [`new`](Self::new), but `None` when the subtotal is out of range.
    pub fn try_new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Option<Self> {
        let line_subtotal = quantity.checked_mul(unit_price)?;
        Some(Self {
            description: description.into(),
            quantity,
            unit_price,
            line_subtotal,
        })
    }
}

impl Invoice {
    /// Sum of all line subtotals, `None` on overflow.
    pub fn items_total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.line_subtotal))
    }

    /// Whether the invoice has at least one line item.
    pub fn is_complete(&self) -> bool {
        !self.items.is_empty()
    }

    /// Serialize with stable key order and indentation.
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the invoice data and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.customer_name.is_empty() {
            issues.push("Missing customer name".to_string());
        }

        if self.customer_tax_id.is_empty() {
            issues.push("Missing customer tax id".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        match self.net_amount.checked_add(self.tax_amount) {
            Some(expected) if amounts_agree(expected, self.total_amount) => {}
            Some(expected) => issues.push(format!(
                "Total ({}) differs from net + tax ({})",
                self.total_amount, expected
            )),
            None => issues.push("Net + tax is out of range".to_string()),
        }

        issues
    }
}

/// Request payload sent to the external invoice generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Free-form natural-language description of the invoice.
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Invoice {
        let items = vec![
            LineItem::new("Laptop", Decimal::from(3), Decimal::from(1500)),
            LineItem::new("Teclado", Decimal::from(2), Decimal::from(50)),
        ];
        Invoice {
            customer_name: "ACME S.A.".to_string(),
            customer_tax_id: "12345678901".to_string(),
            net_amount: Decimal::from(4600),
            tax_amount: Decimal::from(828),
            total_amount: Decimal::from(5428),
            items,
        }
    }

    #[test]
    fn test_tolerance_constant() {
        assert_eq!(AMOUNT_TOLERANCE, Decimal::new(1, 6));
    }

    #[test]
    fn test_line_item_subtotal() {
        let item = LineItem::new("Mouse", Decimal::new(15, 1), Decimal::new(1999, 2));
        assert_eq!(item.line_subtotal, Decimal::new(29985, 3));
    }

    #[test]
    fn test_json_key_order() {
        let json = sample().to_json_pretty().unwrap();
        let positions: Vec<usize> = [
            "\"customerName\"",
            "\"customerTaxId\"",
            "\"items\"",
            "\"netAmount\"",
            "\"taxAmount\"",
            "\"totalAmount\"",
        ]
        .iter()
        .map(|k| json.find(k).unwrap())
        .collect();

        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(json.contains("\n  \"customerName\""));
    }

    #[test]
    fn test_json_round_trip() {
        let mut invoice = sample();
        invoice.items.push(LineItem::new(
            "Cable",
            Decimal::new(3, 0),
            Decimal::new(333_333_333, 8),
        ));
        invoice.net_amount = invoice.items_total().unwrap();

        let json = invoice.to_json_pretty().unwrap();
        let parsed: Invoice = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, invoice);
    }

    #[test]
    fn test_amounts_serialize_as_numbers() {
        let json = sample().to_json_pretty().unwrap();
        assert!(json.contains("\"netAmount\": 4600"));
        assert!(json.contains("\"unitPrice\": 1500"));
        assert!(json.contains("\"quantity\": 3"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["totalAmount"].is_number());
        assert!(value["items"][0]["lineSubtotal"].is_number());
    }

    #[test]
    fn test_fractional_amounts_keep_their_digits() {
        let item = LineItem::new("Cable", Decimal::new(3, 0), Decimal::new(333_333_333, 8));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"unitPrice\":3.33333333"));
        assert!(json.contains("\"lineSubtotal\":9.99999999"));
    }

    #[test]
    fn test_try_new_rejects_overflow() {
        let big = Decimal::from(10_000_000_000_000_000u64);
        assert!(LineItem::try_new("X", big, big).is_none());
        assert_eq!(
            LineItem::try_new("X", Decimal::from(2), Decimal::from(5)).map(|i| i.line_subtotal),
            Some(Decimal::from(10))
        );
    }

    #[test]
    fn test_amounts_agree() {
        assert!(amounts_agree(Decimal::new(1_000_000, 6), Decimal::ONE));
        assert!(!amounts_agree(Decimal::ONE, Decimal::ZERO));
        assert!(!amounts_agree(Decimal::MAX, Decimal::MIN));
    }

    #[test]
    fn test_items_total_overflow() {
        let mut invoice = sample();
        assert_eq!(invoice.items_total(), Some(Decimal::from(4600)));

        invoice.items = vec![
            LineItem::new("A", Decimal::ONE, Decimal::MAX),
            LineItem::new("B", Decimal::ONE, Decimal::MAX),
        ];
        assert_eq!(invoice.items_total(), None);
    }

    #[test]
    fn test_validate_reports_total_mismatch() {
        let mut invoice = sample();
        assert!(invoice.validate().is_empty());

        invoice.total_amount = Decimal::from(5000);
        let issues = invoice.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Total (5000)"));
    }

    #[test]
    fn test_generation_request_payload() {
        let request = GenerationRequest::new("Factura para ACME");
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"prompt":"Factura para ACME"}"#
        );
    }
}
