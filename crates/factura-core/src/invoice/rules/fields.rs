//! Field names used by generator responses, with their aliases.

use serde_json::{Map, Value};

/// A field looked up under its canonical key first, then under an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    pub canonical: &'static str,
    pub alias: &'static str,
}

impl FieldKey {
    pub const fn new(canonical: &'static str, alias: &'static str) -> Self {
        Self { canonical, alias }
    }

    /// Resolve the field. `null` counts as absent.
    pub fn lookup<'a>(&self, map: &'a Map<String, Value>) -> Option<&'a Value> {
        map.get(self.canonical)
            .filter(|v| !v.is_null())
            .or_else(|| map.get(self.alias).filter(|v| !v.is_null()))
    }

    /// Name to report in errors: the key actually present, or the canonical one.
    pub fn name_in(&self, map: &Map<String, Value>) -> &'static str {
        if map.get(self.canonical).is_some_and(|v| !v.is_null()) {
            self.canonical
        } else if map.get(self.alias).is_some_and(|v| !v.is_null()) {
            self.alias
        } else {
            self.canonical
        }
    }
}

pub const STATUS: &str = "status";

pub const INVOICE: FieldKey = FieldKey::new("factura", "invoice");
pub const CUSTOMER_NAME: FieldKey = FieldKey::new("cliente", "customerName");
pub const CUSTOMER_TAX_ID: FieldKey = FieldKey::new("ruc", "customerTaxId");
pub const ITEMS: FieldKey = FieldKey::new("items", "lineItems");

pub const ITEM_DESCRIPTION: FieldKey = FieldKey::new("descripcion", "description");
pub const ITEM_QUANTITY: FieldKey = FieldKey::new("cantidad", "quantity");
pub const ITEM_UNIT_PRICE: FieldKey = FieldKey::new("precio", "unitPrice");
pub const ITEM_SUBTOTAL: FieldKey = FieldKey::new("subtotal", "lineSubtotal");

pub const NET_AMOUNT: FieldKey = FieldKey::new("neto", "subtotal");
pub const TAX_AMOUNT: FieldKey = FieldKey::new("igv", "taxAmount");
pub const TOTAL_AMOUNT: FieldKey = FieldKey::new("total", "totalAmount");

/// Read an identity field as text. Numbers keep their literal digits.
pub fn text_field(map: &Map<String, Value>, key: FieldKey) -> String {
    match key.lookup(map) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_canonical_wins_over_alias() {
        let m = map(json!({"neto": 10, "subtotal": 20}));
        assert_eq!(NET_AMOUNT.lookup(&m), Some(&json!(10)));
        assert_eq!(NET_AMOUNT.name_in(&m), "neto");
    }

    #[test]
    fn test_alias_fallback_and_null() {
        let m = map(json!({"neto": null, "subtotal": 20}));
        assert_eq!(NET_AMOUNT.lookup(&m), Some(&json!(20)));
        assert_eq!(NET_AMOUNT.name_in(&m), "subtotal");

        let m = map(json!({}));
        assert_eq!(NET_AMOUNT.lookup(&m), None);
    }

    #[test]
    fn test_text_field() {
        let m = map(json!({"cliente": "  ACME S.A. ", "ruc": 12345678901u64}));
        assert_eq!(text_field(&m, CUSTOMER_NAME), "ACME S.A.");
        assert_eq!(text_field(&m, CUSTOMER_TAX_ID), "12345678901");

        let m = map(json!({"cliente": {"nombre": "x"}}));
        assert_eq!(text_field(&m, CUSTOMER_NAME), "");
    }
}
