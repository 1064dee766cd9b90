//! Normalization of generator responses into canonical invoices.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::NormalizationError;
use crate::models::config::ResponseConfig;
use crate::models::invoice::{Invoice, LineItem, amounts_agree};

use super::rules::{AmountError, coerce_decimal, fields, fields::FieldKey, text_field};
use super::Result;

/// Non-fatal condition found while normalizing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizationWarning {
    /// A line subtotal disagreed with `quantity * unit_price` and was replaced.
    LineSubtotalRecomputed {
        index: usize,
        #[serde(with = "rust_decimal::serde::arbitrary_precision")]
        source: Decimal,
        #[serde(with = "rust_decimal::serde::arbitrary_precision")]
        computed: Decimal,
    },
    /// The source net amount disagreed with the sum of line subtotals and was replaced.
    NetAmountRecomputed {
        #[serde(with = "rust_decimal::serde::arbitrary_precision")]
        source: Decimal,
        #[serde(with = "rust_decimal::serde::arbitrary_precision")]
        computed: Decimal,
    },
    /// The source total disagrees with net + tax; it was kept as supplied.
    SourceTotalMismatch {
        #[serde(with = "rust_decimal::serde::arbitrary_precision")]
        source: Decimal,
        #[serde(with = "rust_decimal::serde::arbitrary_precision")]
        computed: Decimal,
    },
}

impl fmt::Display for NormalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationWarning::LineSubtotalRecomputed {
                index,
                source,
                computed,
            } => write!(
                f,
                "item {}: subtotal {} replaced by quantity * price = {}",
                index, source, computed
            ),
            NormalizationWarning::NetAmountRecomputed { source, computed } => write!(
                f,
                "net amount {} replaced by sum of items = {}",
                source, computed
            ),
            NormalizationWarning::SourceTotalMismatch { source, computed } => write!(
                f,
                "total {} kept although net + tax = {}",
                source, computed
            ),
        }
    }
}

/// Result of a successful normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Canonical invoice.
    pub invoice: Invoice,
    /// Conditions worth surfacing to the user.
    pub warnings: Vec<NormalizationWarning>,
}

/// Trait for response normalization.
pub trait Normalizer {
    /// Normalize a parsed generator response.
    fn normalize(&self, raw: &Value) -> Result<Normalized>;

    /// Parse and normalize a generator response given as JSON text.
    fn normalize_str(&self, text: &str) -> crate::Result<Normalized> {
        let raw: Value = serde_json::from_str(text)?;
        Ok(self.normalize(&raw)?)
    }
}

/// Normalizer with the "recompute net, trust total" policy.
#[derive(Debug, Clone)]
pub struct InvoiceNormalizer {
    /// Accepted values of the `status` field.
    success_markers: Vec<String>,
}

impl InvoiceNormalizer {
    /// Create a normalizer with default settings.
    pub fn new() -> Self {
        Self::from_config(&ResponseConfig::default())
    }

    /// Create a normalizer from response configuration.
    pub fn from_config(config: &ResponseConfig) -> Self {
        Self {
            success_markers: config.success_markers.clone(),
        }
    }

    /// Set the accepted status markers.
    pub fn with_success_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.success_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    fn invoice_map<'a>(&self, raw: &'a Value) -> Result<&'a Map<String, Value>> {
        let root = raw.as_object().ok_or_else(|| {
            NormalizationError::InvalidResponseShape("response is not an object".to_string())
        })?;

        let status = match root.get(fields::STATUS) {
            Some(Value::String(s)) => s.as_str(),
            Some(_) => {
                return Err(NormalizationError::InvalidResponseShape(
                    "status is not a string".to_string(),
                ));
            }
            None => {
                return Err(NormalizationError::InvalidResponseShape(
                    "missing status".to_string(),
                ));
            }
        };

        if !self.success_markers.iter().any(|m| m == status) {
            return Err(NormalizationError::InvalidResponseShape(format!(
                "status is \"{}\"",
                status
            )));
        }

        match fields::INVOICE.lookup(root) {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(NormalizationError::InvalidResponseShape(format!(
                "{} is not an object",
                fields::INVOICE.name_in(root)
            ))),
            None => Err(NormalizationError::InvalidResponseShape(format!(
                "missing {}",
                fields::INVOICE.canonical
            ))),
        }
    }

    fn line_items(
        &self,
        invoice: &Map<String, Value>,
        warnings: &mut Vec<NormalizationWarning>,
    ) -> Result<Vec<LineItem>> {
        let raw_items = match fields::ITEMS.lookup(invoice) {
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => {
                return Err(NormalizationError::InvalidResponseShape(format!(
                    "{} is not a list",
                    fields::ITEMS.name_in(invoice)
                )));
            }
            None => &[],
        };

        raw_items
            .iter()
            .enumerate()
            .map(|(index, raw)| self.line_item(index, raw, warnings))
            .collect()
    }

    fn line_item(
        &self,
        index: usize,
        raw: &Value,
        warnings: &mut Vec<NormalizationWarning>,
    ) -> Result<LineItem> {
        let invalid = |reason: &str| NormalizationError::InvalidLineItem {
            index,
            reason: reason.to_string(),
        };

        let map = raw.as_object().ok_or_else(|| invalid("not an object"))?;

        let quantity = match fields::ITEM_QUANTITY.lookup(map) {
            None => return Err(invalid("missing quantity")),
            Some(v) => coerce_decimal(v).map_err(|e| match e {
                AmountError::NotNumeric => invalid("non-numeric quantity"),
                AmountError::OutOfRange => invalid("quantity out of range"),
            })?,
        };
        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(invalid("negative quantity"));
        }

        let unit_price = match fields::ITEM_UNIT_PRICE.lookup(map) {
            None => return Err(invalid("missing unit price")),
            Some(v) => coerce_decimal(v).map_err(|e| match e {
                AmountError::NotNumeric => invalid("non-numeric unit price"),
                AmountError::OutOfRange => invalid("unit price out of range"),
            })?,
        };

        let item = LineItem::try_new(
            text_field(map, fields::ITEM_DESCRIPTION),
            quantity,
            unit_price,
        )
        .ok_or_else(|| invalid("amount out of range"))?;

        // A present but unreadable subtotal is discarded like a wrong one
        if let Some(v) = fields::ITEM_SUBTOTAL.lookup(map) {
            match coerce_decimal(v) {
                Ok(source) if amounts_agree(source, item.line_subtotal) => {}
                Ok(source) => {
                    warn!(
                        "Line item {} subtotal {} disagrees with {} x {}, recomputed",
                        index, source, quantity, unit_price
                    );
                    warnings.push(NormalizationWarning::LineSubtotalRecomputed {
                        index,
                        source,
                        computed: item.line_subtotal,
                    });
                }
                Err(_) => debug!("Line item {} has unreadable subtotal, ignored", index),
            }
        }

        Ok(item)
    }

    fn optional_amount(&self, invoice: &Map<String, Value>, key: FieldKey) -> Result<Option<Decimal>> {
        match key.lookup(invoice) {
            None => Ok(None),
            Some(v) => coerce_decimal(v).map(Some).map_err(|e| {
                let problem = match e {
                    AmountError::NotNumeric => "is not numeric",
                    AmountError::OutOfRange => "is out of range",
                };
                NormalizationError::InvalidResponseShape(format!(
                    "{} {}",
                    key.name_in(invoice),
                    problem
                ))
            }),
        }
    }
}

impl Default for InvoiceNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for InvoiceNormalizer {
    fn normalize(&self, raw: &Value) -> Result<Normalized> {
        let source = self.invoice_map(raw)?;
        let mut warnings = Vec::new();

        let items = self.line_items(source, &mut warnings)?;
        let computed_net = items
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.line_subtotal))
            .ok_or_else(|| out_of_range("sum of line items"))?;

        let net_amount = match self.optional_amount(source, fields::NET_AMOUNT)? {
            Some(net) if amounts_agree(net, computed_net) => net,
            Some(net) => {
                warn!("Net amount {} disagrees with items ({}), recomputed", net, computed_net);
                warnings.push(NormalizationWarning::NetAmountRecomputed {
                    source: net,
                    computed: computed_net,
                });
                computed_net
            }
            None => computed_net,
        };

        let tax_amount = self
            .optional_amount(source, fields::TAX_AMOUNT)?
            .unwrap_or(Decimal::ZERO);

        let computed_total = net_amount
            .checked_add(tax_amount)
            .ok_or_else(|| out_of_range("net + tax"))?;
        let total_amount = match self.optional_amount(source, fields::TOTAL_AMOUNT)? {
            Some(total) => {
                if !amounts_agree(total, computed_total) {
                    info!(
                        "Total {} differs from net + tax ({}), keeping source value",
                        total, computed_total
                    );
                    warnings.push(NormalizationWarning::SourceTotalMismatch {
                        source: total,
                        computed: computed_total,
                    });
                }
                total
            }
            None => computed_total,
        };

        let invoice = Invoice {
            customer_name: text_field(source, fields::CUSTOMER_NAME),
            customer_tax_id: text_field(source, fields::CUSTOMER_TAX_ID),
            items,
            net_amount,
            tax_amount,
            total_amount,
        };

        debug!(
            "Normalized invoice for '{}' with {} items, total {}",
            invoice.customer_name,
            invoice.items.len(),
            invoice.total_amount
        );

        Ok(Normalized { invoice, warnings })
    }
}

fn out_of_range(what: &str) -> NormalizationError {
    NormalizationError::InvalidResponseShape(format!("{} is out of range", what))
}

/// Normalize a generator response with the default settings.
pub fn normalize(raw: &Value) -> Result<Normalized> {
    InvoiceNormalizer::new().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scenario_a() -> Value {
        json!({
            "status": "ok",
            "factura": {
                "cliente": "ACME S.A.",
                "ruc": "12345678901",
                "items": [
                    {"descripcion": "Laptop", "cantidad": 3, "precio": 1500, "subtotal": 4500},
                    {"descripcion": "Teclado", "cantidad": 2, "precio": 50, "subtotal": 100}
                ],
                "igv": 828,
                "total": 5428
            }
        })
    }

    #[test]
    fn test_scenario_a() {
        let result = normalize(&scenario_a()).unwrap();
        let invoice = result.invoice;

        assert_eq!(invoice.customer_name, "ACME S.A.");
        assert_eq!(invoice.customer_tax_id, "12345678901");
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.net_amount, dec("4600"));
        assert_eq!(invoice.tax_amount, dec("828"));
        assert_eq!(invoice.total_amount, dec("5428"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_error_status_rejected() {
        let raw = json!({"status": "error", "factura": {"cliente": "x"}});
        assert_eq!(
            normalize(&raw),
            Err(NormalizationError::InvalidResponseShape(
                "status is \"error\"".to_string()
            ))
        );
    }

    #[test]
    fn test_missing_status_or_invoice() {
        assert!(matches!(
            normalize(&json!({"factura": {}})),
            Err(NormalizationError::InvalidResponseShape(_))
        ));
        assert!(matches!(
            normalize(&json!({"status": "ok"})),
            Err(NormalizationError::InvalidResponseShape(_))
        ));
        assert!(matches!(
            normalize(&json!({"status": "ok", "factura": [1, 2]})),
            Err(NormalizationError::InvalidResponseShape(_))
        ));
        assert!(matches!(
            normalize(&json!("ok")),
            Err(NormalizationError::InvalidResponseShape(_))
        ));
    }

    #[test]
    fn test_success_marker_from_generator_service() {
        let mut raw = scenario_a();
        raw["status"] = json!("success");
        assert!(normalize(&raw).is_ok());

        let strict = InvoiceNormalizer::new().with_success_markers(["ok"]);
        assert!(strict.normalize(&raw).is_err());
    }

    #[test]
    fn test_negative_quantity() {
        let raw = json!({
            "status": "ok",
            "factura": {"items": [{"descripcion": "X", "cantidad": -1, "precio": 10}]}
        });
        assert_eq!(
            normalize(&raw),
            Err(NormalizationError::InvalidLineItem {
                index: 0,
                reason: "negative quantity".to_string()
            })
        );
    }

    #[test]
    fn test_non_numeric_price_aborts_whole_invoice() {
        let raw = json!({
            "status": "ok",
            "factura": {"items": [
                {"descripcion": "A", "cantidad": 1, "precio": 10},
                {"descripcion": "B", "cantidad": 1, "precio": "diez"}
            ]}
        });
        assert_eq!(
            normalize(&raw),
            Err(NormalizationError::InvalidLineItem {
                index: 1,
                reason: "non-numeric unit price".to_string()
            })
        );
    }

    #[test]
    fn test_item_not_object() {
        let raw = json!({"status": "ok", "factura": {"items": ["Laptop"]}});
        assert!(matches!(
            normalize(&raw),
            Err(NormalizationError::InvalidLineItem { index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_invoice_has_zero_totals() {
        let raw = json!({"status": "ok", "factura": {}});
        let invoice = normalize(&raw).unwrap().invoice;

        assert!(invoice.items.is_empty());
        assert!(!invoice.is_complete());
        assert_eq!(invoice.customer_name, "");
        assert_eq!(invoice.net_amount, Decimal::ZERO);
        assert_eq!(invoice.tax_amount, Decimal::ZERO);
        assert_eq!(invoice.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_line_subtotal_recomputed() {
        let raw = json!({
            "status": "ok",
            "factura": {"items": [
                {"descripcion": "Laptop", "cantidad": 3, "precio": 1500, "subtotal": 4000}
            ]}
        });
        let result = normalize(&raw).unwrap();

        assert_eq!(result.invoice.items[0].line_subtotal, dec("4500"));
        assert_eq!(
            result.warnings,
            vec![NormalizationWarning::LineSubtotalRecomputed {
                index: 0,
                source: dec("4000"),
                computed: dec("4500"),
            }]
        );
    }

    #[test]
    fn test_net_recomputed_when_inconsistent() {
        let raw = json!({
            "status": "ok",
            "factura": {
                "items": [{"descripcion": "A", "cantidad": 2, "precio": 10}],
                "neto": 25,
                "igv": 3.6
            }
        });
        let result = normalize(&raw).unwrap();

        assert_eq!(result.invoice.net_amount, dec("20"));
        assert_eq!(result.invoice.total_amount, dec("23.6"));
        assert_eq!(
            result.warnings,
            vec![NormalizationWarning::NetAmountRecomputed {
                source: dec("25"),
                computed: dec("20"),
            }]
        );
    }

    #[test]
    fn test_net_alias_within_tolerance_kept() {
        let raw = json!({
            "status": "ok",
            "factura": {
                "items": [{"descripcion": "A", "cantidad": 3, "precio": "0.333333"}],
                "subtotal": 0.9999995
            }
        });
        let result = normalize(&raw).unwrap();

        assert_eq!(result.invoice.net_amount, dec("0.9999995"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_source_total_trusted() {
        let raw = json!({
            "status": "ok",
            "factura": {
                "items": [{"descripcion": "A", "cantidad": 1, "precio": 100}],
                "igv": 18,
                "total": 120
            }
        });
        let result = normalize(&raw).unwrap();

        assert_eq!(result.invoice.total_amount, dec("120"));
        assert_eq!(
            result.warnings,
            vec![NormalizationWarning::SourceTotalMismatch {
                source: dec("120"),
                computed: dec("118"),
            }]
        );
    }

    #[test]
    fn test_aliases_and_string_amounts() {
        let raw = json!({
            "status": "ok",
            "invoice": {
                "customerName": "Bodega Sur",
                "customerTaxId": 20123456789u64,
                "lineItems": [
                    {"description": "Arroz", "quantity": "10", "unitPrice": "S/ 4.50"}
                ],
                "taxAmount": "8.10"
            }
        });
        let invoice = normalize(&raw).unwrap().invoice;

        assert_eq!(invoice.customer_name, "Bodega Sur");
        assert_eq!(invoice.customer_tax_id, "20123456789");
        assert_eq!(invoice.items[0].line_subtotal, dec("45"));
        assert_eq!(invoice.net_amount, dec("45"));
        assert_eq!(invoice.total_amount, dec("53.10"));
    }

    #[test]
    fn test_non_numeric_total_is_shape_error() {
        let raw = json!({"status": "ok", "factura": {"total": "mucho"}});
        assert_eq!(
            normalize(&raw),
            Err(NormalizationError::InvalidResponseShape(
                "total is not numeric".to_string()
            ))
        );
    }

    #[test]
    fn test_line_subtotal_overflow_is_item_error() {
        let raw = json!({
            "status": "ok",
            "factura": {"items": [
                {"descripcion": "X", "cantidad": 10000000000000000u64, "precio": 10000000000000000u64}
            ]}
        });
        assert_eq!(
            normalize(&raw),
            Err(NormalizationError::InvalidLineItem {
                index: 0,
                reason: "amount out of range".to_string()
            })
        );
    }

    #[test]
    fn test_sum_overflow_is_shape_error() {
        let raw = json!({
            "status": "ok",
            "factura": {"items": [
                {"descripcion": "A", "cantidad": 1, "precio": "70000000000000000000000000000"},
                {"descripcion": "B", "cantidad": 1, "precio": "70000000000000000000000000000"}
            ]}
        });
        assert_eq!(
            normalize(&raw),
            Err(NormalizationError::InvalidResponseShape(
                "sum of line items is out of range".to_string()
            ))
        );
    }

    #[test]
    fn test_net_plus_tax_overflow_is_shape_error() {
        let raw = json!({
            "status": "ok",
            "factura": {
                "items": [{"descripcion": "A", "cantidad": 1, "precio": "70000000000000000000000000000"}],
                "igv": "70000000000000000000000000000"
            }
        });
        assert_eq!(
            normalize(&raw),
            Err(NormalizationError::InvalidResponseShape(
                "net + tax is out of range".to_string()
            ))
        );
    }

    #[test]
    fn test_huge_source_amounts_compare_without_overflow() {
        let raw = json!({
            "status": "ok",
            "factura": {
                "items": [{"descripcion": "A", "cantidad": 1, "precio": "-70000000000000000000000000000"}],
                "neto": "70000000000000000000000000000",
                "igv": 0
            }
        });
        let result = normalize(&raw).unwrap();
        assert_eq!(result.invoice.net_amount, dec("-70000000000000000000000000000"));
        assert!(matches!(
            result.warnings[0],
            NormalizationWarning::NetAmountRecomputed { .. }
        ));
    }

    #[test]
    fn test_out_of_range_numbers_named_as_such() {
        let raw: Value = serde_json::from_str(
            r#"{"status": "ok", "factura": {"items": [
                {"descripcion": "A", "cantidad": 100000000000000000000000000000000, "precio": 1}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(
            normalize(&raw),
            Err(NormalizationError::InvalidLineItem {
                index: 0,
                reason: "quantity out of range".to_string()
            })
        );

        let raw: Value = serde_json::from_str(
            r#"{"status": "ok", "factura": {"total": 1e40}}"#,
        )
        .unwrap();
        assert_eq!(
            normalize(&raw),
            Err(NormalizationError::InvalidResponseShape(
                "total is out of range".to_string()
            ))
        );
    }

    #[test]
    fn test_warnings_serialize_amounts_as_numbers() {
        let warning = NormalizationWarning::NetAmountRecomputed {
            source: dec("25"),
            computed: dec("20.5"),
        };
        assert_eq!(
            serde_json::to_string(&warning).unwrap(),
            r#"{"kind":"net_amount_recomputed","source":25,"computed":20.5}"#
        );
    }

    #[test]
    fn test_deterministic() {
        let raw = scenario_a();
        assert_eq!(normalize(&raw), normalize(&raw));
    }

    #[test]
    fn test_normalize_str() {
        let text = serde_json::to_string(&scenario_a()).unwrap();
        let result = InvoiceNormalizer::new().normalize_str(&text).unwrap();
        assert_eq!(result.invoice.total_amount, dec("5428"));

        assert!(InvoiceNormalizer::new().normalize_str("{not json").is_err());
    }
}
