//! Locale-fixed currency and number formatting.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::config::LocaleConfig;

/// Rendered in place of absent or non-finite values.
pub const PLACEHOLDER: &str = "-";

/// Formats amounts with one locale and one currency.
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    symbol: String,
    grouping: String,
    decimal: String,
}

impl CurrencyFormatter {
    pub fn new(config: &LocaleConfig) -> Self {
        Self {
            symbol: config.currency_symbol.clone(),
            grouping: config.grouping_separator.clone(),
            decimal: config.decimal_separator.clone(),
        }
    }

    /// Format with currency symbol: `S/ 1,234.56`, `-S/ 12.00`.
    pub fn format_currency(&self, value: Decimal) -> String {
        let (negative, digits) = self.digits(value);
        let sign = if negative { "-" } else { "" };
        if self.symbol.is_empty() {
            format!("{}{}", sign, digits)
        } else {
            format!("{}{} {}", sign, self.symbol, digits)
        }
    }

    /// Format without currency symbol: `1,234.56`, `-3.00`.
    pub fn format_plain_number(&self, value: Decimal) -> String {
        let (negative, digits) = self.digits(value);
        if negative {
            format!("-{}", digits)
        } else {
            digits
        }
    }

    /// Like [`format_currency`](Self::format_currency), but NaN and infinities render as [`PLACEHOLDER`].
    pub fn format_currency_f64(&self, value: f64) -> String {
        match finite_decimal(value) {
            Some(d) => self.format_currency(d),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Like [`format_plain_number`](Self::format_plain_number), but NaN and infinities render as [`PLACEHOLDER`].
    pub fn format_plain_number_f64(&self, value: f64) -> String {
        match finite_decimal(value) {
            Some(d) => self.format_plain_number(d),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Absent amounts render as [`PLACEHOLDER`].
    pub fn format_optional_currency(&self, value: Option<Decimal>) -> String {
        value
            .map(|v| self.format_currency(v))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    /// Sign flag and grouped two-decimal digits of the absolute value.
    fn digits(&self, value: Decimal) -> (bool, String) {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();

        let s = format!("{:.2}", rounded.abs());
        let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

        // Add thousand separators
        let chars: Vec<char> = integer_part.chars().collect();
        let mut formatted = String::new();
        for (i, c) in chars.iter().enumerate() {
            if i > 0 && (chars.len() - i) % 3 == 0 {
                formatted.push_str(&self.grouping);
            }
            formatted.push(*c);
        }

        (negative, format!("{}{}{}", formatted, self.decimal, decimal_part))
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(&LocaleConfig::default())
    }
}

fn finite_decimal(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64(value)
    } else {
        None
    }
}

/// Format with the default locale and currency.
pub fn format_currency(value: Decimal) -> String {
    CurrencyFormatter::default().format_currency(value)
}

/// Format a plain number with the default locale.
pub fn format_plain_number(value: Decimal) -> String {
    CurrencyFormatter::default().format_plain_number(value)
}
