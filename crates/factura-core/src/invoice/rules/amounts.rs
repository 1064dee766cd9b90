//! Coercion of loosely typed amounts into decimals.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::patterns::{AMOUNT_BODY, COMMA_GROUPED, CURRENCY_PREFIX};

/// Why a value could not be read as an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    /// Not a number, nor text that reads as one.
    NotNumeric,
    /// Numeric, but beyond what a decimal can hold.
    OutOfRange,
}

/// Coerce a JSON value into a decimal.
///
/// Numbers are taken digit for digit; strings go through [`parse_amount`].
pub fn coerce_decimal(value: &Value) -> Result<Decimal, AmountError> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| AmountError::OutOfRange)
        }
        Value::String(s) => read_amount(s),
        _ => Err(AmountError::NotNumeric),
    }
}

/// Parse an amount written as text (e.g., "1,500.00", "S/ 50", "-12.5", "1.234,56").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    read_amount(s).ok()
}

fn read_amount(s: &str) -> Result<Decimal, AmountError> {
    let trimmed = s.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed).trim_start()),
    };
    let rest = CURRENCY_PREFIX.replace(rest, "");
    // Sign may also follow the symbol: "S/ -50"
    let (negative, rest) = match rest.strip_prefix('-') {
        Some(r) if !negative => (true, r.trim_start().to_string()),
        _ => (negative, rest.to_string()),
    };

    if !AMOUNT_BODY.is_match(&rest) {
        return Err(AmountError::NotNumeric);
    }

    let cleaned: String = rest
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        if COMMA_GROUPED.is_match(&cleaned) {
            cleaned.replace(',', "")
        } else {
            cleaned.replace(',', ".")
        }
    } else if cleaned.contains(',') && cleaned.contains('.') {
        // Whichever separator comes last is the decimal one
        let comma_pos = cleaned.rfind(',');
        let dot_pos = cleaned.rfind('.');
        match (comma_pos, dot_pos) {
            (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
            _ => cleaned.replace(',', ""),
        }
    } else {
        cleaned
    };

    let amount = Decimal::from_str(&normalized).map_err(|_| AmountError::OutOfRange)?;
    Ok(if negative { -amount } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,500.00"), Some(Decimal::from_str("1500.00").unwrap()));
        assert_eq!(parse_amount("1500"), Some(Decimal::from(1500)));
        assert_eq!(parse_amount("S/ 50"), Some(Decimal::from(50)));
        assert_eq!(parse_amount("S/. 1,234.56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("1.234,56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("12,5"), Some(Decimal::from_str("12.5").unwrap()));
        assert_eq!(parse_amount("-12.5"), Some(Decimal::from_str("-12.5").unwrap()));
        assert_eq!(parse_amount("S/ -3"), Some(Decimal::from(-3)));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("tres"), None);
        assert_eq!(parse_amount("12abc"), None);
        assert_eq!(parse_amount("--5"), None);
    }

    #[test]
    fn test_coerce_json_values() {
        assert_eq!(coerce_decimal(&json!(3)), Ok(Decimal::from(3)));
        assert_eq!(coerce_decimal(&json!(0.1)), Ok(Decimal::from_str("0.1").unwrap()));
        assert_eq!(coerce_decimal(&json!("2")), Ok(Decimal::from(2)));
        assert_eq!(coerce_decimal(&json!(true)), Err(AmountError::NotNumeric));
        assert_eq!(coerce_decimal(&json!([1])), Err(AmountError::NotNumeric));
        assert_eq!(coerce_decimal(&Value::Null), Err(AmountError::NotNumeric));
        assert_eq!(coerce_decimal(&json!("diez")), Err(AmountError::NotNumeric));
    }

    #[test]
    fn test_coerce_out_of_range() {
        let huge: Value = serde_json::from_str("100000000000000000000000000000000").unwrap();
        assert_eq!(coerce_decimal(&huge), Err(AmountError::OutOfRange));

        let scientific: Value = serde_json::from_str("1e40").unwrap();
        assert_eq!(coerce_decimal(&scientific), Err(AmountError::OutOfRange));

        assert_eq!(
            coerce_decimal(&json!("100000000000000000000000000000000")),
            Err(AmountError::OutOfRange)
        );
        assert_eq!(parse_amount("100000000000000000000000000000000"), None);
    }
}
