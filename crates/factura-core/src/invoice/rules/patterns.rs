//! Regex patterns for amounts arriving as text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Currency prefix the generator sometimes leaves in place (S/, S/., PEN, $)
    pub static ref CURRENCY_PREFIX: Regex = Regex::new(
        r"(?i)^(?:s/\.?|pen|\$)\s*"
    ).unwrap();

    // Digits with optional grouping and decimal separators
    pub static ref AMOUNT_BODY: Regex = Regex::new(
        r"^\d[\d.,\s\u{00a0}]*$"
    ).unwrap();

    // Comma used purely as a thousands separator: 1,500 / 12,345,678
    pub static ref COMMA_GROUPED: Regex = Regex::new(
        r"^\d{1,3}(?:,\d{3})+$"
    ).unwrap();
}
