//! Rules for reading loosely shaped generator responses.

pub mod amounts;
pub mod fields;
pub mod patterns;

pub use amounts::{AmountError, coerce_decimal, parse_amount};
pub use fields::{FieldKey, text_field};
