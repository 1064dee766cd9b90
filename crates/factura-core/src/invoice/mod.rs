//! Normalization of generator responses.

mod normalizer;
pub mod rules;

pub use normalizer::{InvoiceNormalizer, NormalizationWarning, Normalized, Normalizer, normalize};

use crate::error::NormalizationError;

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizationError>;
