//! Core library for invoice normalization and export.
//!
//! This crate provides:
//! - Normalization of loosely shaped generator responses into canonical invoices
//! - Locale-fixed currency formatting
//! - HTML rendering for screen and print
//! - JSON, HTML and print-job exports

pub mod error;
pub mod export;
pub mod format;
pub mod invoice;
pub mod models;
pub mod render;
pub mod session;

pub use error::{ExportError, FacturaError, NormalizationError, Result};
pub use export::{ExportArtifact, ExportEngine, ExportKind, PrintFacility, PrintSurface, SaveTarget};
pub use format::{CurrencyFormatter, format_currency, format_plain_number};
pub use invoice::{InvoiceNormalizer, NormalizationWarning, Normalized, Normalizer, normalize};
pub use models::config::FacturaConfig;
pub use models::invoice::{GenerationRequest, Invoice, LineItem};
pub use render::{HtmlDocument, RenderMode, Renderer, render_html};
pub use session::InvoiceSession;
