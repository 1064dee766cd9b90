//! Error types for the factura-core library.

use thiserror::Error;

/// Main error type for the factura library.
#[derive(Error, Debug)]
pub enum FacturaError {
    /// Raw response could not be turned into a canonical invoice.
    #[error("normalization error: {0}")]
    Normalization(#[from] NormalizationError),

    /// Export could not be produced or delivered.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Raw input was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while normalizing a generator response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    /// Upstream reported failure, or the document is not shaped like an invoice response.
    #[error("invalid response shape: {0}")]
    InvalidResponseShape(String),

    /// A line item carried data that cannot be coerced.
    #[error("invalid line item {index}: {reason}")]
    InvalidLineItem { index: usize, reason: String },
}

/// Errors raised by the export engine.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Export requested before any invoice was successfully loaded.
    #[error("no invoice loaded")]
    NoInvoiceLoaded,

    /// The print surface could not be opened.
    #[error("print surface could not be opened")]
    PopupBlocked,

    /// Canonical invoice could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Artifact could not be written to its target.
    #[error("failed to write artifact: {0}")]
    Io(#[from] std::io::Error),

    /// The external print facility rejected the document or the trigger.
    #[error("print facility error: {0}")]
    Facility(String),
}

impl FacturaError {
    /// Message suitable for showing to the user instead of the raw error.
    pub fn user_message(&self) -> String {
        match self {
            FacturaError::Normalization(NormalizationError::InvalidResponseShape(_)) => {
                "La respuesta del servicio no contiene una factura válida.".to_string()
            }
            FacturaError::Normalization(NormalizationError::InvalidLineItem { index, reason }) => {
                format!("El ítem {} de la factura no es válido: {}.", index + 1, reason)
            }
            FacturaError::Export(e) => e.user_message(),
            FacturaError::Json(_) => "La respuesta del servicio no es un JSON válido.".to_string(),
            FacturaError::Io(e) => format!("Error de entrada/salida: {}", e),
            FacturaError::Config(msg) => format!("Error de configuración: {}", msg),
        }
    }
}

impl ExportError {
    /// Message suitable for showing to the user instead of the raw error.
    pub fn user_message(&self) -> String {
        match self {
            ExportError::NoInvoiceLoaded => "No hay ninguna factura cargada para exportar.".to_string(),
            ExportError::PopupBlocked => {
                "No se pudo abrir la ventana de impresión. Permita las ventanas emergentes e inténtelo de nuevo."
                    .to_string()
            }
            ExportError::Serialize(e) => format!("No se pudo serializar la factura: {}", e),
            ExportError::Io(e) => format!("No se pudo guardar el archivo: {}", e),
            ExportError::Facility(msg) => format!("Error al imprimir: {}", msg),
        }
    }
}

/// Result type for the factura library.
pub type Result<T> = std::result::Result<T, FacturaError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn test_serialize_failure_is_not_blamed_on_response() {
        let message = FacturaError::from(ExportError::Serialize(json_error())).user_message();
        assert!(message.starts_with("No se pudo serializar la factura"));
    }

    #[test]
    fn test_unparseable_response_message() {
        assert_eq!(
            FacturaError::from(json_error()).user_message(),
            "La respuesta del servicio no es un JSON válido."
        );
    }

    #[test]
    fn test_popup_blocked_message() {
        assert!(ExportError::PopupBlocked
            .user_message()
            .contains("ventanas emergentes"));
    }
}
