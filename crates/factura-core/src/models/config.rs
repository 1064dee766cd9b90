//! Configuration structures for the normalization and export pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the factura pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturaConfig {
    /// Number and currency display.
    pub locale: LocaleConfig,

    /// Generator response handling.
    pub response: ResponseConfig,

    /// Export filenames and print behaviour.
    pub export: ExportConfig,
}

/// Locale and currency used for every formatted number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// IETF language tag, written to the `lang` attribute of exported documents.
    pub locale: String,

    /// ISO 4217 currency code.
    pub currency_code: String,

    /// Symbol prefixed to currency amounts.
    pub currency_symbol: String,

    /// Thousands separator.
    pub grouping_separator: String,

    /// Decimal separator.
    pub decimal_separator: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            locale: "es-PE".to_string(),
            currency_code: "PEN".to_string(),
            currency_symbol: "S/".to_string(),
            grouping_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

/// Generator response configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Values of the `status` field that mark a successful response.
    pub success_markers: Vec<String>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            success_markers: vec!["ok".to_string(), "success".to_string()],
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Filename for JSON exports.
    pub json_filename: String,

    /// Filename for HTML exports.
    pub html_filename: String,

    /// Filename of the print-ready document handed to a file-based print facility.
    pub print_filename: String,

    /// Delay between writing the print document and triggering print.
    pub print_settle_ms: u64,

    /// Command run on the print document (CLI only), e.g.
    /// `["chromium", "--headless", "--print-to-pdf=factura.pdf"]`.
    /// The document path is appended as the last argument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_command: Option<Vec<String>>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            json_filename: "factura.json".to_string(),
            html_filename: "factura.html".to_string(),
            print_filename: "factura-print.html".to_string(),
            print_settle_ms: 250,
            print_command: None,
        }
    }
}

impl ExportConfig {
    /// Settling delay as a duration.
    pub fn print_settle_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.print_settle_ms)
    }
}

impl FacturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FacturaConfig =
            serde_json::from_str(r#"{"export": {"print_settle_ms": 800}}"#).unwrap();

        assert_eq!(config.export.print_settle_ms, 800);
        assert_eq!(config.export.json_filename, "factura.json");
        assert_eq!(config.locale.currency_code, "PEN");
        assert_eq!(config.response.success_markers, vec!["ok", "success"]);
    }

    #[test]
    fn test_settle_delay() {
        let config = ExportConfig::default();
        assert_eq!(config.print_settle_delay().as_millis(), 250);
    }
}
