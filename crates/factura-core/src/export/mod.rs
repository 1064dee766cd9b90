//! Export of canonical invoices as JSON, HTML and print jobs.

mod target;

pub use target::{DirectoryTarget, PrintFacility, PrintSurface, SaveTarget};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::ExportError;
use crate::models::config::{ExportConfig, FacturaConfig};
use crate::models::invoice::Invoice;
use crate::render::{HtmlDocument, RenderMode, Renderer};

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Kind of export artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Json,
    Html,
    PdfPrintJob,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Json => "json",
            ExportKind::Html => "html",
            ExportKind::PdfPrintJob => "pdf-print-job",
        }
    }
}

/// Output of an export operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportArtifact {
    /// Canonical invoice as indented JSON.
    Json { filename: String, bytes: Vec<u8> },
    /// Standalone copy of the displayed view.
    Html { filename: String, bytes: Vec<u8> },
    /// Print-ready document already handed to a print facility.
    PdfPrintJob { document: HtmlDocument },
}

impl ExportArtifact {
    pub fn kind(&self) -> ExportKind {
        match self {
            ExportArtifact::Json { .. } => ExportKind::Json,
            ExportArtifact::Html { .. } => ExportKind::Html,
            ExportArtifact::PdfPrintJob { .. } => ExportKind::PdfPrintJob,
        }
    }

    /// Suggested filename; print jobs have none.
    pub fn filename(&self) -> Option<&str> {
        match self {
            ExportArtifact::Json { filename, .. } | ExportArtifact::Html { filename, .. } => {
                Some(filename.as_str())
            }
            ExportArtifact::PdfPrintJob { .. } => None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            ExportArtifact::Json { bytes, .. } | ExportArtifact::Html { bytes, .. } => bytes.as_slice(),
            ExportArtifact::PdfPrintJob { document } => document.as_bytes(),
        }
    }

    /// SHA-256 of the artifact content, lowercase hex.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Hand a file artifact to a save target. Print jobs were already delivered.
    pub fn save_to<T: SaveTarget + ?Sized>(&self, target: &mut T) -> Result<()> {
        match self {
            ExportArtifact::Json { filename, bytes } | ExportArtifact::Html { filename, bytes } => {
                target.save(filename, bytes)
            }
            ExportArtifact::PdfPrintJob { .. } => {
                debug!("Print job has no file to save");
                Ok(())
            }
        }
    }
}

/// Produces export artifacts from canonical invoices.
#[derive(Debug, Clone)]
pub struct ExportEngine {
    renderer: Renderer,
    config: ExportConfig,
}

impl ExportEngine {
    pub fn new(renderer: Renderer, config: ExportConfig) -> Self {
        Self { renderer, config }
    }

    pub fn from_config(config: &FacturaConfig) -> Self {
        Self::new(Renderer::new(&config.locale), config.export.clone())
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Serialize the canonical invoice.
    pub fn export_json(&self, invoice: Option<&Invoice>) -> Result<ExportArtifact> {
        let invoice = invoice.ok_or(ExportError::NoInvoiceLoaded)?;
        let mut bytes = invoice.to_json_pretty()?.into_bytes();
        bytes.push(b'\n');

        let artifact = ExportArtifact::Json {
            filename: self.config.json_filename.clone(),
            bytes,
        };
        info!("Exported JSON ({} bytes)", artifact.bytes().len());
        Ok(artifact)
    }

    /// Wrap the fragment currently on screen into a standalone document.
    ///
    /// The fragment is not re-rendered, so the file matches what is displayed.
    pub fn export_html(&self, fragment: Option<&HtmlDocument>) -> Result<ExportArtifact> {
        let fragment = fragment.ok_or(ExportError::NoInvoiceLoaded)?;
        let document = self.renderer.wrap_standalone(fragment);

        let artifact = ExportArtifact::Html {
            filename: self.config.html_filename.clone(),
            bytes: document.into_string().into_bytes(),
        };
        info!("Exported HTML ({} bytes)", artifact.bytes().len());
        Ok(artifact)
    }

    /// Render a print document and hand it to the print facility.
    pub fn export_pdf<F: PrintFacility + ?Sized>(
        &self,
        invoice: Option<&Invoice>,
        facility: &mut F,
    ) -> Result<ExportArtifact> {
        let invoice = invoice.ok_or(ExportError::NoInvoiceLoaded)?;
        let mut surface = facility.open_surface().ok_or(ExportError::PopupBlocked)?;

        let document = self.renderer.render(invoice, RenderMode::Print);
        surface.write_document(&document)?;
        surface.trigger_print(self.config.print_settle_delay())?;

        info!(
            "Dispatched print job ({} bytes, settle {}ms)",
            document.as_str().len(),
            self.config.print_settle_ms
        );
        Ok(ExportArtifact::PdfPrintJob { document })
    }
}

impl Default for ExportEngine {
    fn default() -> Self {
        Self::from_config(&FacturaConfig::default())
    }
}
