//! Holder of the invoice currently on display.
//!
//! A session owns the latest canonical invoice and the screen fragment rendered
//! from it. Exports read immutable snapshots, so loading a new response never
//! affects an export that is already running.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ExportError, NormalizationError};
use crate::export::{ExportArtifact, ExportEngine, PrintFacility, SaveTarget};
use crate::invoice::{InvoiceNormalizer, NormalizationWarning, Normalizer};
use crate::models::config::FacturaConfig;
use crate::models::invoice::Invoice;
use crate::render::{HtmlDocument, RenderMode};

/// Current invoice plus the collaborators needed to show and export it.
#[derive(Debug, Clone)]
pub struct InvoiceSession {
    normalizer: InvoiceNormalizer,
    engine: ExportEngine,
    invoice: Option<Arc<Invoice>>,
    screen: Option<Arc<HtmlDocument>>,
    warnings: Vec<NormalizationWarning>,
}

impl InvoiceSession {
    pub fn new(config: &FacturaConfig) -> Self {
        Self {
            normalizer: InvoiceNormalizer::from_config(&config.response),
            engine: ExportEngine::from_config(config),
            invoice: None,
            screen: None,
            warnings: Vec::new(),
        }
    }

    /// Normalize a response and make it the current invoice.
    ///
    /// On failure the previous invoice is dropped as well, so later exports
    /// report [`ExportError::NoInvoiceLoaded`].
    pub fn load(&mut self, raw: &Value) -> Result<Arc<Invoice>, NormalizationError> {
        match self.normalizer.normalize(raw) {
            Ok(normalized) => {
                let invoice = Arc::new(normalized.invoice);
                let screen = self.engine.renderer().render(&invoice, RenderMode::Screen);

                self.invoice = Some(invoice.clone());
                self.screen = Some(Arc::new(screen));
                self.warnings = normalized.warnings;
                debug!("Session holds invoice with {} warnings", self.warnings.len());
                Ok(invoice)
            }
            Err(e) => {
                warn!("Rejected response: {}", e);
                self.clear();
                Err(e)
            }
        }
    }

    /// Parse JSON text and [`load`](Self::load) it.
    pub fn load_str(&mut self, text: &str) -> crate::Result<Arc<Invoice>> {
        let raw: Value = match serde_json::from_str(text) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Response is not valid JSON: {}", e);
                self.clear();
                return Err(e.into());
            }
        };
        Ok(self.load(&raw)?)
    }

    /// Forget the current invoice.
    pub fn clear(&mut self) {
        self.invoice = None;
        self.screen = None;
        self.warnings.clear();
    }

    /// Snapshot of the current invoice.
    pub fn invoice(&self) -> Option<Arc<Invoice>> {
        self.invoice.clone()
    }

    /// Fragment currently displayed.
    pub fn screen_html(&self) -> Option<Arc<HtmlDocument>> {
        self.screen.clone()
    }

    /// Warnings from the last successful load.
    pub fn warnings(&self) -> &[NormalizationWarning] {
        &self.warnings
    }

    pub fn engine(&self) -> &ExportEngine {
        &self.engine
    }

    /// Export the current invoice as JSON and save it.
    pub fn export_json<T: SaveTarget + ?Sized>(
        &self,
        target: &mut T,
    ) -> Result<ExportArtifact, ExportError> {
        let snapshot = self.invoice();
        let artifact = self.engine.export_json(snapshot.as_deref())?;
        artifact.save_to(target)?;
        Ok(artifact)
    }

    /// Export the displayed fragment as a standalone HTML file and save it.
    pub fn export_html<T: SaveTarget + ?Sized>(
        &self,
        target: &mut T,
    ) -> Result<ExportArtifact, ExportError> {
        let snapshot = self.screen_html();
        let artifact = self.engine.export_html(snapshot.as_deref())?;
        artifact.save_to(target)?;
        Ok(artifact)
    }

    /// Send the current invoice to a print facility.
    pub fn export_pdf<F: PrintFacility + ?Sized>(
        &self,
        facility: &mut F,
    ) -> Result<ExportArtifact, ExportError> {
        let snapshot = self.invoice();
        self.engine.export_pdf(snapshot.as_deref(), facility)
    }
}

impl Default for InvoiceSession {
    fn default() -> Self {
        Self::new(&FacturaConfig::default())
    }
}
