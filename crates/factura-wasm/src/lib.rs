//! WASM bindings for the invoice viewer.
//!
//! This crate provides WebAssembly bindings for use in browsers. Invoices
//! cross the boundary as JSON strings so amounts keep their exact decimal text.

use std::io;
use std::time::Duration;

use js_sys::{Array, Function, Uint8Array};
use tracing::{Level, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url, Window};

use factura_core::{
    ExportArtifact, ExportError, FacturaConfig, FacturaError, GenerationRequest, HtmlDocument,
    InvoiceSession, PrintFacility, PrintSurface, SaveTarget,
};

/// Initialize panic hook and route log events to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Already set when the module is instantiated twice
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(ConsoleWriter::default)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Buffers one formatted event and logs it to the console when dropped.
#[derive(Default)]
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            web_sys::console::log_1(&JsValue::from_str(line));
        }
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Format a number as a currency amount (e.g., "S/ 1,234.56").
#[wasm_bindgen(js_name = formatCurrency)]
pub fn format_currency(value: f64) -> String {
    factura_core::CurrencyFormatter::default().format_currency_f64(value)
}

/// Format a number with grouping and two decimals, without a symbol.
#[wasm_bindgen(js_name = formatPlainNumber)]
pub fn format_plain_number(value: f64) -> String {
    factura_core::CurrencyFormatter::default().format_plain_number_f64(value)
}

/// Build the JSON body sent to the invoice generator.
#[wasm_bindgen(js_name = buildRequest)]
pub fn build_request(prompt: &str) -> Result<String, JsValue> {
    if prompt.trim().is_empty() {
        return Err(JsValue::from_str("Describa la factura que desea generar."));
    }
    serde_json::to_string(&GenerationRequest::new(prompt))
        .map_err(|e| status(ExportError::Serialize(e)))
}

fn status(e: impl Into<FacturaError>) -> JsValue {
    JsValue::from_str(&e.into().user_message())
}

/// Invoice session for browser use.
#[wasm_bindgen]
pub struct FacturaSession {
    session: InvoiceSession,
    json_mime: String,
    html_mime: String,
}

#[wasm_bindgen]
impl FacturaSession {
    /// Create a new session, optionally from a JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FacturaSession, JsValue> {
        let config: FacturaConfig = match config_json.as_deref() {
            Some(text) if !text.trim().is_empty() => serde_json::from_str(text)
                .map_err(|e| status(FacturaError::Config(e.to_string())))?,
            _ => FacturaConfig::default(),
        };

        Ok(Self {
            session: InvoiceSession::new(&config),
            json_mime: "application/json".to_string(),
            html_mime: "text/html;charset=utf-8".to_string(),
        })
    }

    /// Load a generator response. Returns the canonical invoice as JSON.
    ///
    /// On failure the session is cleared and the user-facing status is thrown.
    #[wasm_bindgen]
    pub fn load(&mut self, raw_json: &str) -> Result<String, JsValue> {
        let invoice = self.session.load_str(raw_json).map_err(status)?;
        invoice.to_json_pretty().map_err(status)
    }

    /// Canonical JSON of the current invoice, if any.
    #[wasm_bindgen(js_name = invoiceJson)]
    pub fn invoice_json(&self) -> Result<Option<String>, JsValue> {
        self.session
            .invoice()
            .map(|invoice| invoice.to_json_pretty().map_err(status))
            .transpose()
    }

    /// Screen HTML fragment of the current invoice, if any.
    #[wasm_bindgen(js_name = screenHtml)]
    pub fn screen_html(&self) -> Option<String> {
        self.session
            .screen_html()
            .map(|html| html.as_str().to_string())
    }

    /// Warnings from the last load, as a JSON array.
    #[wasm_bindgen(js_name = warningsJson)]
    pub fn warnings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.warnings())
            .map_err(|e| status(ExportError::Serialize(e)))
    }

    /// Whether an invoice is loaded.
    #[wasm_bindgen(js_name = hasInvoice)]
    pub fn has_invoice(&self) -> bool {
        self.session.invoice().is_some()
    }

    /// Drop the current invoice.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// Download the invoice as `factura.json`. Returns the artifact fingerprint.
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        let mut target = DownloadTarget::new(&self.json_mime);
        let artifact = self.session.export_json(&mut target).map_err(status)?;
        Ok(report(&artifact))
    }

    /// Download the displayed invoice as `factura.html`. Returns the artifact fingerprint.
    #[wasm_bindgen(js_name = exportHtml)]
    pub fn export_html(&self) -> Result<String, JsValue> {
        let mut target = DownloadTarget::new(&self.html_mime);
        let artifact = self.session.export_html(&mut target).map_err(status)?;
        Ok(report(&artifact))
    }

    /// Open a print window with the print-ready invoice. Returns the artifact fingerprint.
    #[wasm_bindgen(js_name = exportPdf)]
    pub fn export_pdf(&self) -> Result<String, JsValue> {
        let mut facility = WindowPrintFacility::new().map_err(status)?;
        let artifact = self.session.export_pdf(&mut facility).map_err(status)?;
        Ok(report(&artifact))
    }
}

fn report(artifact: &ExportArtifact) -> String {
    let fingerprint = artifact.fingerprint();
    info!("Exported {} ({})", artifact.kind().as_str(), fingerprint);
    fingerprint
}

fn window() -> Result<Window, ExportError> {
    web_sys::window().ok_or_else(|| ExportError::Facility("no window".to_string()))
}

fn js_error(context: &str, e: JsValue) -> ExportError {
    let detail = e.as_string().unwrap_or_else(|| format!("{:?}", e));
    ExportError::Facility(format!("{}: {}", context, detail))
}

/// Saves artifacts as browser downloads.
struct DownloadTarget<'a> {
    mime: &'a str,
}

impl<'a> DownloadTarget<'a> {
    fn new(mime: &'a str) -> Self {
        Self { mime }
    }
}

impl SaveTarget for DownloadTarget<'_> {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
        let document = window()?
            .document()
            .ok_or_else(|| ExportError::Facility("no document".to_string()))?;

        let parts = Array::of1(&Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(self.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| js_error("blob", e))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| js_error("object url", e))?;

        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|e| js_error("anchor", e))?
            .dyn_into()
            .map_err(|_| ExportError::Facility("anchor".to_string()))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();

        if let Err(e) = Url::revoke_object_url(&url) {
            warn!("Failed to revoke object URL: {:?}", e);
        }
        Ok(())
    }
}

/// Prints through a fresh browser window.
struct WindowPrintFacility {
    window: Window,
}

impl WindowPrintFacility {
    fn new() -> Result<Self, ExportError> {
        Ok(Self { window: window()? })
    }
}

impl PrintFacility for WindowPrintFacility {
    type Surface = WindowPrintSurface;

    fn open_surface(&mut self) -> Option<WindowPrintSurface> {
        match self.window.open_with_url_and_target("", "_blank") {
            Ok(Some(popup)) => Some(WindowPrintSurface { popup }),
            Ok(None) => None,
            Err(e) => {
                warn!("window.open failed: {:?}", e);
                None
            }
        }
    }
}

struct WindowPrintSurface {
    popup: Window,
}

impl PrintSurface for WindowPrintSurface {
    fn write_document(&mut self, document: &HtmlDocument) -> Result<(), ExportError> {
        let doc = self
            .popup
            .document()
            .ok_or_else(|| ExportError::Facility("print window has no document".to_string()))?
            .unchecked_into::<web_sys::HtmlDocument>();

        doc.open().map_err(|e| js_error("document.open", e))?;
        doc.write(&Array::of1(&JsValue::from_str(document.as_str())))
            .map_err(|e| js_error("document.write", e))?;
        doc.close().map_err(|e| js_error("document.close", e))?;
        Ok(())
    }

    fn trigger_print(&mut self, settle_delay: Duration) -> Result<(), ExportError> {
        let popup = self.popup.clone();
        let callback = Closure::once_into_js(move || {
            if let Err(e) = popup.focus() {
                warn!("Print window focus failed: {:?}", e);
            }
            if let Err(e) = popup.print() {
                warn!("print() failed: {:?}", e);
            }
        });

        let millis = i32::try_from(settle_delay.as_millis()).unwrap_or(i32::MAX);
        self.popup
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref::<Function>(),
                millis,
            )
            .map_err(|e| js_error("setTimeout", e))?;
        Ok(())
    }
}
