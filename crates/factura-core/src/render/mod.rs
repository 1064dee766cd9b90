//! HTML rendering of canonical invoices.
//!
//! The same fragment is used for on-screen display, for HTML export and,
//! wrapped in a print-styled document, for the print path.

mod html;
pub mod styles;

pub use html::escape_html;

use serde::{Deserialize, Serialize};

use crate::format::CurrencyFormatter;
use crate::models::config::LocaleConfig;
use crate::models::invoice::Invoice;

/// Where a rendered document is going to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Fragment embedded in the running application.
    Screen,
    /// Standalone document for a detached print surface.
    Print,
}

/// Rendered HTML markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HtmlDocument(String);

impl HtmlDocument {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

const DOCUMENT_TITLE: &str = "Factura";

/// Renders invoices with a fixed locale.
#[derive(Debug, Clone)]
pub struct Renderer {
    formatter: CurrencyFormatter,
    lang: String,
}

impl Renderer {
    pub fn new(locale: &LocaleConfig) -> Self {
        Self {
            formatter: CurrencyFormatter::new(locale),
            lang: locale.locale.clone(),
        }
    }

    /// Render an invoice. Output depends only on the invoice and the locale.
    pub fn render(&self, invoice: &Invoice, mode: RenderMode) -> HtmlDocument {
        let fragment = self.fragment(invoice);
        match mode {
            RenderMode::Screen => HtmlDocument(fragment),
            RenderMode::Print => {
                let title = if invoice.customer_name.is_empty() {
                    DOCUMENT_TITLE.to_string()
                } else {
                    format!("{} - {}", DOCUMENT_TITLE, invoice.customer_name)
                };
                HtmlDocument(html::document(&self.lang, &title, styles::PRINT_CSS, &fragment))
            }
        }
    }

    /// Wrap an already rendered screen fragment into a standalone document.
    ///
    /// The fragment is embedded verbatim.
    pub fn wrap_standalone(&self, fragment: &HtmlDocument) -> HtmlDocument {
        HtmlDocument(html::document(
            &self.lang,
            DOCUMENT_TITLE,
            styles::SCREEN_CSS,
            fragment.as_str(),
        ))
    }

    fn fragment(&self, invoice: &Invoice) -> String {
        let f = &self.formatter;
        let mut out = String::with_capacity(2048 + invoice.items.len() * 256);

        out.push_str("<section class=\"invoice\">\n");

        out.push_str("<div class=\"invoice-meta\">\n");
        push_meta(&mut out, "Cliente", &invoice.customer_name);
        push_meta(&mut out, "RUC", &invoice.customer_tax_id);
        out.push_str("</div>\n");

        out.push_str("<table class=\"items-table\">\n");
        out.push_str("<thead>\n<tr>");
        out.push_str("<th>Descripción</th>");
        out.push_str("<th class=\"numeric\">Cantidad</th>");
        out.push_str("<th class=\"numeric\">Precio</th>");
        out.push_str("<th class=\"numeric\">Subtotal</th>");
        out.push_str("</tr>\n</thead>\n");

        out.push_str("<tbody>\n");
        if invoice.items.is_empty() {
            out.push_str("<tr><td class=\"empty\" colspan=\"4\">Sin ítems</td></tr>\n");
        }
        for item in &invoice.items {
            out.push_str(&format!(
                "<tr><td>{}</td><td class=\"numeric\">{}</td><td class=\"numeric\">{}</td><td class=\"numeric\">{}</td></tr>\n",
                escape_html(&item.description),
                f.format_plain_number(item.quantity),
                f.format_currency(item.unit_price),
                f.format_currency(item.line_subtotal),
            ));
        }
        out.push_str("</tbody>\n");
        out.push_str("</table>\n");

        out.push_str("<div class=\"totals\">\n");
        push_total(&mut out, "total-row", "Subtotal", &f.format_currency(invoice.net_amount));
        push_total(&mut out, "total-row", "IGV", &f.format_currency(invoice.tax_amount));
        push_total(
            &mut out,
            "total-row total-amount",
            "Total",
            &f.format_currency(invoice.total_amount),
        );
        out.push_str("</div>\n");

        out.push_str("</section>\n");
        out
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&LocaleConfig::default())
    }
}

fn push_meta(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "<div><p class=\"label\">{}</p><p class=\"value\">{}</p></div>\n",
        label,
        escape_html(value)
    ));
}

fn push_total(out: &mut String, class: &str, label: &str, amount: &str) {
    out.push_str(&format!(
        "<div class=\"{}\"><span>{}</span><span class=\"numeric\">{}</span></div>\n",
        class, label, amount
    ));
}

/// Render with the default locale.
pub fn render_html(invoice: &Invoice, mode: RenderMode) -> HtmlDocument {
    Renderer::default().render(invoice, mode)
}
