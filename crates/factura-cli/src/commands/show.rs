//! Show command - display the invoice contained in a generator response.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use factura_core::{CurrencyFormatter, FacturaConfig, Invoice};

use super::{load_config, load_session, user_error};

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Generator response (JSON file, or - for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ShowFormat,

    /// Report missing fields and inconsistent totals
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ShowFormat {
    /// Plain text summary
    Text,
    /// Canonical invoice as JSON
    Json,
    /// Screen HTML fragment
    Html,
}

pub async fn run(args: ShowArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let session = load_session(&args.input, &config)?;
    let invoice = session
        .invoice()
        .ok_or_else(|| anyhow::anyhow!("No invoice loaded"))?;

    info!("Showing invoice for '{}'", invoice.customer_name);

    if args.validate {
        let issues = invoice.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = match args.format {
        ShowFormat::Text => format_text(&invoice, &config),
        ShowFormat::Json => invoice.to_json_pretty().map_err(user_error)?,
        ShowFormat::Html => session
            .screen_html()
            .map(|html| html.as_str().to_string())
            .ok_or_else(|| anyhow::anyhow!("Nothing rendered"))?,
    };

    println!("{}", output);

    Ok(())
}

fn format_text(invoice: &Invoice, config: &FacturaConfig) -> String {
    let f = CurrencyFormatter::new(&config.locale);
    let mut output = String::new();

    output.push_str(&format!("Cliente: {}\n", invoice.customer_name));
    output.push_str(&format!("RUC:     {}\n", invoice.customer_tax_id));
    output.push('\n');

    if invoice.items.is_empty() {
        output.push_str("  (sin ítems)\n");
    }
    for item in &invoice.items {
        output.push_str(&format!(
            "  {:<30} {:>10} x {:>14} = {:>14}\n",
            item.description,
            f.format_plain_number(item.quantity),
            f.format_currency(item.unit_price),
            f.format_currency(item.line_subtotal),
        ));
    }
    output.push('\n');

    output.push_str(&format!("Subtotal: {:>16}\n", f.format_currency(invoice.net_amount)));
    output.push_str(&format!("IGV:      {:>16}\n", f.format_currency(invoice.tax_amount)));
    output.push_str(&format!("Total:    {:>16}\n", f.format_currency(invoice.total_amount)));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Invoice {
        let raw = serde_json::json!({
            "status": "ok",
            "factura": {
                "cliente": "ACME S.A.",
                "ruc": "12345678901",
                "items": [{"descripcion": "Laptop", "cantidad": 3, "precio": 1500}],
                "igv": 810
            }
        });
        factura_core::normalize(&raw).unwrap().invoice
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&sample(), &FacturaConfig::default());

        assert!(text.starts_with("Cliente: ACME S.A.\nRUC:     12345678901\n"));
        assert!(text.contains("Laptop"));
        assert!(text.contains("S/ 4,500.00"));
        assert!(text
            .lines()
            .any(|l| l.starts_with("Total:") && l.ends_with("S/ 5,310.00")));
    }

    #[test]
    fn test_format_text_empty_items() {
        let mut invoice = sample();
        invoice.items.clear();
        assert!(format_text(&invoice, &FacturaConfig::default()).contains("(sin ítems)"));
    }
}
