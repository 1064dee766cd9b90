//! Export command - write an invoice as JSON, HTML or a print job.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use factura_core::ExportArtifact;
use factura_core::export::DirectoryTarget;

use super::{load_config, load_session, user_error};
use crate::print::FilePrintFacility;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Generator response (JSON file, or - for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    format: ExportFormat,

    /// Directory the artifact is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the artifact's SHA-256 fingerprint
    #[arg(long)]
    fingerprint: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ExportFormat {
    /// Canonical invoice as JSON
    Json,
    /// Standalone HTML snapshot of the displayed invoice
    Html,
    /// Print-ready document handed to the print facility
    Pdf,
}

pub async fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let session = load_session(&args.input, &config)?;
    let mut target = DirectoryTarget::new(&args.output_dir);

    let (artifact, written) = match args.format {
        ExportFormat::Json => {
            let artifact = session.export_json(&mut target).map_err(user_error)?;
            let path = target.path_for(&config.export.json_filename);
            (artifact, path)
        }
        ExportFormat::Html => {
            let artifact = session.export_html(&mut target).map_err(user_error)?;
            let path = target.path_for(&config.export.html_filename);
            (artifact, path)
        }
        ExportFormat::Pdf => {
            let mut facility = FilePrintFacility::new(
                target.path_for(&config.export.print_filename),
                config.export.print_command.clone(),
            );
            let artifact = session.export_pdf(&mut facility).map_err(user_error)?;
            (artifact, facility.path().to_path_buf())
        }
    };

    report(&artifact, &written, args.fingerprint);
    debug!("Export took {:?}", start.elapsed());

    Ok(())
}

fn report(artifact: &ExportArtifact, written: &std::path::Path, fingerprint: bool) {
    println!(
        "{} {} written to {}",
        style("✓").green(),
        artifact.kind().as_str(),
        written.display()
    );
    if fingerprint {
        println!("{} sha256 {}", style("ℹ").blue(), artifact.fingerprint());
    }
}
