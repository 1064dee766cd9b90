//! CLI subcommands and the helpers they share.

pub mod config;
pub mod export;
pub mod request;
pub mod show;

use std::io::Read;
use std::path::{Path, PathBuf};

use console::style;
use tracing::debug;

use factura_core::{FacturaConfig, FacturaError, InvoiceSession};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("factura")
        .join("config.json")
}

/// Load configuration from `--config`, the default path, or built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FacturaConfig> {
    if let Some(path) = config_path {
        return Ok(FacturaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        Ok(FacturaConfig::from_file(&default_path)?)
    } else {
        Ok(FacturaConfig::default())
    }
}

/// Read a generator response from a file, or stdin when `input` is `-`.
pub fn read_response(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Ok(std::fs::read_to_string(input)?)
}

/// Load a response into a fresh session, printing warnings.
///
/// Failures carry the user-facing message as context.
pub fn load_session(input: &Path, config: &FacturaConfig) -> anyhow::Result<InvoiceSession> {
    let text = read_response(input)?;
    let mut session = InvoiceSession::new(config);

    session.load_str(&text).map_err(user_error)?;

    for warning in session.warnings() {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    Ok(session)
}

/// Convert a library error into an `anyhow` error with the user-facing message on top.
pub fn user_error(e: impl Into<FacturaError>) -> anyhow::Error {
    let e = e.into();
    let message = e.user_message();
    anyhow::Error::new(e).context(message)
}
