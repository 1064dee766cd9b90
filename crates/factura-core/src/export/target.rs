//! Destinations for export artifacts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::ExportError;
use crate::render::HtmlDocument;

/// Where "save as file" writes to (a directory, a browser download, ...).
pub trait SaveTarget {
    /// Persist `bytes` under `filename`.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

/// External facility that turns a document into a printed page or PDF.
pub trait PrintFacility {
    /// Surface type handed out by this facility.
    type Surface: PrintSurface;

    /// Open a fresh surface. `None` means the environment refused (e.g., a popup blocker).
    fn open_surface(&mut self) -> Option<Self::Surface>;
}

/// A detached rendering context owned by a print facility.
pub trait PrintSurface {
    /// Load the complete print-ready document.
    fn write_document(&mut self, document: &HtmlDocument) -> Result<(), ExportError>;

    /// Invoke the print dialog once `settle_delay` has elapsed.
    ///
    /// Implementations must not wait longer than the given delay.
    fn trigger_print(&mut self, settle_delay: Duration) -> Result<(), ExportError>;
}

/// Saves artifacts as files inside a directory.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path a file with `filename` will be written to.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(filename);
        std::fs::write(&path, bytes)?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
