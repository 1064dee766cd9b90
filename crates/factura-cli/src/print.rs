//! File-based print facility.
//!
//! The print-ready document is written to disk; when a print command is
//! configured it is run on that file once the settling delay has passed
//! (e.g. a headless browser with `--print-to-pdf`).

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tracing::{info, warn};

use factura_core::{ExportError, HtmlDocument, PrintFacility, PrintSurface};

/// Print facility backed by a file and an optional external command.
pub struct FilePrintFacility {
    path: PathBuf,
    command: Option<Vec<String>>,
}

impl FilePrintFacility {
    pub fn new(path: impl Into<PathBuf>, command: Option<Vec<String>>) -> Self {
        Self {
            path: path.into(),
            command: command.filter(|c| !c.is_empty()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrintFacility for FilePrintFacility {
    type Surface = FilePrintSurface;

    fn open_surface(&mut self) -> Option<FilePrintSurface> {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Cannot create {}: {}", parent.display(), e);
                return None;
            }
        }

        match File::create(&self.path) {
            Ok(file) => Some(FilePrintSurface {
                file,
                path: self.path.clone(),
                command: self.command.clone(),
            }),
            Err(e) => {
                warn!("Cannot open print document {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// An open print document.
pub struct FilePrintSurface {
    file: File,
    path: PathBuf,
    command: Option<Vec<String>>,
}

impl PrintSurface for FilePrintSurface {
    fn write_document(&mut self, document: &HtmlDocument) -> Result<(), ExportError> {
        self.file.write_all(document.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }

    fn trigger_print(&mut self, settle_delay: Duration) -> Result<(), ExportError> {
        let Some(command) = &self.command else {
            info!("Print-ready document written to {}", self.path.display());
            return Ok(());
        };

        std::thread::sleep(settle_delay);

        let (program, args) = command
            .split_first()
            .ok_or_else(|| ExportError::Facility("empty print command".to_string()))?;

        Command::new(program)
            .args(args)
            .arg(&self.path)
            .spawn()
            .map_err(|e| ExportError::Facility(format!("failed to run {}: {}", program, e)))?;

        info!("Started '{}' on {}", program, self.path.display());
        Ok(())
    }
}
