//! Collaborators that live outside the core analysis: a rule-based signature engine,
//! a PDF structure analyzer, a metadata extraction tool and a report sink.
//!
//! Only [`ExifTool`] is implemented here; the others are seams for callers to plug in.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::BatchItem;
use crate::result::AnalysisResult;

/// Compiled-rule matcher. `Ok(None)` means no rule matched ("OK").
///
/// Loading an unreadable or invalid rule database is a configuration failure and should
/// be reported when the engine is constructed; `scan` errors abort only that file.
pub trait SignatureEngine {
    fn scan(&self, path: &Path) -> Result<Option<String>>;
}

/// PDF object-graph inspection; returns ordered human-readable findings.
pub trait DocumentAnalyzer {
    fn analyze(&self, path: &Path) -> Vec<String>;
}

/// Metadata extraction; returns the tool's output line by line.
/// Implementations degrade to an empty list instead of failing.
pub trait MetadataTool {
    fn extract(&self, path: &Path) -> Vec<String>;
}

/// Report persistence. Returns the path of the written report.
pub trait ReportSink {
    fn write_single(&self, path: &Path, result: &AnalysisResult) -> Result<PathBuf>;
    fn write_batch(&self, dir: &Path, items: &[BatchItem]) -> Result<PathBuf>;
}

/// Default metadata tool command.
pub const EXIFTOOL_COMMAND: &str = "exiftool";

/// Runs `exiftool <path>` and captures stdout.
#[derive(Debug, Clone)]
pub struct ExifTool {
    command: String,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new(EXIFTOOL_COMMAND)
    }
}

impl ExifTool {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl MetadataTool for ExifTool {
    fn extract(&self, path: &Path) -> Vec<String> {
        let output = match Command::new(&self.command).arg(path).output() {
            Ok(output) => output,
            Err(e) => {
                warn!(command = %self.command, path = %path.display(), error = %e, "Cannot launch metadata tool");
                return Vec::new();
            }
        };
        if !output.status.success() {
            debug!(
                command = %self.command,
                path = %path.display(),
                status = %output.status,
                "Metadata tool exited with failure"
            );
        }
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect()
    }
}
