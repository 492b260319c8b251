//! Sniff → validate → LSB → extension → verdict, for a buffer, a file, or a directory.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::extension::correlate_extension;
use crate::lsb::analyze_lsb;
use crate::result::AnalysisResult;
use crate::sniff::detect_format;
use crate::validate::validate;

/// Which core stages run. Sniffing always runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Per-format container validation.
    pub structure: bool,
    /// LSB statistics for formats that support it.
    pub lsb: bool,
    /// File name correlation.
    pub extension: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            structure: true,
            lsb: true,
            extension: true,
        }
    }
}

impl AnalysisOptions {
    /// No core stage; only the detected format is reported.
    pub const NONE: Self = Self {
        structure: false,
        lsb: false,
        extension: false,
    };
}

/// Narrow a run to one family of checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Scope {
    /// Every configured stage.
    #[default]
    All,
    /// Container structure and LSB statistics.
    Content,
    /// File name checks only.
    Extension,
    /// External metadata tool only.
    Metadata,
}

impl Scope {
    /// Core options for this scope; `All` keeps `base` as configured.
    pub fn apply(self, base: AnalysisOptions) -> AnalysisOptions {
        match self {
            Scope::All => base,
            Scope::Content => AnalysisOptions {
                structure: true,
                lsb: true,
                extension: false,
            },
            Scope::Extension => AnalysisOptions {
                extension: true,
                ..AnalysisOptions::NONE
            },
            Scope::Metadata => AnalysisOptions::NONE,
        }
    }

    /// The metadata tool must run regardless of configuration.
    pub fn requires_metadata(self) -> bool {
        self == Scope::Metadata
    }
}

/// Result of analyzing one entry of a directory.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: AnalysisResult,
}

/// Analyze an in-memory buffer presented under `path`. The path is only used for
/// extension correlation; the format comes from `data` alone.
pub fn analyze(path: &Path, data: &[u8]) -> AnalysisResult {
    analyze_with(path, data, AnalysisOptions::default())
}

pub fn analyze_with(path: &Path, data: &[u8], options: AnalysisOptions) -> AnalysisResult {
    let format = detect_format(data);

    let mut findings = Vec::new();
    if options.structure {
        findings.extend(validate(format, data));
    }
    let structural = findings.len();
    if options.lsb && format.is_lsb_relevant() {
        findings.extend(analyze_lsb(data));
    }
    let lsb = findings.len() - structural;
    if options.extension {
        findings.extend(correlate_extension(format, path));
    }

    let result = AnalysisResult::new(format, findings, Some(data.len()));
    debug!(
        path = %path.display(),
        tag = format.label(),
        size = data.len(),
        structural,
        lsb,
        anomalies = result.anomalies().count(),
        "Analyzed buffer"
    );
    result
}

/// Read and analyze one file; I/O failures are returned as errors.
pub fn try_analyze_file(path: impl AsRef<Path>) -> Result<AnalysisResult> {
    try_analyze_file_with(path.as_ref(), AnalysisOptions::default())
}

pub fn try_analyze_file_with(path: &Path, options: AnalysisOptions) -> Result<AnalysisResult> {
    let data = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(analyze_with(path, &data, options))
}

/// Read and analyze one file. An unreadable file yields a single diagnostic finding.
pub fn analyze_file(path: impl AsRef<Path>) -> AnalysisResult {
    analyze_file_with(path.as_ref(), AnalysisOptions::default())
}

pub fn analyze_file_with(path: &Path, options: AnalysisOptions) -> AnalysisResult {
    try_analyze_file_with(path, options).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Cannot read file");
        AnalysisResult::unreadable(format!("Cannot read file: {}", e))
    })
}

/// A directory entry: a regular file, or a path plus the reason it could not be inspected.
pub type ListedFile = std::result::Result<PathBuf, (PathBuf, String)>;

/// Regular files directly inside `dir`, sorted by name. Entries that cannot be
/// inspected are returned as errors so the caller can record them.
pub fn list_files(dir: &Path) -> Result<Vec<ListedFile>> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(e) if e.file_type().is_file() => entries.push(Ok(e.into_path())),
            Ok(_) => {}
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                entries.push(Err((path, e.to_string())));
            }
        }
    }
    Ok(entries)
}

/// Analyze every regular file directly inside `dir` (no recursion).
/// One file failing never stops the batch.
pub fn analyze_directory(dir: impl AsRef<Path>) -> Result<Vec<BatchItem>> {
    analyze_directory_with(dir.as_ref(), AnalysisOptions::default())
}

pub fn analyze_directory_with(dir: &Path, options: AnalysisOptions) -> Result<Vec<BatchItem>> {
    let items: Vec<BatchItem> = list_files(dir)?
        .into_iter()
        .map(|entry| batch_item(entry, options))
        .collect();
    log_batch(dir, &items);
    Ok(items)
}

/// Same output as [`analyze_directory`], with files analyzed on the rayon pool.
#[cfg(feature = "parallel")]
pub fn analyze_directory_parallel(dir: impl AsRef<Path>) -> Result<Vec<BatchItem>> {
    use rayon::prelude::*;

    let dir = dir.as_ref();
    let options = AnalysisOptions::default();
    let items: Vec<BatchItem> = list_files(dir)?
        .into_par_iter()
        .map(|entry| batch_item(entry, options))
        .collect();
    log_batch(dir, &items);
    Ok(items)
}

fn batch_item(entry: ListedFile, options: AnalysisOptions) -> BatchItem {
    match entry {
        Ok(path) => {
            let result = analyze_file_with(&path, options);
            BatchItem { path, result }
        }
        Err((path, message)) => {
            warn!(path = %path.display(), error = %message, "Cannot inspect directory entry");
            BatchItem {
                path,
                result: AnalysisResult::unreadable(format!("Cannot read file: {}", message)),
            }
        }
    }
}

fn log_batch(dir: &Path, items: &[BatchItem]) {
    info!(
        dir = %dir.display(),
        files = items.len(),
        suspicious = items.iter().filter(|i| i.result.suspicious).count(),
        "Directory analyzed"
    );
}
