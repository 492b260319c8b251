//! Full analysis: external collaborators first, then the core pipeline.
//!
//! Finding order: signature verdict, metadata lines, document-structure lines (PDF only),
//! then structural, LSB and extension findings.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::external::{DocumentAnalyzer, MetadataTool, SignatureEngine};
use crate::pipeline::{analyze_with, list_files, AnalysisOptions, BatchItem};
use crate::result::{AnalysisResult, Finding, Stage};

const PDF_MAGIC: &[u8] = b"%PDF";

#[inline]
fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// File contents, or the diagnostic result for a file that cannot be read.
fn read_input(path: &Path) -> std::result::Result<Vec<u8>, AnalysisResult> {
    fs::read(path).map_err(|e| {
        let e = Error::io(path, e);
        warn!(path = %path.display(), error = %e, "Cannot read file");
        AnalysisResult::unreadable(format!("Cannot read file: {}", e))
    })
}

/// Core pipeline plus whichever collaborators are configured.
#[derive(Default)]
pub struct FullAnalyzer {
    signatures: Option<Box<dyn SignatureEngine + Send + Sync>>,
    metadata: Option<Box<dyn MetadataTool + Send + Sync>>,
    documents: Option<Box<dyn DocumentAnalyzer + Send + Sync>>,
    options: AnalysisOptions,
}

impl FullAnalyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_signatures(mut self, engine: impl SignatureEngine + Send + Sync + 'static) -> Self {
        self.signatures = Some(Box::new(engine));
        self
    }

    pub fn with_metadata(mut self, tool: impl MetadataTool + Send + Sync + 'static) -> Self {
        self.metadata = Some(Box::new(tool));
        self
    }

    pub fn with_documents(mut self, analyzer: impl DocumentAnalyzer + Send + Sync + 'static) -> Self {
        self.documents = Some(Box::new(analyzer));
        self
    }

    /// Analyze one file. A signature engine failure aborts this file only and is returned
    /// as an error; an unreadable file is a diagnostic result.
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisResult> {
        self.visit_file(path, |_| {})
    }

    /// Like [`analyze_file`](Self::analyze_file), handing `visit` the bytes that were
    /// analyzed (`None` if the file could not be read) before they are dropped.
    pub fn visit_file<F>(&self, path: &Path, visit: F) -> Result<AnalysisResult>
    where
        F: FnOnce(Option<&[u8]>),
    {
        match read_input(path) {
            Ok(data) => {
                visit(Some(&data));
                self.analyze_data(path, &data)
            }
            Err(unreadable) => {
                visit(None);
                Ok(unreadable)
            }
        }
    }

    fn analyze_data(&self, path: &Path, data: &[u8]) -> Result<AnalysisResult> {
        let mut findings = Vec::new();

        if let Some(engine) = &self.signatures {
            findings.push(match engine.scan(path)? {
                None => Finding::info(Stage::Signature, "Signature scan: no rule matched"),
                Some(rule) => Finding::anomaly(
                    Stage::Signature,
                    format!("Signature scan: matched rule {}", rule),
                ),
            });
        }

        if let Some(tool) = &self.metadata {
            let lines = tool.extract(path);
            if lines.is_empty() {
                findings.push(Finding::info(Stage::Metadata, "Metadata: no output"));
            }
            findings.extend(lines.into_iter().map(|l| Finding::info(Stage::Metadata, l)));
        }

        if let (Some(analyzer), true) = (&self.documents, is_pdf(data)) {
            findings.extend(
                analyzer
                    .analyze(path)
                    .into_iter()
                    .map(|l| Finding::info(Stage::Document, l)),
            );
        }

        let core = analyze_with(path, data, self.options);
        debug!(
            path = %path.display(),
            collaborator_findings = findings.len(),
            "Full analysis collaborators done"
        );
        findings.extend(core.findings);
        Ok(AnalysisResult::new(core.format, findings, core.size_bytes))
    }

    /// Analyze every regular file directly inside `dir`. Per-file failures, including
    /// signature engine errors, become diagnostic results and the batch continues.
    pub fn analyze_directory(&self, dir: &Path) -> Result<Vec<BatchItem>> {
        self.visit_directory(dir, |_, _| {})
    }

    /// Like [`analyze_directory`](Self::analyze_directory), calling `visit` once per
    /// entry, in listing order, with the finished item and the bytes it was built from.
    pub fn visit_directory<F>(&self, dir: &Path, mut visit: F) -> Result<Vec<BatchItem>>
    where
        F: FnMut(&BatchItem, Option<&[u8]>),
    {
        let mut items = Vec::new();
        for entry in list_files(dir)? {
            let (path, data) = match entry {
                Ok(path) => {
                    let data = read_input(&path);
                    (path, data)
                }
                Err((path, message)) => {
                    let unreadable = AnalysisResult::unreadable(format!("Cannot read file: {}", message));
                    (path, Err(unreadable))
                }
            };
            let result = match &data {
                Ok(bytes) => self.analyze_data(&path, bytes).unwrap_or_else(|e| {
                    warn!(path = %path.display(), error = %e, "Full analysis failed");
                    AnalysisResult::unreadable(format!("Analysis failed: {}", e))
                }),
                Err(unreadable) => unreadable.clone(),
            };
            let item = BatchItem { path, result };
            visit(&item, data.as_deref().ok());
            items.push(item);
        }
        Ok(items)
    }
}
