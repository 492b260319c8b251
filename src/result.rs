//! Analysis result types: ordered findings and the overall verdict.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::FormatTag;

/// How much weight a finding carries toward the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FindingKind {
    /// Context only (counts, parsed header fields, diagnostics).
    Info,
    /// Structural irregularity or statistical signal; makes the verdict positive.
    Anomaly,
}

/// Which part of the pipeline produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Stage {
    /// File could not be loaded.
    Io,
    /// Signature engine verdict (full analysis only).
    Signature,
    /// External metadata tool output (full analysis only).
    Metadata,
    /// Document-structure analyzer output (full analysis only).
    Document,
    /// Per-format container validator.
    Structure,
    /// Least-significant-bit statistics.
    Lsb,
    /// File name / extension correlation.
    Extension,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Io => "io",
            Stage::Signature => "signature",
            Stage::Metadata => "metadata",
            Stage::Document => "document",
            Stage::Structure => "structure",
            Stage::Lsb => "lsb",
            Stage::Extension => "extension",
        }
    }
}

/// One human-readable observation about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Finding {
    pub stage: Stage,
    pub kind: FindingKind,
    pub message: String,
}

impl Finding {
    pub fn info(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind: FindingKind::Info,
            message: message.into(),
        }
    }

    pub fn anomaly(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind: FindingKind::Anomaly,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_anomaly(&self) -> bool {
        self.kind == FindingKind::Anomaly
    }
}

/// True iff at least one finding is an anomaly.
#[inline]
pub fn derive_verdict(findings: &[Finding]) -> bool {
    findings.iter().any(Finding::is_anomaly)
}

/// Result of analyzing one file or buffer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AnalysisResult {
    /// Format classified from content alone.
    pub format: FormatTag,
    /// Structural findings, then LSB findings, then extension findings.
    pub findings: Vec<Finding>,
    /// True iff any finding is an anomaly.
    pub suspicious: bool,
    /// Size of the analyzed buffer (None when the file could not be read).
    pub size_bytes: Option<usize>,
}

impl AnalysisResult {
    /// Build a result, deriving the verdict from `findings`.
    pub fn new(format: FormatTag, findings: Vec<Finding>, size_bytes: Option<usize>) -> Self {
        let suspicious = derive_verdict(&findings);
        Self {
            format,
            findings,
            suspicious,
            size_bytes,
        }
    }

    /// Result for a file that could not be loaded: one diagnostic, no verdict.
    pub fn unreadable(message: impl Into<String>) -> Self {
        Self::new(
            FormatTag::Unknown,
            vec![Finding::info(Stage::Io, message)],
            None,
        )
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_anomaly())
    }

    pub fn findings_from(&self, stage: Stage) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.stage == stage)
    }
}
