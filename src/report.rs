//! Report rendering and the file-backed [`ReportSink`].
//!
//! Single files produce `<file>.report.<ext>`; batches produce
//! `<dir>/directory_report.<ext>`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::external::ReportSink;
use crate::pipeline::BatchItem;
use crate::result::{AnalysisResult, FindingKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

fn verdict_text(suspicious: bool) -> &'static str {
    if suspicious {
        "Threats detected"
    } else {
        "No threats detected"
    }
}

fn marker(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::Info => "-",
        FindingKind::Anomaly => "[!]",
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text_body(out: &mut String, path: &Path, result: &AnalysisResult) {
    let _ = writeln!(out, "File: {}", path.display());
    let _ = writeln!(out, "Format: {}", result.format);
    if let Some(size) = result.size_bytes {
        let _ = writeln!(out, "Size: {} bytes", size);
    }
    for f in &result.findings {
        let _ = writeln!(out, "  {} [{}] {}", marker(f.kind), f.stage.label(), f.message);
    }
    let _ = writeln!(out, "Result: {}", verdict_text(result.suspicious));
}

fn html_body(out: &mut String, path: &Path, result: &AnalysisResult) {
    let _ = writeln!(out, "<h2>{}</h2>", html_escape(&path.display().to_string()));
    let _ = writeln!(out, "<p>Format: {}</p>", result.format);
    let _ = writeln!(out, "<ul>");
    for f in &result.findings {
        let class = match f.kind {
            FindingKind::Info => "info",
            FindingKind::Anomaly => "anomaly",
        };
        let _ = writeln!(
            out,
            "<li class=\"{}\">[{}] {}</li>",
            class,
            f.stage.label(),
            html_escape(&f.message)
        );
    }
    let _ = writeln!(out, "</ul>");
    let colour = if result.suspicious { "red" } else { "green" };
    let _ = writeln!(
        out,
        "<p>Result: <span style=\"color:{};\">{}</span></p>",
        colour,
        verdict_text(result.suspicious)
    );
}

const HTML_HEAD: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n\
<style>.anomaly{color:red}</style>\n";

/// Render one file's report.
pub fn render_single(
    format: ReportFormat,
    pretty: bool,
    path: &Path,
    result: &AnalysisResult,
) -> std::result::Result<String, serde_json::Error> {
    let mut out = String::new();
    match format {
        ReportFormat::Text => text_body(&mut out, path, result),
        ReportFormat::Html => {
            out.push_str(HTML_HEAD);
            let _ = writeln!(
                out,
                "<title>Report: {}</title>\n</head>\n<body>",
                html_escape(&path.display().to_string())
            );
            html_body(&mut out, path, result);
            out.push_str("</body>\n</html>\n");
        }
        ReportFormat::Json => {
            let item = BatchItem {
                path: path.to_path_buf(),
                result: result.clone(),
            };
            out = to_json(&item, pretty)?;
        }
    }
    Ok(out)
}

/// Render a directory report.
pub fn render_batch(
    format: ReportFormat,
    pretty: bool,
    dir: &Path,
    items: &[BatchItem],
) -> std::result::Result<String, serde_json::Error> {
    let mut out = String::new();
    let suspicious = items.iter().filter(|i| i.result.suspicious).count();
    match format {
        ReportFormat::Text => {
            let _ = writeln!(out, "Directory: {}", dir.display());
            let _ = writeln!(out, "Files: {}, suspicious: {}\n", items.len(), suspicious);
            for item in items {
                text_body(&mut out, &item.path, &item.result);
                out.push('\n');
            }
        }
        ReportFormat::Html => {
            out.push_str(HTML_HEAD);
            let dir_shown = html_escape(&dir.display().to_string());
            let _ = writeln!(out, "<title>Report: {}</title>\n</head>\n<body>", dir_shown);
            let _ = writeln!(out, "<h1>Directory: {}</h1>", dir_shown);
            let _ = writeln!(out, "<p>Files: {}, suspicious: {}</p>", items.len(), suspicious);
            for item in items {
                html_body(&mut out, &item.path, &item.result);
            }
            out.push_str("</body>\n</html>\n");
        }
        ReportFormat::Json => out = to_json(&items, pretty)?,
    }
    Ok(out)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> std::result::Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Writes reports next to the analyzed file or inside the analyzed directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReportSink {
    pub format: ReportFormat,
    pub pretty: bool,
}

impl FileReportSink {
    pub fn new(format: ReportFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }

    pub fn single_report_path(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(format!(".report.{}", self.format.extension()));
        PathBuf::from(name)
    }

    pub fn batch_report_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("directory_report.{}", self.format.extension()))
    }

    fn write(&self, target: PathBuf, body: std::result::Result<String, serde_json::Error>) -> Result<PathBuf> {
        let body = body.map_err(|e| Error::Report {
            path: target.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        fs::write(&target, body).map_err(|source| Error::Report {
            path: target.clone(),
            source,
        })?;
        info!(path = %target.display(), "Report written");
        Ok(target)
    }
}

impl ReportSink for FileReportSink {
    fn write_single(&self, path: &Path, result: &AnalysisResult) -> Result<PathBuf> {
        let body = render_single(self.format, self.pretty, path, result);
        self.write(self.single_report_path(path), body)
    }

    fn write_batch(&self, dir: &Path, items: &[BatchItem]) -> Result<PathBuf> {
        let body = render_batch(self.format, self.pretty, dir, items);
        self.write(self.batch_report_path(dir), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Finding, Stage};
    use crate::FormatTag;

    #[test]
    fn html_escapes_names() {
        let r = AnalysisResult::new(
            FormatTag::Png,
            vec![Finding::anomaly(Stage::Extension, "Double extension: .<b>.exe")],
            Some(3),
        );
        let html = render_single(ReportFormat::Html, false, Path::new("a<b>.png"), &r).unwrap();
        assert!(html.contains("a&lt;b&gt;.png"));
        assert!(html.contains(".&lt;b&gt;.exe"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn report_paths() {
        let sink = FileReportSink::new(ReportFormat::Text, false);
        assert_eq!(
            sink.single_report_path(Path::new("/x/a.jpg")),
            PathBuf::from("/x/a.jpg.report.txt")
        );
        assert_eq!(
            sink.batch_report_path(Path::new("/x")),
            PathBuf::from("/x/directory_report.txt")
        );
    }
}
