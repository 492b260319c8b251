//! Report rendering and file output.

#![cfg(feature = "serde")]

use std::fs;
use std::path::Path;

use decoy::external::ReportSink;
use decoy::report::{render_batch, render_single, FileReportSink, ReportFormat};
use decoy::{analyze, analyze_directory, BatchItem};

fn suspicious_png() -> Vec<u8> {
    let mut v = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    v.extend_from_slice(&[0, 0, 0, 0]);
    v.extend_from_slice(b"IEND");
    v.extend_from_slice(&[0, 0, 0, 0]);
    v.extend_from_slice(b"<script>");
    v
}

#[test]
fn text_report_lists_findings_and_verdict() {
    let r = analyze(Path::new("a.png"), &suspicious_png());
    let text = render_single(ReportFormat::Text, false, Path::new("a.png"), &r).unwrap();
    assert!(text.starts_with("File: a.png\nFormat: PNG\n"));
    assert!(text.contains("[!] [structure] PNG: 8 bytes trailing after IEND"));
    assert!(text.trim_end().ends_with("Result: Threats detected"));
}

#[test]
fn json_report_is_structured() {
    let r = analyze(Path::new("a.png"), &suspicious_png());
    let json = render_single(ReportFormat::Json, false, Path::new("a.png"), &r).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["path"], "a.png");
    assert_eq!(v["result"]["format"], "PNG");
    assert_eq!(v["result"]["suspicious"], true);
    assert_eq!(v["result"]["findings"][0]["stage"], "structure");
    assert_eq!(v["result"]["findings"][0]["kind"], "anomaly");
}

#[test]
fn html_batch_escapes_content() {
    let items = vec![BatchItem {
        path: "x&y.png".into(),
        result: analyze(Path::new("x&y.png"), &suspicious_png()),
    }];
    let html = render_batch(ReportFormat::Html, false, Path::new("dir"), &items).unwrap();
    assert!(html.contains("<h2>x&amp;y.png</h2>"));
    assert!(html.contains("Files: 1, suspicious: 1"));
    assert!(html.ends_with("</html>\n"));
}

#[test]
fn sink_writes_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.png");
    fs::write(&path, suspicious_png()).unwrap();
    let r = analyze(&path, &suspicious_png());

    let sink = FileReportSink::new(ReportFormat::Json, true);
    let written = sink.write_single(&path, &r).unwrap();
    assert_eq!(written, dir.path().join("a.png.report.json"));
    let body = fs::read_to_string(&written).unwrap();
    assert!(body.contains("\n  \"path\""));
}

#[test]
fn sink_writes_directory_report() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.png"), suspicious_png()).unwrap();
    fs::write(dir.path().join("b.txt"), b"nothing to see here").unwrap();
    let items = analyze_directory(dir.path()).unwrap();

    let sink = FileReportSink::new(ReportFormat::Text, false);
    let written = sink.write_batch(dir.path(), &items).unwrap();
    assert_eq!(written, dir.path().join("directory_report.txt"));
    let body = fs::read_to_string(&written).unwrap();
    assert!(body.contains("Files: 2, suspicious: 1"));
}

#[test]
fn sink_failure_is_a_report_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir");
    let sink = FileReportSink::default();
    let err = sink.write_batch(&missing, &[]).unwrap_err();
    assert!(matches!(err, decoy::Error::Report { .. }));
}
