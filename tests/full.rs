//! Full analysis with stubbed collaborators.

use std::fs;
use std::path::Path;

use decoy::external::{DocumentAnalyzer, MetadataTool, SignatureEngine};
use decoy::{AnalysisOptions, Error, FullAnalyzer, Scope, Stage};

struct Rules;

impl SignatureEngine for Rules {
    fn scan(&self, path: &Path) -> decoy::Result<Option<String>> {
        match path.file_name().and_then(|n| n.to_str()) {
            Some("broken.bin") => Err(Error::SignatureEngine("rule database unreadable".into())),
            Some(name) if name.starts_with("evil") => Ok(Some("Embedded_Zip".into())),
            _ => Ok(None),
        }
    }
}

struct Exif;

impl MetadataTool for Exif {
    fn extract(&self, path: &Path) -> Vec<String> {
        if path.extension().is_some_and(|e| e == "txt") {
            Vec::new()
        } else {
            vec!["File Type : JPEG".into(), "Image Size : 1x1".into()]
        }
    }
}

struct PdfObjects;

impl DocumentAnalyzer for PdfObjects {
    fn analyze(&self, _path: &Path) -> Vec<String> {
        vec!["/JavaScript: 1".into()]
    }
}

fn analyzer() -> FullAnalyzer {
    let options = AnalysisOptions {
        lsb: false,
        ..AnalysisOptions::default()
    };
    FullAnalyzer::new(options)
        .with_signatures(Rules)
        .with_metadata(Exif)
        .with_documents(PdfObjects)
}

#[test]
fn collaborator_findings_come_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evil.jpg");
    fs::write(&path, [0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xD9, 0, 0]).unwrap();

    let r = analyzer().analyze_file(&path).unwrap();
    let stages: Vec<_> = r.findings.iter().map(|f| f.stage).collect();
    assert_eq!(stages[0], Stage::Signature);
    assert_eq!(&stages[1..3], &[Stage::Metadata, Stage::Metadata]);
    assert_eq!(stages[3], Stage::Structure);
    assert!(!stages.contains(&Stage::Document));
    assert!(r.findings[0].is_anomaly());
    assert_eq!(r.findings[0].message, "Signature scan: matched rule Embedded_Zip");
    assert!(r.suspicious);
}

#[test]
fn document_analyzer_only_for_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.pdf");
    fs::write(&path, b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n").unwrap();

    let r = analyzer().analyze_file(&path).unwrap();
    let docs: Vec<_> = r.findings_from(Stage::Document).collect();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].message, "/JavaScript: 1");
    assert!(!docs[0].is_anomaly());
    assert!(!r.suspicious, "{:?}", r.findings);
}

#[test]
fn empty_metadata_is_noted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, b"plain text file body").unwrap();

    let r = analyzer().analyze_file(&path).unwrap();
    let meta: Vec<_> = r.findings_from(Stage::Metadata).collect();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta[0].message, "Metadata: no output");
}

#[test]
fn engine_failure_aborts_only_that_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"first file in batch").unwrap();
    fs::write(dir.path().join("broken.bin"), b"second file in batch").unwrap();
    fs::write(dir.path().join("c.txt"), b"third file in batch").unwrap();

    let a = analyzer();
    assert!(matches!(
        a.analyze_file(&dir.path().join("broken.bin")),
        Err(Error::SignatureEngine(_))
    ));

    let items = a.analyze_directory(dir.path()).unwrap();
    assert_eq!(items.len(), 3);
    let failed = &items[1].result;
    assert_eq!(failed.findings.len(), 1);
    assert!(failed.findings[0].message.starts_with("Analysis failed:"));
    assert_eq!(items[2].result.findings[0].message, "Signature scan: no rule matched");
}

#[test]
fn without_collaborators_matches_core() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.gif");
    fs::write(&path, b"GIF89a\x01\0\x01\0\0\0\0;").unwrap();

    let full = FullAnalyzer::default().analyze_file(&path).unwrap();
    let core = decoy::analyze_file(&path);
    assert_eq!(full.findings, core.findings);
    assert_eq!(full.suspicious, core.suspicious);
}

#[test]
fn unreadable_file_is_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let r = analyzer().analyze_file(&dir.path().join("gone.jpg")).unwrap();
    assert_eq!(r.findings.len(), 1);
    assert_eq!(r.findings[0].stage, Stage::Io);
}

#[test]
fn visitor_sees_analyzed_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.gif");
    let body = b"GIF89a\x01\0\x01\0\0\0\0;";
    fs::write(&path, body).unwrap();

    let mut seen = None;
    let r = analyzer()
        .visit_file(&path, |data| seen = data.map(<[u8]>::to_vec))
        .unwrap();
    assert_eq!(seen.as_deref(), Some(&body[..]));
    assert_eq!(r.size_bytes, Some(body.len()));

    let mut visits = 0;
    let r = analyzer()
        .visit_file(&dir.path().join("gone.gif"), |data| {
            visits += 1;
            assert!(data.is_none());
        })
        .unwrap();
    assert_eq!(visits, 1);
    assert_eq!(r.size_bytes, None);
}

#[test]
fn directory_visitor_runs_once_per_item_in_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"first").unwrap();
    fs::write(dir.path().join("broken.bin"), b"second file").unwrap();
    fs::write(dir.path().join("c.txt"), b"third file body").unwrap();

    let mut visited = Vec::new();
    let items = analyzer()
        .visit_directory(dir.path(), |item, data| {
            visited.push((item.path.clone(), data.map(<[u8]>::len)));
        })
        .unwrap();

    assert_eq!(visited.len(), items.len());
    for (item, (path, len)) in items.iter().zip(&visited) {
        assert_eq!(&item.path, path);
        if item.result.size_bytes.is_some() {
            assert_eq!(item.result.size_bytes, *len);
        }
    }
    // the engine failure still had its bytes read
    assert_eq!(visited[1].1, Some(11));
    assert_eq!(visited[2].1, Some(15));
}

#[test]
fn metadata_scope_reports_metadata_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cat.png");
    fs::write(&path, [0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xD9, b'P', b'K']).unwrap();

    let scope = Scope::Metadata;
    let r = FullAnalyzer::new(scope.apply(AnalysisOptions::default()))
        .with_metadata(Exif)
        .analyze_file(&path)
        .unwrap();
    assert!(r.findings.iter().all(|f| f.stage == Stage::Metadata), "{:?}", r.findings);
    assert_eq!(r.findings.len(), 2);
    assert!(!r.suspicious);
}
