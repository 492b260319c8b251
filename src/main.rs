//! CLI for decoy: triage a file or a directory of media files for forged types,
//! malformed containers and LSB payload signals.

#![cfg(feature = "cli")]

use anyhow::{bail, Context};
use clap::Parser;
use decoy::config::Config;
use decoy::external::{ExifTool, ReportSink};
use decoy::report::{FileReportSink, ReportFormat};
use decoy::{AnalysisResult, BatchItem, FindingKind, FullAnalyzer, Scope};
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[derive(Parser)]
#[command(name = "decoy")]
#[command(about = "Detect disguised media files: type/extension mismatch, malformed containers, LSB payloads", long_about = None)]
struct Args {
    /// Path to a file or directory to analyze
    path: Option<PathBuf>,

    /// Analyze every regular file directly inside a directory (no recursion)
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Output JSON per result (one line per file unless --pretty)
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON (use with --json)
    #[arg(long)]
    pretty: bool,

    /// Quiet: only print suspicious paths
    #[arg(short, long)]
    quiet: bool,

    /// Run the external metadata tool (exiftool) on each file
    #[arg(long)]
    metadata: bool,

    /// Restrict the run to one family of checks
    #[arg(long, value_enum, value_name = "SCOPE", default_value_t = Scope::All)]
    stage: Scope,

    /// Write a report file next to the input (or into the directory);
    /// without a value the format comes from the config file
    #[arg(long, value_name = "FORMAT", num_args = 0..=1)]
    report: Option<Option<ReportFormat>>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    init_logging(&config.logging.level);

    let path = args
        .directory
        .as_ref()
        .or(args.path.as_ref())
        .context("Missing path: give a file/directory as argument or use -d/--directory <DIR>")?;

    if !path.exists() {
        bail!("Not found: {}", path.display());
    }

    let mut analyzer = FullAnalyzer::new(args.stage.apply(config.analysis_options()));
    let metadata = args.stage.requires_metadata()
        || (args.stage == Scope::All && (args.metadata || config.metadata.enabled));
    if metadata {
        analyzer = analyzer.with_metadata(ExifTool::new(config.metadata.command.clone()));
    }
    let sink = args
        .report
        .map(|format| FileReportSink::new(format.unwrap_or(config.report.format), config.report.pretty));

    if path.is_file() {
        if args.directory.is_some() {
            bail!("--directory expects a directory, not a file: {}", path.display());
        }
        let mut sha256 = None;
        let result = analyzer.visit_file(path, |data| sha256 = data.map(sha256_hex))?;
        print_result(path, &result, sha256.as_deref(), &args)?;
        if let Some(sink) = &sink {
            let written = sink.write_single(path, &result)?;
            if !args.quiet {
                eprintln!("Report: {}", written.display());
            }
        }
        return Ok(());
    }

    if path.is_dir() {
        if !args.quiet {
            eprintln!("Analyzing directory: {}", path.display());
        }
        let mut printed = Ok(());
        let items = analyzer.visit_directory(path, |item, data| {
            if printed.is_ok() {
                let sha256 = data.map(sha256_hex);
                printed = print_result(&item.path, &item.result, sha256.as_deref(), &args);
            }
        })?;
        printed?;
        if !args.quiet {
            print_summary(&items);
        }
        if let Some(sink) = &sink {
            let written = sink.write_batch(path, &items)?;
            if !args.quiet {
                eprintln!("Report: {}", written.display());
            }
        }
        return Ok(());
    }

    bail!("Not a file or directory: {}", path.display());
}

fn print_summary(items: &[BatchItem]) {
    let suspicious = items.iter().filter(|i| i.result.suspicious).count();
    eprintln!("Analyzed {} files, {} suspicious", items.len(), suspicious);
}

/// `sha256` is the digest of the analyzed bytes; unreadable files have none.
fn print_result(
    path: &Path,
    result: &AnalysisResult,
    sha256: Option<&str>,
    args: &Args,
) -> anyhow::Result<()> {
    if args.quiet && !result.suspicious {
        return Ok(());
    }

    if args.json {
        let mut out = IndexMap::<String, serde_json::Value>::new();
        out.insert("sha256".to_string(), serde_json::to_value(sha256)?);
        out.insert(
            "path".to_string(),
            serde_json::Value::String(path.display().to_string()),
        );
        out.insert("suspicious".to_string(), serde_json::Value::Bool(result.suspicious));
        out.insert("format".to_string(), serde_json::to_value(result.format)?);
        out.insert("size_bytes".to_string(), serde_json::to_value(result.size_bytes)?);
        out.insert("findings".to_string(), serde_json::to_value(&result.findings)?);
        let json_str = if args.pretty {
            serde_json::to_string_pretty(&out)?
        } else {
            serde_json::to_string(&out)?
        };
        println!("{}", json_str);
        return Ok(());
    }

    if let Some(sha256) = sha256 {
        println!("  sha256: {}", sha256);
    }
    let size_str = result
        .size_bytes
        .map(|n| format!(" ({} bytes)", n))
        .unwrap_or_default();
    if result.suspicious {
        println!("SUSPICIOUS {}{}", path.display(), size_str);
        for f in result.anomalies() {
            println!("  [!] [{}] {}", f.stage.label(), f.message);
        }
    } else {
        println!("OK {}{}", path.display(), size_str);
    }
    if !args.quiet {
        println!("  format: {}", result.format);
        for f in result.findings.iter().filter(|f| f.kind == FindingKind::Info) {
            println!("  - [{}] {}", f.stage.label(), f.message);
        }
    }
    Ok(())
}
