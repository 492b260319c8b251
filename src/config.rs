//! TOML configuration.
//!
//! ```toml
//! [analysis]
//! lsb = true
//!
//! [metadata]
//! enabled = true
//! command = "exiftool"
//!
//! [report]
//! format = "html"
//!
//! [logging]
//! level = "info"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::external::EXIFTOOL_COMMAND;
use crate::pipeline::AnalysisOptions;
use crate::report::ReportFormat;

const MAX_CONFIG_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub metadata: MetadataConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub lsb: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { lsb: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    pub enabled: bool,
    pub command: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: EXIFTOOL_COMMAND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        if meta.len() > MAX_CONFIG_BYTES {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: format!("exceeds {} bytes", MAX_CONFIG_BYTES),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::parse(&text).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            lsb: self.analysis.lsb,
            ..AnalysisOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let c = Config::parse("").unwrap();
        assert!(c.analysis.lsb);
        assert!(!c.metadata.enabled);
        assert_eq!(c.metadata.command, "exiftool");
        assert_eq!(c.report.format, ReportFormat::Text);
        assert_eq!(c.logging.level, "warn");
    }

    #[test]
    fn overrides_apply() {
        let c = Config::parse(
            "[analysis]\nlsb = false\n[report]\nformat = \"json\"\npretty = true\n",
        )
        .unwrap();
        assert!(!c.analysis_options().lsb);
        assert_eq!(c.report.format, ReportFormat::Json);
        assert!(c.report.pretty);
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(Config::parse("[analysis]\nentropy = 1\n").is_err());
    }
}
