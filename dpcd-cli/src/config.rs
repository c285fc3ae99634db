//! Configuration loading and parsing

use anyhow::{Context, Result};
use dpcd_decoder::DecoderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Column layout, one line per field
    #[default]
    Text,
    /// JSON documents; one line per transaction in log mode
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if let Some(ports) = &config.decoder.port_filter {
        if ports.is_empty() {
            log::warn!("{:?}: empty port_filter, every transaction will be skipped", path);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpcd_decoder::AuxOperation;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [decoder]
            debug_windows = true
            stop_at_blank_line = false
            port_filter = ["eDP-1", "DP-2"]
            operation_filter = "write"

            [output]
            format = "json"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert!(config.decoder.debug_windows);
        assert!(!config.decoder.stop_at_blank_line);
        assert!(config.decoder.report_overlaps);
        assert_eq!(config.decoder.port_filter.as_ref().unwrap().len(), 2);
        assert_eq!(config.decoder.operation_filter, Some(AuxOperation::Write));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.decoder.stop_at_blank_line);
        assert!(config.decoder.port_filter.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"text\"\n\n[decoder]\nreport_overlaps = false").unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(!config.decoder.report_overlaps);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_config_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = load_config(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.toml"));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[output]\nformat = \"html\"\n").unwrap();
        let err = load_config(&bad).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
