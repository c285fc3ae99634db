//! Decoder configuration types
//!
//! The configuration is an explicit value handed to the [`Decoder`](crate::Decoder)
//! and threaded into the walker and the trace log extractor. Nothing in the
//! library reads global state to decide how chatty to be or what to skip.

use crate::types::AuxOperation;
use serde::{Deserialize, Serialize};

/// Configuration for the decoder library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecoderConfig {
    /// Log every matched descriptor window at debug level
    #[serde(default)]
    pub debug_windows: bool,

    /// Warn about overlapping catalog entries when a registry is built
    #[serde(default = "default_true")]
    pub report_overlaps: bool,

    /// Stop reading a trace log at the first blank line
    #[serde(default = "default_true")]
    pub stop_at_blank_line: bool,

    /// Optional: only decode transactions on these ports
    #[serde(default)]
    pub port_filter: Option<Vec<String>>,

    /// Optional: only decode transactions of this direction
    #[serde(default)]
    pub operation_filter: Option<AuxOperation>,
}

fn default_true() -> bool {
    true
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            debug_windows: false,
            report_overlaps: true,
            stop_at_blank_line: true,
            port_filter: None,
            operation_filter: None,
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: log raw descriptor windows
    pub fn with_debug_windows(mut self, enabled: bool) -> Self {
        self.debug_windows = enabled;
        self
    }

    /// Builder method: enable or disable overlap warnings
    pub fn with_overlap_reporting(mut self, enabled: bool) -> Self {
        self.report_overlaps = enabled;
        self
    }

    /// Builder method: keep reading past blank lines
    pub fn with_stop_at_blank_line(mut self, enabled: bool) -> Self {
        self.stop_at_blank_line = enabled;
        self
    }

    /// Builder method: set port filter
    pub fn with_port_filter(mut self, ports: Vec<String>) -> Self {
        self.port_filter = Some(ports);
        self
    }

    /// Builder method: set operation filter
    pub fn with_operation_filter(mut self, operation: AuxOperation) -> Self {
        self.operation_filter = Some(operation);
        self
    }

    /// Check if a port should be processed
    pub fn should_process_port(&self, port: &str) -> bool {
        match &self.port_filter {
            Some(ports) => ports.iter().any(|p| p == port),
            None => true,
        }
    }

    /// Check if an operation should be processed
    pub fn should_process_operation(&self, operation: AuxOperation) -> bool {
        match self.operation_filter {
            Some(op) => op == operation,
            None => true,
        }
    }

    /// Check if a transaction should be processed based on filters
    pub fn should_process_transaction(&self, port: &str, operation: AuxOperation) -> bool {
        self.should_process_port(port) && self.should_process_operation(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_config_builder() {
        let config = DecoderConfig::new()
            .with_debug_windows(true)
            .with_overlap_reporting(false)
            .with_port_filter(vec!["eDP-1".into()])
            .with_operation_filter(AuxOperation::Write);

        assert!(config.debug_windows);
        assert!(!config.report_overlaps);
        assert!(config.stop_at_blank_line);
        assert_eq!(config.port_filter, Some(vec!["eDP-1".to_string()]));
        assert_eq!(config.operation_filter, Some(AuxOperation::Write));
    }

    #[test]
    fn test_filter_logic() {
        let config = DecoderConfig::new()
            .with_port_filter(vec!["eDP-1".into(), "DP-2".into()])
            .with_operation_filter(AuxOperation::Read);

        assert!(config.should_process_transaction("eDP-1", AuxOperation::Read));
        assert!(config.should_process_transaction("DP-2", AuxOperation::Read));
        assert!(!config.should_process_transaction("DP-3", AuxOperation::Read)); // Wrong port
        assert!(!config.should_process_transaction("eDP-1", AuxOperation::Write)); // Wrong direction
    }

    #[test]
    fn test_no_filters() {
        let config = DecoderConfig::new();

        assert!(config.should_process_transaction("anything", AuxOperation::Read));
        assert!(config.should_process_transaction("", AuxOperation::Write));
    }

    #[test]
    fn test_defaults_from_empty_document() {
        let config: DecoderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DecoderConfig::default());
    }
}
