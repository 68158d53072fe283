//! Configuration for the core crate
//!
//! This module provides configuration options for the ingestion pipeline,
//! including the row-shape reconciliation policies and display settings.

use serde::{Serialize, Deserialize};

use crate::error::to_config_error;

/// What to do with a row that has fewer cells than the table has columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortRowPolicy {
    /// Fill missing trailing cells with `Null`
    #[default]
    PadWithNull,

    /// Drop the row
    Reject,
}

/// What to do with a row that has more cells than the table has columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongRowPolicy {
    /// Drop the extra trailing cells
    #[default]
    Truncate,

    /// Drop the row
    Reject,
}

/// Row normalization configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Handling of rows shorter than the declared columns
    #[serde(default)]
    pub short_rows: ShortRowPolicy,

    /// Handling of rows longer than the declared columns
    #[serde(default)]
    pub long_rows: LongRowPolicy,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rows shown in table previews
    pub preview_rows: usize,

    /// Characters shown in description previews
    pub description_preview_chars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            preview_rows: 5,
            description_preview_chars: 100,
        }
    }
}

/// Core configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Row normalization configuration
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to enable debug mode
    #[serde(default)]
    pub debug_mode: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            normalizer: NormalizerConfig::default(),
            display: DisplayConfig::default(),
            log_level: default_log_level(),
            debug_mode: false,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: EngineConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the log level names a known level
    pub fn validate(&self) -> crate::Result<()> {
        match self.log_level.to_ascii_lowercase().as_str() {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            other => Err(to_config_error(format!("unknown log level '{}'", other))),
        }
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &str) -> crate::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Create a development configuration
    pub fn development() -> Self {
        let mut config = Self::default();
        config.debug_mode = true;
        config.log_level = "debug".to_string();
        config
    }

    /// Create a strict configuration that drops every misshapen row
    pub fn strict() -> Self {
        let mut config = Self::default();
        config.normalizer.short_rows = ShortRowPolicy::Reject;
        config.normalizer.long_rows = LongRowPolicy::Reject;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.normalizer.short_rows, ShortRowPolicy::PadWithNull);
        assert_eq!(config.normalizer.long_rows, LongRowPolicy::Truncate);
        assert_eq!(config.display.preview_rows, 5);
        assert_eq!(config.display.description_preview_chars, 100);
        assert_eq!(config.log_level, "info");
        assert!(!config.debug_mode);
    }

    #[test]
    fn test_presets() {
        let dev = EngineConfig::development();
        assert!(dev.debug_mode);
        assert_eq!(dev.log_level, "debug");

        let strict = EngineConfig::strict();
        assert_eq!(strict.normalizer.short_rows, ShortRowPolicy::Reject);
        assert_eq!(strict.normalizer.long_rows, LongRowPolicy::Reject);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"normalizer": {"short_rows": "reject"}}"#).unwrap();
        assert_eq!(config.normalizer.short_rows, ShortRowPolicy::Reject);
        assert_eq!(config.normalizer.long_rows, LongRowPolicy::Truncate);
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_file_io() {
        let config = EngineConfig::strict();

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        config.to_file(path).unwrap();
        let loaded = EngineConfig::from_file(path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_log_level() {
        assert!(EngineConfig::development().validate().is_ok());

        let mut config = EngineConfig::default();
        config.log_level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/engine.json").unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
