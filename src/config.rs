//! Analysis configuration
//!
//! Loaded from an optional `vsearch.toml` and overridden by CLI flags.
//!
//! # Example vsearch.toml
//!
//! ```toml
//! data_dir = "data"
//! extension = "csv"
//! confidence_level = 0.95
//!
//! [columns]
//! response_marker = "visual-search-response"
//! set_size_legacy = "setsize"
//!
//! [render]
//! precision = 3
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Invalid configuration values
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Confidence level must be strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    #[error("Column name for {0} must not be empty")]
    EmptyColumn(&'static str),

    #[error("Input file extension must not be empty")]
    EmptyExtension,
}

/// Source column names in the per-participant trial logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Column classifying each row (instructions, fixation, response, ...)
    pub trial_type: String,
    /// Value of `trial_type` marking a keyboard response during the search display
    pub response_marker: String,
    pub present: String,
    pub set_size: String,
    /// Older logs name the set size column differently
    pub set_size_legacy: String,
    pub conjunction: String,
    pub correct: String,
    pub rt: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            trial_type: "trial_type".to_string(),
            response_marker: "visual-search-response".to_string(),
            present: "present".to_string(),
            set_size: "set_size".to_string(),
            set_size_legacy: "setsize".to_string(),
            conjunction: "conjunction".to_string(),
            correct: "correct".to_string(),
            rt: "rt".to_string(),
        }
    }
}

impl ColumnMap {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        let fields = [
            ("trial_type", &self.trial_type),
            ("response_marker", &self.response_marker),
            ("present", &self.present),
            ("set_size", &self.set_size),
            ("conjunction", &self.conjunction),
            ("correct", &self.correct),
            ("rt", &self.rt),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyColumn(name));
            }
        }
        Ok(())
    }
}

/// Presentation settings handed to the output writers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Decimal places for floating point table cells
    pub precision: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { precision: 3 }
    }
}

/// Full configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory scanned for per-participant files
    pub data_dir: PathBuf,

    /// File extension of participant files (without the dot)
    pub extension: String,

    pub columns: ColumnMap,

    /// Decimal places per-participant accuracy is rounded to
    pub accuracy_decimals: u32,

    /// Two-sided confidence level for slope intervals
    ///
    /// 0.95 uses the 0.025/0.975 quantiles of Student's t with n-2 df.
    pub confidence_level: f64,

    pub render: RenderConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            extension: "csv".to_string(),
            columns: ColumnMap::default(),
            accuracy_decimals: 3,
            confidence_level: 0.95,
            render: RenderConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load configuration from a TOML string
    ///
    /// Missing keys fall back to [`AnalysisConfig::default`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ConfigError::InvalidConfidence(self.confidence_level));
        }
        if self.extension.trim().is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        self.columns.validate()
    }
}
