//! CLI argument parsing for vsearch

use crate::config::AnalysisConfig;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary (default)
    Text,
    /// JSON document with every table
    Json,
    /// One CSV file per table (requires --output-dir)
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "vsearch")]
#[command(version)]
#[command(
    about = "Accuracy and search-slope analysis for visual-search experiment logs",
    long_about = None
)]
pub struct Cli {
    /// Directory holding one trial log per participant
    #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Extension of participant files (without the dot)
    #[arg(long = "extension", value_name = "EXT")]
    pub extension: Option<String>,

    /// TOML configuration file (flags override its values)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Directory for CSV tables
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Decimal places for floating point output
    #[arg(long = "precision", value_name = "N")]
    pub precision: Option<usize>,

    /// Confidence level for slope intervals (e.g. 0.95)
    #[arg(long = "confidence", value_name = "LEVEL")]
    pub confidence: Option<f64>,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Build the run configuration: file values first, then flag overrides
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(precision) = self.precision {
            config.render.precision = precision;
        }
        if let Some(confidence) = self.confidence {
            config.confidence_level = confidence;
        }

        config.validate()?;
        Ok(config)
    }
}
