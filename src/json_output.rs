//! JSON output format for analysis reports

use crate::analysis::AnalysisReport;
use anyhow::{Context, Result};

/// Serialize the full report as pretty-printed JSON
pub fn to_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize analysis report")
}
