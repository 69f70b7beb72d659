//! CSV output for the report tables
//!
//! One document per table, floats printed at the render precision. These are
//! the files the external report renderer reads. Quoting is left to
//! `csv::Writer`.

use crate::accuracy::{ConditionAccuracy, ParticipantAccuracy};
use crate::analysis::AnalysisReport;
use crate::config::RenderConfig;
use crate::rt_summary::RtCell;
use crate::slope::{GroupSlope, SlopeOutcome};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// File names written by [`CsvTables::write_to_dir`]
pub const ACCURACY_FILE: &str = "accuracy.csv";
pub const ACCURACY_BY_CONDITION_FILE: &str = "accuracy_by_condition.csv";
pub const SLOPES_FILE: &str = "slopes.csv";
pub const RT_SUMMARY_FILE: &str = "rt_summary.csv";

/// CSV formatter for an analysis report
#[derive(Debug)]
pub struct CsvTables<'a> {
    report: &'a AnalysisReport,
    precision: usize,
}

impl<'a> CsvTables<'a> {
    /// Create a formatter using the renderer's display precision
    pub fn new(report: &'a AnalysisReport, render: &RenderConfig) -> Self {
        Self {
            report,
            precision: render.precision,
        }
    }

    fn float(&self, value: f64) -> String {
        format!("{:.*}", self.precision, value)
    }

    fn document(header: &[&str], rows: impl Iterator<Item = Vec<String>>) -> Result<String> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(header).context("Failed to write CSV header")?;
        for fields in rows {
            writer.write_record(&fields).context("Failed to write CSV row")?;
        }

        let bytes = writer.into_inner().context("Failed to flush CSV table")?;
        String::from_utf8(bytes).context("CSV table is not valid UTF-8")
    }

    fn accuracy_row(&self, row: &ParticipantAccuracy) -> Vec<String> {
        vec![
            row.participant.to_string(),
            row.trials.to_string(),
            self.float(row.accuracy),
        ]
    }

    fn condition_row(&self, row: &ConditionAccuracy) -> Vec<String> {
        vec![
            row.participant.to_string(),
            row.set_size.to_string(),
            row.conjunction.to_string(),
            row.outcome.to_string(),
            self.float(row.fraction),
        ]
    }

    fn slope_row(&self, row: &GroupSlope) -> Vec<String> {
        let mut fields = vec![
            row.group.participant.to_string(),
            row.group.conjunction.to_string(),
            row.group.present.to_string(),
        ];

        match &row.outcome {
            SlopeOutcome::Fitted(e) => fields.extend([
                "fitted".to_string(),
                e.n.to_string(),
                self.float(e.slope),
                self.float(e.ci_lower),
                self.float(e.ci_upper),
                self.float(e.r_squared),
            ]),
            SlopeOutcome::InsufficientData { n, .. } => fields.extend([
                "insufficient_data".to_string(),
                n.to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ]),
        }

        fields
    }

    fn rt_row(&self, row: &RtCell) -> Vec<String> {
        vec![
            row.participant.to_string(),
            row.conjunction.to_string(),
            row.present.to_string(),
            row.set_size.to_string(),
            row.n.to_string(),
            self.float(row.mean_rt as f64),
            self.float(row.median_rt as f64),
        ]
    }

    /// Per-participant accuracy table
    pub fn accuracy_csv(&self) -> Result<String> {
        Self::document(
            &["participant", "trials", "accuracy"],
            self.report.accuracy.iter().map(|r| self.accuracy_row(r)),
        )
    }

    /// Long-form accuracy by (participant, set size, search type)
    pub fn accuracy_by_condition_csv(&self) -> Result<String> {
        Self::document(
            &["participant", "set_size", "conjunction", "outcome", "fraction"],
            self.report
                .accuracy_by_condition
                .iter()
                .map(|r| self.condition_row(r)),
        )
    }

    /// Slope table; insufficient groups keep their row with empty numbers
    pub fn slopes_csv(&self) -> Result<String> {
        Self::document(
            &[
                "participant",
                "conjunction",
                "present",
                "status",
                "n",
                "slope",
                "ci_lower",
                "ci_upper",
                "r_squared",
            ],
            self.report.slopes.iter().map(|r| self.slope_row(r)),
        )
    }

    /// Reaction time per set-size cell
    pub fn rt_summary_csv(&self) -> Result<String> {
        Self::document(
            &[
                "participant",
                "conjunction",
                "present",
                "set_size",
                "n",
                "mean_rt",
                "median_rt",
            ],
            self.report.rt_summary.iter().map(|r| self.rt_row(r)),
        )
    }

    /// Write all four tables into `dir`, creating it if needed
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let tables = [
            (ACCURACY_FILE, self.accuracy_csv()?),
            (ACCURACY_BY_CONDITION_FILE, self.accuracy_by_condition_csv()?),
            (SLOPES_FILE, self.slopes_csv()?),
            (RT_SUMMARY_FILE, self.rt_summary_csv()?),
        ];

        let mut written = Vec::with_capacity(tables.len());
        for (name, content) in tables {
            let path = dir.join(name);
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}
