//! End-to-end analysis pipeline
//!
//! discover -> load -> assemble -> accuracy -> correct trials -> slopes -> RT
//! summary. Any loading error aborts the run; empty inputs produce empty
//! tables.

use crate::accuracy::{
    accuracy_by_condition, participant_accuracy, ConditionAccuracy, ParticipantAccuracy,
};
use crate::config::{AnalysisConfig, RenderConfig};
use crate::corpus::Corpus;
use crate::loader::{discover_files, load_participant_file};
use crate::rt_summary::{summarize_rt, RtCell};
use crate::slope::{estimate_slopes, GroupSlope, SlopeOutcome};
use crate::trial::search_type_label;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Dataset size counts reported alongside the tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisCounts {
    pub files: usize,
    pub participants: usize,
    pub trials: usize,
    pub correct_trials: usize,
    pub fitted_groups: usize,
    pub insufficient_groups: usize,
}

/// Every table the report renderer consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub counts: AnalysisCounts,
    pub confidence_level: f64,
    pub accuracy: Vec<ParticipantAccuracy>,
    pub accuracy_by_condition: Vec<ConditionAccuracy>,
    pub slopes: Vec<GroupSlope>,
    pub rt_summary: Vec<RtCell>,
}

/// Discover and load every participant file named by `config`
///
/// Returns the assembled corpus and the number of files read.
pub fn load_corpus(config: &AnalysisConfig) -> Result<(Corpus, usize)> {
    let files = discover_files(&config.data_dir, &config.extension)?;

    let mut loaded = Vec::with_capacity(files.len());
    for path in &files {
        let trials = load_participant_file(path, &config.columns)
            .with_context(|| format!("Failed to load participant file {}", path.display()))?;
        loaded.push(trials);
    }

    let corpus = Corpus::assemble(loaded);
    info!(
        "Assembled corpus: {} trials from {} participants ({} files)",
        corpus.len(),
        corpus.participants().len(),
        files.len()
    );
    Ok((corpus, files.len()))
}

/// Run the whole pipeline from the data directory
pub fn analyze(config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let (corpus, files) = load_corpus(config)?;
    let mut report = analyze_corpus(&corpus, config)?;
    report.counts.files = files;
    Ok(report)
}

/// Run the computational stages on an already assembled corpus
pub fn analyze_corpus(corpus: &Corpus, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let accuracy = participant_accuracy(corpus, config.accuracy_decimals);
    let by_condition = accuracy_by_condition(corpus);

    let correct = corpus.correct_trials();
    let slopes = estimate_slopes(&correct, config.confidence_level)
        .context("Failed to estimate search slopes")?;
    let rt_summary = summarize_rt(&correct).context("Failed to summarize reaction times")?;

    let fitted_groups = slopes.iter().filter(|s| s.outcome.is_fitted()).count();
    let counts = AnalysisCounts {
        files: 0,
        participants: accuracy.len(),
        trials: corpus.len(),
        correct_trials: correct.len(),
        fitted_groups,
        insufficient_groups: slopes.len() - fitted_groups,
    };
    info!(
        "Fitted {} of {} condition groups",
        counts.fitted_groups,
        slopes.len()
    );

    Ok(AnalysisReport {
        counts,
        confidence_level: config.confidence_level,
        accuracy,
        accuracy_by_condition: by_condition,
        slopes,
        rt_summary,
    })
}

impl AnalysisReport {
    /// Generate human-readable summary for the terminal
    pub fn to_report_string(&self, render: &RenderConfig) -> String {
        let p = render.precision;
        let mut report = String::new();

        report.push_str("=== Visual Search Analysis ===\n\n");
        report.push_str(&format!("Files loaded: {}\n", self.counts.files));
        report.push_str(&format!("Participants: {}\n", self.counts.participants));
        report.push_str(&format!(
            "Trials: {} ({} correct)\n",
            self.counts.trials, self.counts.correct_trials
        ));

        if self.accuracy.is_empty() {
            report.push_str("\nNo participant data found.\n");
            return report;
        }

        report.push_str("\nAccuracy by participant:\n");
        for row in &self.accuracy {
            report.push_str(&format!(
                "  {:>4}  {:.p$}  ({} trials)\n",
                row.participant, row.accuracy, row.trials
            ));
        }

        report.push_str(&format!(
            "\nSearch slopes (ms/item, {}% CI):\n",
            self.confidence_level * 100.0
        ));
        for row in &self.slopes {
            let label = format!(
                "{:>4}  {:<11} {:<7}",
                row.group.participant,
                search_type_label(row.group.conjunction),
                if row.group.present { "present" } else { "absent" }
            );
            match &row.outcome {
                SlopeOutcome::Fitted(e) => report.push_str(&format!(
                    "  {}  {:.p$}  [{:.p$}, {:.p$}]  R²={:.p$}  n={}\n",
                    label, e.slope, e.ci_lower, e.ci_upper, e.r_squared, e.n
                )),
                SlopeOutcome::InsufficientData {
                    n,
                    distinct_set_sizes,
                } => report.push_str(&format!(
                    "  {}  insufficient data (n={}, set sizes={})\n",
                    label, n, distinct_set_sizes
                )),
            }
        }

        report
    }
}
