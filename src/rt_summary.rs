//! Reaction-time summaries by set size
//!
//! One row per (participant, search type, target presence, set size) cell of
//! the correct-trials view: the points behind the RT-by-set-size figure the
//! slope lines are drawn through.
//!
//! Uses trueno::Vector for SIMD means and aprender's DescriptiveStats for
//! medians.

use crate::corpus::CorrectTrials;
use anyhow::{Context, Result};
use aprender::stats::DescriptiveStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trueno::Vector;

/// Timing summary for one set-size cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtCell {
    pub participant: i64,
    pub conjunction: bool,
    pub present: bool,
    pub set_size: i64,
    pub n: usize,
    pub mean_rt: f32,
    pub median_rt: f32,
}

/// Median RT of one cell (aprender's R-7 quantile, so even cells interpolate)
pub fn median_rt(rts: &Vector<f32>) -> Result<f32> {
    DescriptiveStats::new(rts)
        .quantile(0.5)
        .map_err(|e| anyhow::anyhow!("Failed to compute median RT: {}", e))
}

/// Summarize correct-trial RTs per cell, ordered by key
pub fn summarize_rt(trials: &CorrectTrials<'_>) -> Result<Vec<RtCell>> {
    let mut cells: BTreeMap<(i64, bool, bool, i64), Vec<f32>> = BTreeMap::new();
    for trial in trials.iter() {
        cells
            .entry((trial.participant, trial.conjunction, trial.present, trial.set_size))
            .or_default()
            .push(trial.rt as f32);
    }

    cells
        .into_iter()
        .map(|((participant, conjunction, present, set_size), rts)| -> Result<RtCell> {
            let vector = Vector::from_slice(&rts);
            let mean_rt = vector.mean().with_context(|| {
                format!("Failed to compute mean RT for participant {}", participant)
            })?;
            let median_rt = median_rt(&vector)?;

            Ok(RtCell {
                participant,
                conjunction,
                present,
                set_size,
                n: rts.len(),
                mean_rt,
                median_rt,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::trial::TrialRecord;

    fn trial(set_size: i64, correct: bool, rt: i64) -> TrialRecord {
        TrialRecord {
            participant: 1,
            present: false,
            set_size,
            conjunction: true,
            correct,
            rt,
        }
    }

    #[test]
    fn test_median_of_odd_cell_is_middle_rt() {
        let rts = Vector::from_slice(&[748.0, 612.0, 790.0, 655.0, 701.0]);
        assert_eq!(median_rt(&rts).unwrap(), 701.0);
    }

    #[test]
    fn test_median_of_even_cell_interpolates() {
        let corpus = Corpus::assemble(vec![vec![
            trial(30, true, 880),
            trial(30, true, 910),
            trial(30, true, 1030),
            trial(30, true, 2400),
        ]]);

        let cells = summarize_rt(&corpus.correct_trials()).unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].n, 4);
        // A slow outlier drags the mean but not the median
        assert_eq!(cells[0].median_rt, 970.0);
        assert!((cells[0].mean_rt - 1305.0).abs() < 1e-3);
    }

    #[test]
    fn test_cells_use_correct_trials_only() {
        let corpus = Corpus::assemble(vec![vec![
            trial(10, true, 500),
            trial(10, true, 600),
            trial(10, true, 700),
            trial(10, false, 4000),
            trial(20, true, 800),
        ]]);

        let cells = summarize_rt(&corpus.correct_trials()).unwrap();
        assert_eq!(cells.len(), 2);

        assert_eq!(cells[0].set_size, 10);
        assert_eq!(cells[0].n, 3);
        assert!((cells[0].mean_rt - 600.0).abs() < 1e-3);
        assert_eq!(cells[0].median_rt, 600.0);

        assert_eq!(cells[1].set_size, 20);
        assert_eq!(cells[1].n, 1);
        assert_eq!(cells[1].median_rt, 800.0);
    }

    #[test]
    fn test_empty_view() {
        let corpus = Corpus::default();
        assert!(summarize_rt(&corpus.correct_trials()).unwrap().is_empty());
    }
}
