//! Accuracy summaries
//!
//! Accuracy is defined over all trials, so these views are computed from the
//! full corpus rather than the correct-trials view.

use crate::corpus::Corpus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fraction of correct responses for one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantAccuracy {
    pub participant: i64,
    pub trials: usize,
    /// Rounded to the configured number of decimals
    pub accuracy: f64,
}

/// Response outcome used as the long-form category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => write!(f, "Correct"),
            Outcome::Incorrect => write!(f, "Incorrect"),
        }
    }
}

/// One long-form row: share of trials with `outcome` in a
/// (participant, set size, search type) cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionAccuracy {
    pub participant: i64,
    pub set_size: i64,
    pub conjunction: bool,
    pub outcome: Outcome,
    pub fraction: f64,
}

#[derive(Default)]
struct Tally {
    trials: usize,
    correct: usize,
}

impl Tally {
    fn add(&mut self, correct: bool) {
        self.trials += 1;
        if correct {
            self.correct += 1;
        }
    }

    fn fraction_correct(&self) -> f64 {
        self.correct as f64 / self.trials as f64
    }

    fn fraction_incorrect(&self) -> f64 {
        (self.trials - self.correct) as f64 / self.trials as f64
    }
}

/// Round half to even at `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Mean of `correct` per participant, ascending by participant
pub fn participant_accuracy(corpus: &Corpus, decimals: u32) -> Vec<ParticipantAccuracy> {
    let mut tallies: BTreeMap<i64, Tally> = BTreeMap::new();
    for trial in corpus.trials() {
        tallies.entry(trial.participant).or_default().add(trial.correct);
    }

    tallies
        .into_iter()
        .map(|(participant, tally)| ParticipantAccuracy {
            participant,
            trials: tally.trials,
            accuracy: round_to(tally.fraction_correct(), decimals),
        })
        .collect()
}

/// Correct/incorrect shares per (participant, set size, search type)
///
/// Two rows per cell, Correct first. Cells only exist when they hold trials.
pub fn accuracy_by_condition(corpus: &Corpus) -> Vec<ConditionAccuracy> {
    let mut tallies: BTreeMap<(i64, i64, bool), Tally> = BTreeMap::new();
    for trial in corpus.trials() {
        tallies
            .entry((trial.participant, trial.set_size, trial.conjunction))
            .or_default()
            .add(trial.correct);
    }

    tallies
        .into_iter()
        .flat_map(|((participant, set_size, conjunction), tally)| {
            [
                (Outcome::Correct, tally.fraction_correct()),
                (Outcome::Incorrect, tally.fraction_incorrect()),
            ]
            .map(|(outcome, fraction)| ConditionAccuracy {
                participant,
                set_size,
                conjunction,
                outcome,
                fraction,
            })
        })
        .collect()
}
