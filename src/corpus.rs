//! Participant corpus assembly and the correct-trials view

use crate::trial::TrialRecord;
use std::collections::BTreeSet;

/// All analysis-eligible trials across participants
///
/// Constructed only through [`Corpus::assemble`], so every record carries a
/// positive participant identifier. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    trials: Vec<TrialRecord>,
}

impl Corpus {
    /// Concatenate per-file loader outputs and drop sentinel participants
    ///
    /// Files whose stem is not a positive integer (placeholders, templates)
    /// carry a participant identifier <= 0 and are excluded here. Identical
    /// identifiers coming from different files are kept as-is.
    pub fn assemble<I>(files: I) -> Self
    where
        I: IntoIterator<Item = Vec<TrialRecord>>,
    {
        let trials = files
            .into_iter()
            .flatten()
            .filter(|trial| trial.participant > 0)
            .collect();
        Self { trials }
    }

    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Distinct participant identifiers, ascending
    pub fn participants(&self) -> Vec<i64> {
        let ids: BTreeSet<i64> = self.trials.iter().map(|t| t.participant).collect();
        ids.into_iter().collect()
    }

    /// Trials with an accurate response; the basis of every timing analysis
    pub fn correct_trials(&self) -> CorrectTrials<'_> {
        CorrectTrials::select(&self.trials)
    }
}

/// Read-only selection of the corpus where `correct` is true
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectTrials<'a> {
    trials: Vec<&'a TrialRecord>,
}

impl<'a> CorrectTrials<'a> {
    fn select(trials: &'a [TrialRecord]) -> Self {
        Self {
            trials: trials.iter().filter(|t| t.correct).collect(),
        }
    }

    /// Re-applying the filter to an already filtered view
    pub fn correct_trials(&self) -> CorrectTrials<'a> {
        Self {
            trials: self.trials.iter().copied().filter(|t| t.correct).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TrialRecord> + '_ {
        self.trials.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}
