//! Trial records and grouping keys shared by every analysis stage

use serde::{Deserialize, Serialize};

/// One behavioral observation from a visual-search trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Participant identifier (derived from the source file name)
    pub participant: i64,
    /// Whether the target was present in the display
    pub present: bool,
    /// Number of stimuli shown
    pub set_size: i64,
    /// Conjunction (true) or feature (false) search
    pub conjunction: bool,
    /// Whether the response matched ground truth
    pub correct: bool,
    /// Reaction time in milliseconds
    pub rt: i64,
}

impl TrialRecord {
    /// Regression grouping key for this trial
    pub fn condition(&self) -> ConditionGroup {
        ConditionGroup {
            participant: self.participant,
            conjunction: self.conjunction,
            present: self.present,
        }
    }
}

/// (participant, conjunction, present) - one independent regression sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub participant: i64,
    pub conjunction: bool,
    pub present: bool,
}

/// Human-readable search type label
pub fn search_type_label(conjunction: bool) -> &'static str {
    if conjunction {
        "conjunction"
    } else {
        "feature"
    }
}
