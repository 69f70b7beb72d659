// Per-condition slope estimation over the correct-trials view
//
// Groups trials by (participant, conjunction, present), fits RT on set size
// within each group, and reports either a fitted estimate with a two-sided
// t interval or an explicit insufficient-data marker. A degenerate group is
// never emitted as a numeric row.

use crate::corpus::CorrectTrials;
use crate::slope::ols::{ordinary_least_squares, FitError, LineFit};
use crate::trial::ConditionGroup;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Fitted search slope for one condition group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeEstimate {
    /// Observations used in the fit
    pub n: usize,
    pub intercept: f64,
    /// Milliseconds per additional stimulus
    pub slope: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub r_squared: f64,
}

/// Outcome of fitting one condition group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlopeOutcome {
    Fitted(SlopeEstimate),

    /// Fewer than three observations or a single set size
    InsufficientData { n: usize, distinct_set_sizes: usize },
}

impl SlopeOutcome {
    pub fn estimate(&self) -> Option<&SlopeEstimate> {
        match self {
            SlopeOutcome::Fitted(estimate) => Some(estimate),
            SlopeOutcome::InsufficientData { .. } => None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.estimate().is_some()
    }
}

/// One row of the slope table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSlope {
    #[serde(flatten)]
    pub group: ConditionGroup,
    #[serde(flatten)]
    pub outcome: SlopeOutcome,
}

/// Two-sided critical value of Student's t
///
/// For `confidence = 0.95` this is the 0.975 quantile with `df` degrees of
/// freedom.
pub fn t_critical(df: usize, confidence: f64) -> Result<f64> {
    if df == 0 {
        anyhow::bail!("Student's t requires at least 1 degree of freedom");
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        anyhow::bail!("Confidence level must be in (0, 1), got {}", confidence);
    }

    let distribution = StudentsT::new(0.0, 1.0, df as f64)
        .with_context(|| format!("Failed to build t distribution with {} df", df))?;
    Ok(distribution.inverse_cdf(0.5 + confidence / 2.0))
}

fn to_estimate(fit: &LineFit, confidence: f64) -> Result<SlopeEstimate> {
    let t = t_critical(fit.df(), confidence)?;
    let half_width = t * fit.slope_std_error;

    Ok(SlopeEstimate {
        n: fit.n,
        intercept: fit.intercept,
        slope: fit.slope,
        ci_lower: fit.slope - half_width,
        ci_upper: fit.slope + half_width,
        r_squared: fit.r_squared,
    })
}

/// Fit RT ~ set size for every condition group present in `trials`
///
/// Rows are ordered by (participant, conjunction, present). Groups that
/// cannot support a fit are returned as [`SlopeOutcome::InsufficientData`].
pub fn estimate_slopes(trials: &CorrectTrials<'_>, confidence: f64) -> Result<Vec<GroupSlope>> {
    let mut groups: BTreeMap<ConditionGroup, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for trial in trials.iter() {
        let (x, y) = groups.entry(trial.condition()).or_default();
        x.push(trial.set_size as f64);
        y.push(trial.rt as f64);
    }

    let mut rows = Vec::with_capacity(groups.len());
    for (group, (x, y)) in groups {
        let outcome = match ordinary_least_squares(&x, &y) {
            Ok(fit) => SlopeOutcome::Fitted(to_estimate(&fit, confidence)?),
            Err(FitError::TooFewObservations { .. } | FitError::ConstantPredictor) => {
                let distinct_set_sizes = x
                    .iter()
                    .map(|size| *size as i64)
                    .collect::<BTreeSet<_>>()
                    .len();
                warn!(
                    "Insufficient data for participant {} ({}, target {}): {} trials, {} set sizes",
                    group.participant,
                    crate::trial::search_type_label(group.conjunction),
                    if group.present { "present" } else { "absent" },
                    x.len(),
                    distinct_set_sizes
                );
                SlopeOutcome::InsufficientData {
                    n: x.len(),
                    distinct_set_sizes,
                }
            }
            Err(e @ FitError::LengthMismatch { .. }) => {
                return Err(e).context("Slope fit received misaligned columns");
            }
        };
        rows.push(GroupSlope { group, outcome });
    }

    debug!(
        "Estimated slopes for {} condition groups ({} fitted)",
        rows.len(),
        rows.iter().filter(|r| r.outcome.is_fitted()).count()
    );
    Ok(rows)
}
