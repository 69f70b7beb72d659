// Search-slope estimation
//
// The search slope is the fitted coefficient of reaction time on set size:
// milliseconds added per extra stimulus in the display. Each
// (participant, search type, target presence) cell is fitted independently
// with closed-form ordinary least squares on correct trials only.
//
// Implementation:
// - ols: centered normal-equation solution in f64, no iterative solver
// - estimator: grouping, degenerate-cell detection, t-based intervals
// - Uses statrs (crates.io) for Student's t quantiles

mod estimator;
mod ols;

pub use estimator::{estimate_slopes, t_critical, GroupSlope, SlopeEstimate, SlopeOutcome};
pub use ols::{ordinary_least_squares, FitError, LineFit};

#[cfg(test)]
mod tests;
