// Scenario tests for search-slope estimation
//
// Synthetic sessions shaped like the real experiment: set sizes 10-40,
// feature and conjunction blocks, target present and absent trials.

use super::*;
use crate::corpus::Corpus;
use crate::trial::{ConditionGroup, TrialRecord};

fn trial(
    participant: i64,
    conjunction: bool,
    present: bool,
    set_size: i64,
    rt: i64,
) -> TrialRecord {
    TrialRecord {
        participant,
        present,
        set_size,
        conjunction,
        correct: true,
        rt,
    }
}

fn group(participant: i64, conjunction: bool, present: bool) -> ConditionGroup {
    ConditionGroup {
        participant,
        conjunction,
        present,
    }
}

/// Noise-free data: rt = 500 + 10 * set_size
#[test]
fn test_noise_free_slope_is_exact() {
    let trials: Vec<TrialRecord> = [10, 20, 30, 40]
        .iter()
        .map(|&size| trial(1, true, true, size, 500 + 10 * size))
        .collect();
    let corpus = Corpus::assemble(vec![trials]);

    let rows = estimate_slopes(&corpus.correct_trials(), 0.95).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].group, group(1, true, true));

    let estimate = rows[0].outcome.estimate().expect("fitted");
    assert!((estimate.slope - 10.0).abs() < 1e-6);
    assert!((estimate.r_squared - 1.0).abs() < 1e-6);
    assert!((estimate.ci_upper - estimate.ci_lower).abs() < 1e-6);
    assert!((estimate.intercept - 500.0).abs() < 1e-6);
    assert_eq!(estimate.n, 4);
}

/// A single observation cannot carry a slope
#[test]
fn test_single_observation_is_insufficient() {
    let corpus = Corpus::assemble(vec![vec![trial(2, false, false, 20, 640)]]);

    let rows = estimate_slopes(&corpus.correct_trials(), 0.95).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].outcome,
        SlopeOutcome::InsufficientData {
            n: 1,
            distinct_set_sizes: 1
        }
    );
    assert!(rows[0].outcome.estimate().is_none());
}

/// Many trials at one set size still give no slope
#[test]
fn test_single_set_size_is_insufficient() {
    let trials: Vec<TrialRecord> = (0..12).map(|i| trial(3, false, true, 30, 600 + i)).collect();
    let corpus = Corpus::assemble(vec![trials]);

    let rows = estimate_slopes(&corpus.correct_trials(), 0.95).unwrap();
    assert_eq!(
        rows[0].outcome,
        SlopeOutcome::InsufficientData {
            n: 12,
            distinct_set_sizes: 1
        }
    );
}

/// Two points at two set sizes fit a line but leave no degrees of freedom
#[test]
fn test_two_observations_are_insufficient() {
    let corpus = Corpus::assemble(vec![vec![
        trial(5, true, false, 10, 720),
        trial(5, true, false, 40, 1480),
    ]]);

    let rows = estimate_slopes(&corpus.correct_trials(), 0.95).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].group, group(5, true, false));
    assert_eq!(
        rows[0].outcome,
        SlopeOutcome::InsufficientData {
            n: 2,
            distinct_set_sizes: 2
        }
    );
    assert!(!rows[0].outcome.is_fitted());
}

/// Classic pattern: flat feature search, steep conjunction search
#[test]
fn test_conditions_are_fitted_independently() {
    let mut trials = Vec::new();
    for &size in &[10, 20, 30, 40] {
        for rep in 0..3 {
            let jitter = [-8, 0, 8][rep];
            trials.push(trial(4, false, true, size, 450 + jitter));
            trials.push(trial(4, true, true, size, 400 + 25 * size + jitter));
            trials.push(trial(4, true, false, size, 500 + 50 * size + jitter));
        }
    }
    // Incorrect trials must not leak into the fit
    trials.push(TrialRecord {
        correct: false,
        ..trial(4, false, true, 40, 5000)
    });

    let corpus = Corpus::assemble(vec![trials]);
    let rows = estimate_slopes(&corpus.correct_trials(), 0.95).unwrap();

    let keys: Vec<ConditionGroup> = rows.iter().map(|r| r.group).collect();
    assert_eq!(
        keys,
        vec![group(4, false, true), group(4, true, false), group(4, true, true)]
    );

    let slope_of = |index: usize| rows[index].outcome.estimate().unwrap().slope;
    assert!(slope_of(0).abs() < 1e-9);
    assert!((slope_of(1) - 50.0).abs() < 1e-9);
    assert!((slope_of(2) - 25.0).abs() < 1e-9);

    // Jitter is independent of set size, so intervals have positive width
    for row in &rows {
        let estimate = row.outcome.estimate().unwrap();
        assert_eq!(estimate.n, 12);
        assert!(estimate.ci_lower < estimate.slope);
        assert!(estimate.slope < estimate.ci_upper);
    }
}

#[test]
fn test_interval_uses_t_quantile() {
    // Hand-checked example: slope 1.5, se sqrt(0.75), df 1
    let corpus = Corpus::assemble(vec![vec![
        trial(5, false, true, 1, 1),
        trial(5, false, true, 2, 4),
        trial(5, false, true, 3, 4),
    ]]);

    let rows = estimate_slopes(&corpus.correct_trials(), 0.95).unwrap();
    let estimate = rows[0].outcome.estimate().unwrap();

    // t(0.975, df=1) = 12.7062...
    let half_width = 12.706_204_736 * 0.75f64.sqrt();
    assert!((estimate.ci_lower - (1.5 - half_width)).abs() < 1e-4);
    assert!((estimate.ci_upper - (1.5 + half_width)).abs() < 1e-4);
    assert!((estimate.r_squared - 0.75).abs() < 1e-12);
}

#[test]
fn test_wider_confidence_gives_wider_interval() {
    let trials: Vec<TrialRecord> = [10, 20, 30, 40, 10, 20, 30, 40]
        .iter()
        .enumerate()
        .map(|(i, &size)| trial(6, true, false, size, 600 + 20 * size + (i as i64 % 3) * 15))
        .collect();
    let corpus = Corpus::assemble(vec![trials]);

    let narrow = estimate_slopes(&corpus.correct_trials(), 0.90).unwrap();
    let wide = estimate_slopes(&corpus.correct_trials(), 0.99).unwrap();

    let width = |rows: &[GroupSlope]| {
        let e = rows[0].outcome.estimate().unwrap();
        e.ci_upper - e.ci_lower
    };
    assert!(width(&wide) > width(&narrow));
}

#[test]
fn test_empty_view_gives_no_rows() {
    let corpus = Corpus::default();
    let rows = estimate_slopes(&corpus.correct_trials(), 0.95).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_t_critical_known_values() {
    assert!((t_critical(1, 0.95).unwrap() - 12.706_204_736).abs() < 1e-4);
    assert!((t_critical(2, 0.95).unwrap() - 4.302_652_73).abs() < 1e-4);
    assert!((t_critical(10, 0.95).unwrap() - 2.228_138_852).abs() < 1e-4);
}

#[test]
fn test_t_critical_rejects_bad_input() {
    assert!(t_critical(0, 0.95).is_err());
    assert!(t_critical(5, 1.0).is_err());
    assert!(t_critical(5, 0.0).is_err());
}

#[test]
fn test_group_slope_serializes_status() {
    let row = GroupSlope {
        group: group(7, true, false),
        outcome: SlopeOutcome::InsufficientData {
            n: 2,
            distinct_set_sizes: 2,
        },
    };

    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["participant"], 7);
    assert_eq!(json["status"], "insufficient_data");
    assert_eq!(json["n"], 2);
}
