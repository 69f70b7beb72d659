// Closed-form simple linear regression
//
// y = b0 + b1 * x fitted by the normal equations on centered data:
//   b1 = Sxy / Sxx,  b0 = mean(y) - b1 * mean(x)
// Residual sums are computed from the fitted line rather than the
// Syy - b1 * Sxy shortcut so a noise-free fit yields exactly zero error.

use thiserror::Error;

/// Why a line could not be fitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    #[error("x and y lengths differ ({x} vs {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    TooFewObservations { required: usize, actual: usize },

    #[error("Predictor has no variance (all x values equal)")]
    ConstantPredictor,
}

/// Minimum observations for a slope with a t interval (n - 2 >= 1)
pub const MIN_OBSERVATIONS: usize = 3;

/// Result of fitting one line
#[derive(Debug, Clone, PartialEq)]
pub struct LineFit {
    pub n: usize,
    pub intercept: f64,
    pub slope: f64,
    /// Standard error of the slope
    pub slope_std_error: f64,
    /// Coefficient of determination
    pub r_squared: f64,
}

impl LineFit {
    /// Residual degrees of freedom
    pub fn df(&self) -> usize {
        self.n - 2
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fit `y = intercept + slope * x`
pub fn ordinary_least_squares(x: &[f64], y: &[f64]) -> Result<LineFit, FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }

    let n = x.len();
    if n < MIN_OBSERVATIONS {
        return Err(FitError::TooFewObservations {
            required: MIN_OBSERVATIONS,
            actual: n,
        });
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let (sxx, sxy, syy) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), (&xi, &yi)| {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        (sxx + dx * dx, sxy + dx * dy, syy + dy * dy)
    });

    if sxx == 0.0 {
        return Err(FitError::ConstantPredictor);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let sse: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let residual = yi - (intercept + slope * xi);
            residual * residual
        })
        .sum();

    // A flat response fitted exactly is a perfect fit
    let r_squared = if syy == 0.0 {
        if sse == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - sse / syy
    };

    let slope_std_error = (sse / (n - 2) as f64 / sxx).sqrt();

    Ok(LineFit {
        n,
        intercept,
        slope,
        slope_std_error,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let x = [10.0, 20.0, 30.0, 40.0];
        let y = [600.0, 700.0, 800.0, 900.0];

        let fit = ordinary_least_squares(&x, &y).unwrap();
        assert!((fit.slope - 10.0).abs() < 1e-9);
        assert!((fit.intercept - 500.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(fit.slope_std_error, 0.0);
        assert_eq!(fit.df(), 2);
    }

    #[test]
    fn test_noisy_line_matches_hand_computation() {
        // mean_x = 2, mean_y = 3; Sxx = 2, Sxy = 3 -> slope 1.5, intercept 0
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 4.0, 4.0];

        let fit = ordinary_least_squares(&x, &y).unwrap();
        assert!((fit.slope - 1.5).abs() < 1e-12);
        assert!(fit.intercept.abs() < 1e-12);

        // residuals: -0.5, 1.0, -0.5 -> SSE 1.5; Syy = 6 -> R² = 0.75
        assert!((fit.r_squared - 0.75).abs() < 1e-12);
        // se = sqrt(1.5 / 1 / 2)
        assert!((fit.slope_std_error - 0.75f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_row_order_does_not_change_fit() {
        let x = [10.0, 40.0, 20.0, 30.0, 10.0];
        let y = [610.0, 905.0, 690.0, 812.0, 590.0];
        let forward = ordinary_least_squares(&x, &y).unwrap();

        let mut pairs: Vec<_> = x.iter().copied().zip(y.iter().copied()).collect();
        pairs.reverse();
        let (rx, ry): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let reversed = ordinary_least_squares(&rx, &ry).unwrap();

        assert!((forward.slope - reversed.slope).abs() < 1e-9);
        assert!((forward.r_squared - reversed.r_squared).abs() < 1e-12);
    }

    #[test]
    fn test_flat_response_is_perfect_fit() {
        let fit = ordinary_least_squares(&[10.0, 20.0, 30.0], &[500.0, 500.0, 500.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn test_too_few_observations() {
        assert_eq!(
            ordinary_least_squares(&[10.0, 20.0], &[600.0, 700.0]),
            Err(FitError::TooFewObservations {
                required: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_constant_predictor() {
        assert_eq!(
            ordinary_least_squares(&[20.0, 20.0, 20.0], &[600.0, 650.0, 700.0]),
            Err(FitError::ConstantPredictor)
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            ordinary_least_squares(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(FitError::LengthMismatch { x: 3, y: 2 })
        ));
    }
}
