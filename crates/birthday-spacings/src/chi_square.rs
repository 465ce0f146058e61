//! Chi-squared goodness-of-fit test.
//!
//! Compares observed bin counts against expected frequencies. When the two
//! totals disagree (for example because the expected distribution was
//! truncated) the expected frequencies are rescaled to the observed total
//! before the statistic is formed.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::error::{BirthdayError, ChiSquareError};

/// Totals closer than this are treated as equal and left unscaled.
const RESCALE_TOLERANCE: f64 = 1e-5;

/// Result of a chi-squared goodness-of-fit test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquareOutcome {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
}

/// Check that the arrays form a valid goodness-of-fit input.
pub fn validate(expected: &[f64], observed: &[u64]) -> Result<(), ChiSquareError> {
    if expected.len() != observed.len() {
        return Err(ChiSquareError::LengthMismatch {
            expected: expected.len(),
            observed: observed.len(),
        });
    }
    if expected.len() < 2 {
        return Err(ChiSquareError::TooFewBins {
            bins: expected.len(),
        });
    }
    if let Some((bin, &value)) = expected
        .iter()
        .enumerate()
        .find(|&(_, &e)| !(e.is_finite() && e > 0.0))
    {
        return Err(ChiSquareError::NonPositiveExpected { bin, value });
    }
    if observed.iter().all(|&o| o == 0) {
        return Err(ChiSquareError::EmptyObserved);
    }
    Ok(())
}

/// `Σ (o - e)² / e` with `e` rescaled to the observed total when needed.
pub fn statistic(expected: &[f64], observed: &[u64]) -> Result<f64, ChiSquareError> {
    validate(expected, observed)?;
    let sum_expected: f64 = expected.iter().sum();
    let sum_observed = observed.iter().sum::<u64>() as f64;
    let ratio = if (sum_expected - sum_observed).abs() > RESCALE_TOLERANCE {
        sum_observed / sum_expected
    } else {
        1.0
    };
    Ok(expected
        .iter()
        .zip(observed)
        .map(|(&e, &o)| {
            let e = e * ratio;
            let dev = o as f64 - e;
            dev * dev / e
        })
        .sum())
}

/// Run the test with `bins - 1` degrees of freedom.
pub fn test(expected: &[f64], observed: &[u64]) -> Result<ChiSquareOutcome, BirthdayError> {
    let statistic = statistic(expected, observed)?;
    let degrees_of_freedom = expected.len() - 1;
    let dist = ChiSquared::new(degrees_of_freedom as f64)
        .map_err(|e| BirthdayError::Statistics(e.to_string()))?;
    let p_value = dist.sf(statistic).clamp(0.0, 1.0);
    Ok(ChiSquareOutcome {
        statistic,
        degrees_of_freedom,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_fit_has_zero_statistic() {
        let outcome = test(&[25.0, 50.0, 25.0], &[25, 50, 25]).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert_eq!(outcome.degrees_of_freedom, 2);
        assert!((outcome.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn known_statistic_and_p_value() {
        // (10-20)^2/20 + (30-20)^2/20 = 10, dof 1
        let outcome = test(&[20.0, 20.0], &[10, 30]).unwrap();
        assert!((outcome.statistic - 10.0).abs() < 1e-12);
        // P(chi2_1 > 10) = 0.0015654
        assert!((outcome.p_value - 0.001_565_4).abs() < 1e-6, "{}", outcome.p_value);
    }

    #[test]
    fn expected_is_rescaled_to_observed_total() {
        // expected sums to 50, observed to 100: same shape -> perfect fit
        let chi2 = statistic(&[10.0, 15.0, 25.0], &[20, 30, 50]).unwrap();
        assert!(chi2.abs() < 1e-12, "{chi2}");
    }

    #[test]
    fn small_total_mismatch_is_not_rescaled() {
        let exact = statistic(&[50.0, 50.0], &[40, 60]).unwrap();
        let nudged = statistic(&[50.000_001, 49.999_999], &[40, 60]).unwrap();
        assert!((exact - nudged).abs() < 1e-6);
        assert!((exact - 4.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_length_mismatch() {
        assert_eq!(
            validate(&[1.0, 2.0], &[1, 2, 3]),
            Err(ChiSquareError::LengthMismatch {
                expected: 2,
                observed: 3
            })
        );
    }

    #[test]
    fn rejects_single_bin() {
        assert_eq!(
            validate(&[1.0], &[1]),
            Err(ChiSquareError::TooFewBins { bins: 1 })
        );
        assert_eq!(
            validate(&[], &[]),
            Err(ChiSquareError::TooFewBins { bins: 0 })
        );
    }

    #[test]
    fn rejects_non_positive_expected() {
        assert_eq!(
            validate(&[1.0, 0.0, 2.0], &[1, 1, 1]),
            Err(ChiSquareError::NonPositiveExpected { bin: 1, value: 0.0 })
        );
        assert!(matches!(
            validate(&[1.0, f64::NAN], &[1, 1]),
            Err(ChiSquareError::NonPositiveExpected { bin: 1, .. })
        ));
    }

    #[test]
    fn rejects_all_zero_observed() {
        assert_eq!(
            validate(&[1.0, 2.0], &[0, 0]),
            Err(ChiSquareError::EmptyObserved)
        );
    }

    #[test]
    fn p_value_stays_in_unit_interval() {
        let outcome = test(&[1.0, 1.0, 1.0], &[0, 0, 1000]).unwrap();
        assert!((0.0..=1.0).contains(&outcome.p_value));
        assert!(outcome.p_value < 1e-10);
    }
}
