//! Full result record of a birthday spacings run.

use num_bigint::BigUint;
use serde::Serialize;

use crate::histogram::Histogram;

/// Default significance level below which a run is reported as failed.
pub const DEFAULT_THRESHOLD: f64 = 0.01;

/// Everything computed during one run, for display and JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct SpacingsReport {
    /// Exclusive upper bound of the birthday range, in decimal.
    #[serde(serialize_with = "serialize_decimal")]
    pub n: BigUint,
    pub n_birthdays: usize,
    pub observations: usize,
    pub lambda: f64,
    pub max_duplicates: usize,
    /// Raw tally: `counts[k]` trials had exactly `k` duplicate spacings.
    pub counts: Vec<u64>,
    pub histogram: Histogram,
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
}

fn serialize_decimal<S: serde::Serializer>(n: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&n.to_str_radix(10))
}

impl SpacingsReport {
    /// Whether the p-value clears `threshold`.
    pub fn passed(&self, threshold: f64) -> bool {
        pass_from_p(Some(self.p_value), threshold)
    }

    pub fn grade(&self) -> char {
        grade_from_p(Some(self.p_value))
    }

    /// Mean duplicate count actually observed.
    pub fn observed_mean(&self) -> f64 {
        let weighted: u64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(k, &c)| k as u64 * c)
            .sum();
        weighted as f64 / self.observations as f64
    }
}

/// Assign a letter grade based on p-value.
///
/// - A: p >= 0.1
/// - B: p >= 0.01
/// - C: p >= 0.001
/// - D: p >= 0.0001
/// - F: otherwise or None
pub fn grade_from_p(p: Option<f64>) -> char {
    match p {
        Some(p) if p >= 0.1 => 'A',
        Some(p) if p >= 0.01 => 'B',
        Some(p) if p >= 0.001 => 'C',
        Some(p) if p >= 0.0001 => 'D',
        _ => 'F',
    }
}

/// Determine pass/fail from p-value against a threshold.
pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
    match p {
        Some(p) => p >= threshold,
        None => false,
    }
}
