//! Binning duplicate counts into observed/expected pairs.

use serde::{Deserialize, Serialize};
use statrs::distribution::Poisson;

use crate::error::BirthdayError;
use crate::poisson;

/// How duplicate counts are grouped before the chi-squared test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BinPolicy {
    /// One bin per duplicate count `0..=max`.
    Inclusive,
    /// One bin per duplicate count `0..max`, dropping the bin at `max`.
    ///
    /// Reproduces results computed with that layout; the dropped bin means
    /// `sum(observed)` falls short of the number of observations.
    ExcludeMax,
    /// Bins `0..=max` with the last one open-ended (`X >= max`), then edge bins
    /// whose expected frequency is below `min_expected` merged inward.
    MergeTail { min_expected: f64 },
}

impl BinPolicy {
    /// Conventional lower bound on expected frequencies for the chi-squared
    /// approximation.
    pub const DEFAULT_MIN_EXPECTED: f64 = 5.0;
}

impl Default for BinPolicy {
    fn default() -> Self {
        Self::MergeTail {
            min_expected: Self::DEFAULT_MIN_EXPECTED,
        }
    }
}

impl std::fmt::Display for BinPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inclusive => write!(f, "inclusive"),
            Self::ExcludeMax => write!(f, "exclude-max"),
            Self::MergeTail { min_expected } => write!(f, "merge-tail(min_expected={min_expected})"),
        }
    }
}

/// A contiguous range of duplicate counts with its observed and expected
/// frequencies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    /// Smallest duplicate count in the bin.
    pub lower: usize,
    /// Largest duplicate count in the bin, `None` for an open-ended tail.
    pub upper: Option<usize>,
    pub observed: u64,
    pub expected: f64,
}

impl Bin {
    fn single(k: usize, observed: u64, expected: f64) -> Self {
        Self {
            lower: k,
            upper: Some(k),
            observed,
            expected,
        }
    }

    fn absorb(&mut self, other: Bin) {
        self.lower = self.lower.min(other.lower);
        self.upper = match (self.upper, other.upper) {
            (Some(a), Some(b)) => Some(a.max(b)),
            _ => None,
        };
        self.observed += other.observed;
        self.expected += other.expected;
    }

    /// Human-readable range, e.g. `3`, `0-2` or `>=9`.
    pub fn label(&self) -> String {
        match self.upper {
            None => format!(">={}", self.lower),
            Some(upper) if upper == self.lower => self.lower.to_string(),
            Some(upper) => format!("{}-{upper}", self.lower),
        }
    }
}

/// Observed and expected frequencies over a set of bins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub policy: BinPolicy,
    pub bins: Vec<Bin>,
}

/// Count how many observations equal each value `0..=max`.
pub fn tally(observations: &[usize]) -> Vec<u64> {
    let max = observations.iter().copied().max().unwrap_or(0);
    let mut counts = vec![0u64; max + 1];
    for &o in observations {
        counts[o] += 1;
    }
    counts
}

impl Histogram {
    /// Bin `observations` against Poisson `dist` under `policy`.
    ///
    /// Fails when fewer than two bins remain, which happens whenever every
    /// observation is zero.
    pub fn build(
        observations: &[usize],
        dist: &Poisson,
        policy: BinPolicy,
    ) -> Result<Self, BirthdayError> {
        if observations.is_empty() {
            return Err(BirthdayError::NoObservations);
        }
        let counts = tally(observations);
        let max = counts.len() - 1;
        let total = observations.len() as f64;
        let single = |k: usize| Bin::single(k, counts[k], poisson::probability(dist, k) * total);

        let bins = match policy {
            BinPolicy::Inclusive => (0..=max).map(single).collect(),
            BinPolicy::ExcludeMax => (0..max).map(single).collect(),
            BinPolicy::MergeTail { min_expected } => {
                if !(min_expected.is_finite() && min_expected > 0.0) {
                    return Err(BirthdayError::InvalidMinExpected(min_expected));
                }
                let mut bins: Vec<Bin> = (0..max).map(single).collect();
                bins.push(Bin {
                    lower: max,
                    upper: None,
                    observed: counts[max],
                    expected: poisson::tail_probability(dist, max) * total,
                });
                merge_edges(&mut bins, min_expected);
                bins
            }
        };

        let histogram = Self { policy, bins };
        if histogram.len() < 2 {
            return Err(BirthdayError::DegenerateHistogram {
                max_duplicates: max,
                bins: histogram.len(),
            });
        }
        Ok(histogram)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn observed(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.observed).collect()
    }

    pub fn expected(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.expected).collect()
    }

    pub fn total_observed(&self) -> u64 {
        self.bins.iter().map(|b| b.observed).sum()
    }
}

/// Fold the tail, then the head, inward while its expected frequency is below
/// `min_expected`. Never leaves fewer than two bins.
fn merge_edges(bins: &mut Vec<Bin>, min_expected: f64) {
    while bins.len() > 2 && bins.last().is_some_and(|b| b.expected < min_expected) {
        if let Some(tail) = bins.pop() {
            if let Some(last) = bins.last_mut() {
                last.absorb(tail);
            }
        }
    }
    if bins.len() <= 2 {
        return;
    }
    // head bins `..split` fold into `bins[split]`
    let mut split = 0;
    let mut running = bins[0].expected;
    while bins.len() - split > 2 && running < min_expected {
        split += 1;
        running += bins[split].expected;
    }
    if split > 0 {
        let head: Vec<Bin> = bins.drain(..split).collect();
        for bin in head {
            bins[0].absorb(bin);
        }
    }
}
