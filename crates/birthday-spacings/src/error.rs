//! Error types for the birthday spacings test.

use num_bigint::BigUint;
use thiserror::Error;

/// Failure reported by a [`Generator`](crate::Generator) while drawing a value.
#[derive(Debug)]
pub struct GeneratorError(Box<dyn std::error::Error + Send + Sync>);

impl GeneratorError {
    /// Wrap any error (or a plain message) raised by a generator.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

impl std::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Precondition failures of the chi-squared goodness-of-fit test.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChiSquareError {
    #[error("expected has {expected} bins but observed has {observed}")]
    LengthMismatch { expected: usize, observed: usize },

    #[error("need at least 2 bins, got {bins}")]
    TooFewBins { bins: usize },

    #[error("expected frequency in bin {bin} must be positive and finite, got {value}")]
    NonPositiveExpected { bin: usize, value: f64 },

    #[error("observed counts are all zero")]
    EmptyObserved,
}

/// Everything that can stop a birthday spacings run.
#[derive(Debug, Error)]
pub enum BirthdayError {
    #[error("at least 2 birthdays are needed per trial, got {n_birthdays}")]
    TooFewBirthdays { n_birthdays: usize },

    #[error("at least 1 observation is needed")]
    NoObservations,

    #[error("range bound n must be positive")]
    EmptyRange,

    #[error("lambda = {n_birthdays}^3 / (4 * {n}) rounds to 0; use more birthdays or a smaller range")]
    ZeroLambda { n_birthdays: usize, n: BigUint },

    #[error("lambda = {n_birthdays}^3 / (4 * {n}) is not representable as a finite f64")]
    LambdaOverflow { n_birthdays: usize, n: BigUint },

    #[error("merge threshold must be positive and finite, got {0}")]
    InvalidMinExpected(f64),

    #[error("generator failed during trial {trial}")]
    Generator {
        trial: usize,
        #[source]
        source: GeneratorError,
    },

    #[error("generator produced {value} during trial {trial}, outside [0, {n})")]
    OutOfRange {
        trial: usize,
        value: BigUint,
        n: BigUint,
    },

    #[error(
        "duplicate counts peak at {max_duplicates}, leaving {bins} histogram bin(s); at least 2 are needed"
    )]
    DegenerateHistogram { max_duplicates: usize, bins: usize },

    #[error("statistics error: {0}")]
    Statistics(String),

    #[error(transparent)]
    ChiSquare(#[from] ChiSquareError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_error_keeps_message() {
        let err = GeneratorError::new("device unplugged");
        assert_eq!(err.to_string(), "device unplugged");
    }

    #[test]
    fn generator_error_is_source_of_birthday_error() {
        let err = BirthdayError::Generator {
            trial: 3,
            source: GeneratorError::new("boom"),
        };
        assert_eq!(err.to_string(), "generator failed during trial 3");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("boom"));
    }

    #[test]
    fn chi_square_error_converts() {
        let err: BirthdayError = ChiSquareError::TooFewBins { bins: 1 }.into();
        assert!(matches!(
            err,
            BirthdayError::ChiSquare(ChiSquareError::TooFewBins { bins: 1 })
        ));
    }
}
