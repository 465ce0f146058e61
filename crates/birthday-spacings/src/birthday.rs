//! The birthday spacings test routine.

use log::{debug, trace};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::chi_square;
use crate::error::BirthdayError;
use crate::generator::Generator;
use crate::histogram::{BinPolicy, Histogram, tally};
use crate::poisson;
use crate::report::SpacingsReport;
use crate::spacings::duplicate_spacings;

/// Tunables of a test run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub bin_policy: BinPolicy,
}

/// Birthday spacings test over birthdays drawn from `generator` in `[0, n)`.
///
/// Each trial draws `n_birthdays` birthdays, sorts them, sorts the spacings
/// between neighbours and counts how many distinct spacing values repeat.
/// Under the null hypothesis those counts are Poisson with mean
/// `n_birthdays^3 / (4n)`; the p-value comes from a chi-squared fit of the
/// observed counts against that distribution.
///
/// ```
/// use birthday_spacings::{BirthdaySpacingsTest, UniformRng};
/// use num_bigint::BigUint;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// // 256^3 / (4 * 2^20) = 4 duplicates expected per trial
/// let n = BigUint::from(1u32 << 20);
/// let generator = UniformRng::new(StdRng::seed_from_u64(7), n.clone()).unwrap();
/// let mut test = BirthdaySpacingsTest::new(generator, n).unwrap();
/// let p = test.test(256, 200).unwrap();
/// assert!((0.0..=1.0).contains(&p));
/// ```
#[derive(Debug)]
pub struct BirthdaySpacingsTest<G> {
    generator: G,
    n: BigUint,
    config: TestConfig,
}

impl<G: Generator> BirthdaySpacingsTest<G> {
    /// Fails if `n` is zero.
    pub fn new(generator: G, n: BigUint) -> Result<Self, BirthdayError> {
        if n.is_zero() {
            return Err(BirthdayError::EmptyRange);
        }
        Ok(Self {
            generator,
            n,
            config: TestConfig::default(),
        })
    }

    pub fn with_config(mut self, config: TestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Exclusive upper bound of the birthday range.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    pub fn into_generator(self) -> G {
        self.generator
    }

    /// Theoretical mean number of duplicate spacings per trial.
    pub fn lambda(&self, n_birthdays: usize) -> Result<f64, BirthdayError> {
        poisson::lambda(n_birthdays, &self.n)
    }

    /// p-value of the test. Small values (say below 0.05) reject the
    /// hypothesis that the generator is random.
    pub fn test(&mut self, n_birthdays: usize, observations: usize) -> Result<f64, BirthdayError> {
        self.run(n_birthdays, observations).map(|r| r.p_value)
    }

    /// Run the trial loop only and return one duplicate count per trial.
    pub fn observe(
        &mut self,
        n_birthdays: usize,
        observations: usize,
    ) -> Result<Vec<usize>, BirthdayError> {
        validate(n_birthdays, observations)?;
        self.collect(n_birthdays, observations)
    }

    /// Run the test and return the full report.
    pub fn run(
        &mut self,
        n_birthdays: usize,
        observations: usize,
    ) -> Result<SpacingsReport, BirthdayError> {
        validate(n_birthdays, observations)?;
        let lambda = self.lambda(n_birthdays)?;
        let dist = poisson::distribution(lambda)?;
        if let BinPolicy::MergeTail { min_expected } = self.config.bin_policy {
            if !(min_expected.is_finite() && min_expected > 0.0) {
                return Err(BirthdayError::InvalidMinExpected(min_expected));
            }
        }
        debug!(
            "birthday spacings: n={}, birthdays={n_birthdays}, observations={observations}, lambda={lambda}, bins={}",
            self.n, self.config.bin_policy
        );

        let observed = self.collect(n_birthdays, observations)?;
        let counts = tally(&observed);
        let max_duplicates = counts.len() - 1;
        let histogram = Histogram::build(&observed, &dist, self.config.bin_policy)?;
        debug!(
            "histogram: max_duplicates={max_duplicates}, bins={}, observed={:?}",
            histogram.len(),
            histogram.observed()
        );

        let outcome = chi_square::test(&histogram.expected(), &histogram.observed())?;
        debug!(
            "chi2={:.4}, dof={}, p={:.6}",
            outcome.statistic, outcome.degrees_of_freedom, outcome.p_value
        );

        Ok(SpacingsReport {
            n: self.n.clone(),
            n_birthdays,
            observations,
            lambda,
            max_duplicates,
            counts,
            histogram,
            statistic: outcome.statistic,
            degrees_of_freedom: outcome.degrees_of_freedom,
            p_value: outcome.p_value,
        })
    }

    fn collect(
        &mut self,
        n_birthdays: usize,
        observations: usize,
    ) -> Result<Vec<usize>, BirthdayError> {
        let mut observed = Vec::with_capacity(observations);
        let mut birthdays = Vec::with_capacity(n_birthdays);
        for trial in 0..observations {
            birthdays.clear();
            for _ in 0..n_birthdays {
                let value = self
                    .generator
                    .draw()
                    .map_err(|source| BirthdayError::Generator { trial, source })?;
                if value >= self.n {
                    return Err(BirthdayError::OutOfRange {
                        trial,
                        value,
                        n: self.n.clone(),
                    });
                }
                birthdays.push(value);
            }
            let duplicates = duplicate_spacings(&mut birthdays);
            trace!("trial {trial}: {duplicates} duplicate spacings");
            observed.push(duplicates);
        }
        Ok(observed)
    }
}

fn validate(n_birthdays: usize, observations: usize) -> Result<(), BirthdayError> {
    if n_birthdays < 2 {
        return Err(BirthdayError::TooFewBirthdays { n_birthdays });
    }
    if observations == 0 {
        return Err(BirthdayError::NoObservations);
    }
    Ok(())
}
