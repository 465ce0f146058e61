//! # birthday-spacings
//!
//! The birthday spacings randomness test from *Some difficult-to-pass tests of
//! randomness* (Marsaglia & Tsang, 2002).
//!
//! Pick `m` birthdays from a year of `n` days and sort them. The spacings
//! between consecutive birthdays, once sorted themselves, should contain a
//! number of repeated values that is asymptotically Poisson with mean
//! `m^3 / (4n)`. Repeating that experiment many times and fitting the counts
//! against the Poisson distribution with a chi-squared test gives a p-value;
//! small values say the generator is not random.
//!
//! ## Quick Start
//!
//! ```no_run
//! use birthday_spacings::{BirthdaySpacingsTest, Lcg};
//!
//! let lcg = Lcg::msvc(1);
//! let n = lcg.modulus().clone();
//! let mut test = BirthdaySpacingsTest::new(lcg, n).unwrap();
//!
//! // 4096 birthdays over 2^32 days, 5000 trials
//! let p = test.test(4096, 5000).unwrap();
//! assert!(p < 0.05, "LCGs fail birthday spacings");
//! ```
//!
//! ## Architecture
//!
//! Generator → trials (sort, spacings, duplicates) → histogram → chi-squared → p
//!
//! Birthdays are arbitrary-precision [`BigUint`](num_bigint::BigUint) values,
//! so the year length is not limited to a machine word. Any source can be
//! tested by implementing [`Generator`] or wrapping a closure with
//! [`from_fn`].

pub mod birthday;
pub mod chi_square;
pub mod error;
pub mod generator;
pub mod histogram;
pub mod poisson;
pub mod report;
pub mod spacings;

pub use birthday::{BirthdaySpacingsTest, TestConfig};
pub use chi_square::ChiSquareOutcome;
pub use error::{BirthdayError, ChiSquareError, GeneratorError};
pub use generator::{FromFn, Generator, Lcg, UniformRng, from_fn};
pub use histogram::{Bin, BinPolicy, Histogram};
pub use report::{DEFAULT_THRESHOLD, SpacingsReport, grade_from_p, pass_from_p};
pub use spacings::{count_duplicates, duplicate_spacings, sorted_spacings};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
