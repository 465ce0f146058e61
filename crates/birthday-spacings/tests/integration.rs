//! Integration tests for birthday-spacings.
//!
//! These run the full test at the parameters from the Marsaglia-Tsang paper:
//! 4096 birthdays in a year of 2^32 days, repeated 5000 times.

use birthday_spacings::{BinPolicy, BirthdaySpacingsTest, Lcg, TestConfig, UniformRng};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;

const BIRTHDAYS: usize = 4096;
const OBSERVATIONS: usize = 5000;

fn year() -> BigUint {
    BigUint::from(1u64 << 32)
}

fn good_generator(seed: u64) -> UniformRng<StdRng> {
    UniformRng::new(StdRng::seed_from_u64(seed), year()).unwrap()
}

#[test]
fn bad_lcg_fails() {
    let mut test = BirthdaySpacingsTest::new(Lcg::msvc(1), year()).unwrap();
    let p = test.test(BIRTHDAYS, OBSERVATIONS).unwrap();
    assert!(p < 0.05, "LCG passed with p={p}");
}

#[test]
fn bad_lcg_fails_under_every_policy() {
    for bin_policy in [BinPolicy::Inclusive, BinPolicy::ExcludeMax, BinPolicy::default()] {
        let mut test = BirthdaySpacingsTest::new(Lcg::msvc(1), year())
            .unwrap()
            .with_config(TestConfig { bin_policy });
        let p = test
            .test(BIRTHDAYS, OBSERVATIONS)
            .unwrap_or_else(|e| panic!("{bin_policy}: {e}"));
        assert!(p < 0.05, "{bin_policy}: LCG passed with p={p}");
    }
}

#[test]
fn seeded_std_rng_passes() {
    let mut test = BirthdaySpacingsTest::new(good_generator(1234), year()).unwrap();
    let report = test.run(BIRTHDAYS, OBSERVATIONS).unwrap();
    assert!(
        report.p_value > 0.05,
        "StdRng rejected: p={}, chi2={:.2}, dof={}",
        report.p_value,
        report.statistic,
        report.degrees_of_freedom
    );
    assert_eq!(report.lambda, 4.0);
    assert!(
        (report.observed_mean() - 4.0).abs() < 0.2,
        "mean duplicates {}",
        report.observed_mean()
    );
}

#[test]
fn os_seeded_rng_produces_valid_p_value() {
    let generator = UniformRng::new(StdRng::from_os_rng(), year()).unwrap();
    let mut test = BirthdaySpacingsTest::new(generator, year()).unwrap();
    let report = test.run(BIRTHDAYS, 500).unwrap();
    assert!((0.0..=1.0).contains(&report.p_value));
    assert_eq!(report.histogram.total_observed(), 500);
}

#[test]
fn repeated_runs_are_deterministic() {
    let run = || {
        BirthdaySpacingsTest::new(good_generator(77), year())
            .unwrap()
            .run(BIRTHDAYS, 200)
            .unwrap()
    };
    let (a, b) = (run(), run());
    assert_eq!(a.p_value, b.p_value);
    assert_eq!(a.counts, b.counts);
}

#[test]
fn rerun_continues_the_generator_stream() {
    let mut test = BirthdaySpacingsTest::new(good_generator(5), year()).unwrap();
    let first = test.observe(BIRTHDAYS, 50).unwrap();
    let second = test.observe(BIRTHDAYS, 50).unwrap();
    assert_ne!(first, second);
}

#[test]
fn wide_range_uses_exact_lambda() {
    // 4096^3 / (4 * 2^34) = 1
    let n = BigUint::from(1u64 << 34);
    let generator = UniformRng::new(StdRng::seed_from_u64(9), n.clone()).unwrap();
    let mut test = BirthdaySpacingsTest::new(generator, n).unwrap();
    let report = test.run(BIRTHDAYS, 300).unwrap();
    assert_eq!(report.lambda, 1.0);
    assert!((0.0..=1.0).contains(&report.p_value));
}

#[test]
fn report_serializes_to_json() {
    let mut test = BirthdaySpacingsTest::new(good_generator(3), year()).unwrap();
    let report = test.run(BIRTHDAYS, 100).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["n"], "4294967296");
    assert_eq!(json["n_birthdays"], 4096);
    assert_eq!(json["observations"], 100);
    assert!(json["histogram"]["bins"].as_array().unwrap().len() >= 2);
}
