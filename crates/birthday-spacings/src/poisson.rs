//! Theoretical Poisson model for duplicate spacing counts.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use statrs::distribution::{Discrete, DiscreteCDF, Poisson};

use crate::error::BirthdayError;

/// `n_birthdays^3 / (4n)` rounded to the nearest integer, ties rounded up.
///
/// Computed on exact integers so large ranges lose no precision before the
/// final conversion.
pub fn exact_lambda(n_birthdays: usize, n: &BigUint) -> Result<BigUint, BirthdayError> {
    if n.is_zero() {
        return Err(BirthdayError::EmptyRange);
    }
    let cube = BigUint::from(n_birthdays).pow(3u32);
    let denominator = n * 4u32;
    let (quotient, remainder) = cube.div_rem(&denominator);
    if remainder * 2u32 >= denominator {
        Ok(quotient + 1u32)
    } else {
        Ok(quotient)
    }
}

/// Mean of the Poisson distribution duplicate counts follow under the null
/// hypothesis. Fails if it rounds to zero.
pub fn lambda(n_birthdays: usize, n: &BigUint) -> Result<f64, BirthdayError> {
    let exact = exact_lambda(n_birthdays, n)?;
    if exact.is_zero() {
        return Err(BirthdayError::ZeroLambda {
            n_birthdays,
            n: n.clone(),
        });
    }
    match exact.to_f64() {
        Some(value) if value.is_finite() => Ok(value),
        _ => Err(BirthdayError::LambdaOverflow {
            n_birthdays,
            n: n.clone(),
        }),
    }
}

/// Build the statrs distribution for `lambda`.
pub fn distribution(lambda: f64) -> Result<Poisson, BirthdayError> {
    Poisson::new(lambda).map_err(|e| BirthdayError::Statistics(e.to_string()))
}

/// `P(X = k)`.
pub fn probability(dist: &Poisson, k: usize) -> f64 {
    dist.pmf(k as u64)
}

/// `P(X >= k)`.
pub fn tail_probability(dist: &Poisson, k: usize) -> f64 {
    match k {
        0 => 1.0,
        k => dist.sf(k as u64 - 1),
    }
}

/// `P(X <= k)`.
pub fn head_probability(dist: &Poisson, k: usize) -> f64 {
    dist.cdf(k as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn lambda_for_4096_birthdays_over_2_pow_32() {
        let n = BigUint::one() << 32u32;
        assert_eq!(exact_lambda(4096, &n).unwrap(), BigUint::from(4u32));
        assert_eq!(lambda(4096, &n).unwrap(), 4.0);
    }

    #[test]
    fn lambda_rounds_half_up() {
        // 10^3 / (4 * 100) = 2.5 -> 3
        assert_eq!(
            exact_lambda(10, &BigUint::from(100u32)).unwrap(),
            BigUint::from(3u32)
        );
        // 10^3 / (4 * 101) = 2.475... -> 2
        assert_eq!(
            exact_lambda(10, &BigUint::from(101u32)).unwrap(),
            BigUint::from(2u32)
        );
        // 10^3 / (4 * 99) = 2.525... -> 3
        assert_eq!(
            exact_lambda(10, &BigUint::from(99u32)).unwrap(),
            BigUint::from(3u32)
        );
    }

    #[test]
    fn lambda_is_exact_for_huge_ranges() {
        let n = BigUint::one() << 100u32;
        let n_birthdays = 1usize << 20;
        // (2^20)^3 / 2^102 < 1 -> 0
        assert!(exact_lambda(n_birthdays, &n).unwrap().is_zero());
        // (2^20)^3 / 2^42 = 2^18 exactly
        let n = BigUint::one() << 40u32;
        assert_eq!(
            exact_lambda(n_birthdays, &n).unwrap(),
            BigUint::one() << 18u32
        );
    }

    #[test]
    fn lambda_rejects_zero_mean() {
        let n = BigUint::one() << 32u32;
        assert!(matches!(
            lambda(2, &n),
            Err(BirthdayError::ZeroLambda { n_birthdays: 2, .. })
        ));
    }

    #[test]
    fn lambda_rejects_empty_range() {
        assert!(matches!(
            exact_lambda(4096, &BigUint::zero()),
            Err(BirthdayError::EmptyRange)
        ));
    }

    #[test]
    fn tail_and_head_cover_distribution() {
        let dist = distribution(4.0).unwrap();
        assert_eq!(tail_probability(&dist, 0), 1.0);
        for k in 1..15 {
            let total = head_probability(&dist, k - 1) + tail_probability(&dist, k);
            assert!((total - 1.0).abs() < 1e-10, "k={k}: {total}");
        }
        let p0 = probability(&dist, 0);
        assert!((p0 - (-4.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn distribution_rejects_non_positive_mean() {
        assert!(matches!(
            distribution(0.0),
            Err(BirthdayError::Statistics(_))
        ));
    }
}
