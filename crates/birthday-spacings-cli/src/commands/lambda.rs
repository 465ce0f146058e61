use birthday_spacings::poisson;

use super::CommandResult;

/// Expected frequencies below this are not worth listing.
const MIN_LISTED: f64 = 0.05;

pub fn run(bits: u32, birthdays: usize, observations: usize) -> CommandResult {
    let rows = expected_table(bits, birthdays, observations)?;
    let lambda = poisson::lambda(birthdays, &super::year_of(bits))?;
    println!("{birthdays} birthdays in [0, 2^{bits}): lambda = {lambda}\n");
    println!("  {:<6} {:>12} {:>12}", "dups", "P(X=k)", "expected");
    println!("  {}", "-".repeat(32));
    for (k, p, expected) in rows {
        println!("  {k:<6} {p:>12.6} {expected:>12.2}");
    }
    Ok(())
}

/// `(k, P(X = k), P(X = k) * observations)` around lambda, from the first `k`
/// where the expected frequency of `X <= k` reaches [`MIN_LISTED`] to the last
/// one past lambda before the expected frequency of the remaining tail drops
/// below it.
pub fn expected_table(
    bits: u32,
    birthdays: usize,
    observations: usize,
) -> Result<Vec<(usize, f64, f64)>, Box<dyn std::error::Error>> {
    let lambda = poisson::lambda(birthdays, &super::year_of(bits))?;
    let dist = poisson::distribution(lambda)?;
    let total = observations as f64;
    // bisect for the first k whose head is worth listing
    let head_listed = |k: usize| poisson::head_probability(&dist, k) * total >= MIN_LISTED;
    let (mut lo, mut hi) = (0usize, lambda.ceil() as usize);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if head_listed(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    let mut rows = Vec::new();
    let mut k = lo;
    while (k as f64) <= lambda || poisson::tail_probability(&dist, k) * total >= MIN_LISTED {
        let p = poisson::probability(&dist, k);
        rows.push((k, p, p * total));
        k += 1;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_for_paper_parameters() {
        let rows = expected_table(32, 4096, 5000).unwrap();
        assert_eq!(rows[0].0, 0);
        // P(X=0) = e^-4
        assert!((rows[0].1 - (-4.0f64).exp()).abs() < 1e-12);
        // the mode of Poisson(4) sits at 3 and 4
        let (_, p3, _) = rows[3];
        let (_, p4, _) = rows[4];
        assert!((p3 - p4).abs() < 1e-12);
        assert!(rows.len() > 10);
    }

    #[test]
    fn table_skips_negligible_head_for_large_lambda() {
        // 16384^3 / (4 * 2^20) = 2^20
        let rows = expected_table(20, 16384, 5000).unwrap();
        let lambda = (1usize << 20) as f64;
        assert!(rows.len() < 10_000, "{} rows", rows.len());
        assert!(rows[0].0 > 1_000_000, "starts at {}", rows[0].0);
        assert!(rows.iter().any(|&(k, _, _)| k as f64 == lambda));
        assert!(rows.windows(2).all(|w| w[1].0 == w[0].0 + 1));
    }

    #[test]
    fn table_rejects_zero_lambda() {
        assert!(expected_table(32, 2, 100).is_err());
    }
}
