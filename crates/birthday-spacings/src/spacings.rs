//! Per-trial spacing arithmetic.

use num_bigint::BigUint;

/// Sort `birthdays` in place and return the sorted consecutive differences.
///
/// A sample of `m` birthdays yields `m - 1` spacings; fewer than two birthdays
/// yield none.
pub fn sorted_spacings(birthdays: &mut [BigUint]) -> Vec<BigUint> {
    birthdays.sort_unstable();
    let mut spacings: Vec<BigUint> = birthdays.windows(2).map(|w| &w[1] - &w[0]).collect();
    spacings.sort_unstable();
    spacings
}

/// Count the distinct values that occur more than once in an ascending slice.
///
/// A run of `k >= 2` equal values counts once, so `[1, 1, 1, 2, 3, 3]` has two
/// duplicates.
pub fn count_duplicates<T: PartialEq>(sorted: &[T]) -> usize {
    let (duplicates, _) = sorted
        .windows(2)
        .fold((0usize, false), |(count, in_run), w| match (w[0] == w[1], in_run) {
            (true, false) => (count + 1, true),
            (true, true) => (count, true),
            (false, _) => (count, false),
        });
    duplicates
}

/// Duplicate spacing count of one trial's sample.
pub fn duplicate_spacings(birthdays: &mut [BigUint]) -> usize {
    count_duplicates(&sorted_spacings(birthdays))
}
