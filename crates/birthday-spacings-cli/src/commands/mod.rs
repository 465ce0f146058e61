pub mod lambda;
pub mod run;

use birthday_spacings::{BinPolicy, BirthdayError, Generator, Lcg, UniformRng};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Result type shared by all subcommands.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Seed used by `--generator lcg` when none is given.
pub const DEFAULT_LCG_SEED: u64 = 1;
/// Seed used by `--generator seeded` when none is given.
pub const DEFAULT_RNG_SEED: u64 = 1234;

/// `2^bits`, the exclusive upper bound of the birthday range.
pub fn year_of(bits: u32) -> BigUint {
    BigUint::from(1u32) << bits
}

/// Parse a binning mode string into the policy.
pub fn parse_bin_policy(s: &str, min_expected: f64) -> BinPolicy {
    match s {
        "merge-tail" | "merge_tail" | "merge" => BinPolicy::MergeTail { min_expected },
        "inclusive" => BinPolicy::Inclusive,
        "exclude-max" | "exclude_max" | "legacy" => BinPolicy::ExcludeMax,
        _ => {
            log::warn!("Unknown bin policy '{s}', using merge-tail");
            BinPolicy::MergeTail { min_expected }
        }
    }
}

/// Build one of the reference generators over `[0, 2^bits)`.
pub fn make_generator(
    name: &str,
    seed: Option<u64>,
    bits: u32,
) -> Result<Box<dyn Generator>, BirthdayError> {
    let n = year_of(bits);
    match name {
        "lcg" => Ok(Box::new(Lcg::new(
            BigUint::from(Lcg::MSVC_MULTIPLIER),
            BigUint::from(Lcg::MSVC_INCREMENT),
            n,
            BigUint::from(seed.unwrap_or(DEFAULT_LCG_SEED)),
        )?)),
        "os" => {
            if seed.is_some() {
                log::warn!("--seed is ignored by the os generator");
            }
            Ok(Box::new(UniformRng::new(StdRng::from_os_rng(), n)?))
        }
        _ => {
            if name != "seeded" {
                log::warn!("Unknown generator '{name}', using seeded");
            }
            let rng = StdRng::seed_from_u64(seed.unwrap_or(DEFAULT_RNG_SEED));
            Ok(Box::new(UniformRng::new(rng, n)?))
        }
    }
}
