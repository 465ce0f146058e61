//! Birthday generators.
//!
//! A [`Generator`] is the only capability the test needs from a random-number
//! source: one arbitrary-precision integer in `[0, n)` per call. The test never
//! looks inside the source, so anything from a hardware device to a replayed
//! fixture can be plugged in.
//!
//! Two reference implementations ship with the crate:
//! - [`Lcg`]: a linear congruential generator, the classic example of a source
//!   that fails birthday spacings.
//! - [`UniformRng`]: uniform draws from any [`rand::RngCore`].

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;

use crate::error::{BirthdayError, GeneratorError};

/// Source of birthdays.
///
/// Implementations must return values in `[0, n)` for the range bound the test
/// was built with; the test rejects anything outside it.
pub trait Generator {
    /// Draw the next birthday.
    fn draw(&mut self) -> Result<BigUint, GeneratorError>;
}

impl<G: Generator + ?Sized> Generator for &mut G {
    fn draw(&mut self) -> Result<BigUint, GeneratorError> {
        (**self).draw()
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn draw(&mut self) -> Result<BigUint, GeneratorError> {
        (**self).draw()
    }
}

/// Generator backed by a closure. Built with [`from_fn`].
#[derive(Debug, Clone)]
pub struct FromFn<F>(F);

/// Turn a closure into a [`Generator`].
///
/// ```
/// use birthday_spacings::{Generator, from_fn};
/// use num_bigint::BigUint;
///
/// let mut next = 0u32;
/// let mut counter = from_fn(move || {
///     next = next.wrapping_add(7);
///     Ok(BigUint::from(next))
/// });
/// assert_eq!(counter.draw().unwrap(), BigUint::from(7u32));
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut() -> Result<BigUint, GeneratorError>,
{
    FromFn(f)
}

impl<F> Generator for FromFn<F>
where
    F: FnMut() -> Result<BigUint, GeneratorError>,
{
    fn draw(&mut self) -> Result<BigUint, GeneratorError> {
        (self.0)()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Linear congruential generator
// ═══════════════════════════════════════════════════════════════════════════════

/// Linear congruential generator `x(k) = a * x(k-1) + c mod m`.
///
/// Each draw advances the state and returns it, so the first value is
/// `a * seed + c mod m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    multiplier: BigUint,
    increment: BigUint,
    modulus: BigUint,
    state: BigUint,
}

impl Lcg {
    /// Multiplier of the Microsoft C runtime `rand()`.
    pub const MSVC_MULTIPLIER: u64 = 214_013;
    /// Increment of the Microsoft C runtime `rand()`.
    pub const MSVC_INCREMENT: u64 = 2_531_011;

    /// Build an LCG with explicit parameters. Fails if `modulus` is zero.
    pub fn new(
        multiplier: BigUint,
        increment: BigUint,
        modulus: BigUint,
        seed: BigUint,
    ) -> Result<Self, BirthdayError> {
        if modulus.is_zero() {
            return Err(BirthdayError::EmptyRange);
        }
        let state = seed % &modulus;
        Ok(Self {
            multiplier,
            increment,
            modulus,
            state,
        })
    }

    /// The full-state MSVC generator modulo `2^32`, whose outputs cover `[0, 2^32)`.
    pub fn msvc(seed: u64) -> Self {
        let modulus = BigUint::one() << 32u32;
        Self {
            multiplier: BigUint::from(Self::MSVC_MULTIPLIER),
            increment: BigUint::from(Self::MSVC_INCREMENT),
            state: BigUint::from(seed) % &modulus,
            modulus,
        }
    }

    /// Exclusive upper bound of the values this generator produces.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Advance the state and return it.
    pub fn next_value(&mut self) -> BigUint {
        self.state = (&self.state * &self.multiplier + &self.increment) % &self.modulus;
        self.state.clone()
    }
}

impl Generator for Lcg {
    fn draw(&mut self) -> Result<BigUint, GeneratorError> {
        Ok(self.next_value())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Uniform adapter over `rand`
// ═══════════════════════════════════════════════════════════════════════════════

/// Uniform birthdays in `[0, bound)` drawn from any [`RngCore`].
///
/// Values are built from the fewest random bytes that cover `bound - 1`, with
/// the surplus high bits masked off; draws at or above `bound` are rejected and
/// redrawn, so every value in range is equally likely.
#[derive(Debug, Clone)]
pub struct UniformRng<R> {
    rng: R,
    bound: BigUint,
    bytes: usize,
    top_mask: u8,
}

impl<R: RngCore> UniformRng<R> {
    /// Fails if `bound` is zero.
    pub fn new(rng: R, bound: BigUint) -> Result<Self, BirthdayError> {
        if bound.is_zero() {
            return Err(BirthdayError::EmptyRange);
        }
        let bits = (&bound - 1u32).bits();
        let bytes = bits.div_ceil(8) as usize;
        let top_mask = match bits % 8 {
            0 => u8::MAX,
            rem => (1u8 << rem) - 1,
        };
        Ok(Self {
            rng,
            bound,
            bytes,
            top_mask,
        })
    }

    /// Exclusive upper bound of the values this generator produces.
    pub fn bound(&self) -> &BigUint {
        &self.bound
    }

    /// Consume the adapter and return the wrapped RNG.
    pub fn into_inner(self) -> R {
        self.rng
    }

    fn sample(&mut self) -> BigUint {
        if self.bytes == 0 {
            return BigUint::zero();
        }
        let mut buf = vec![0u8; self.bytes];
        loop {
            self.rng.fill_bytes(&mut buf);
            if let Some(top) = buf.last_mut() {
                *top &= self.top_mask;
            }
            let value = BigUint::from_bytes_le(&buf);
            if value < self.bound {
                return value;
            }
        }
    }
}

impl<R: RngCore> Generator for UniformRng<R> {
    fn draw(&mut self) -> Result<BigUint, GeneratorError> {
        Ok(self.sample())
    }
}
