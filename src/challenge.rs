//! Challenges of the composed protocols.
//!
//! Challenges live in `ℤ_{2^128}`, independently of the scalar field of the
//! group: Or statements split the verifier challenge by wrapping subtraction
//! in this ring, and leaves embed it into their scalar field when responding.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use ff::PrimeField;
use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};

/// Bit length of a challenge.
pub const CHALLENGE_BITS: usize = 128;

/// Byte length of an encoded challenge.
pub const CHALLENGE_BYTES: usize = CHALLENGE_BITS / 8;

/// A verifier challenge, an integer modulo `2^128`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Challenge(u128);

impl Challenge {
    /// The zero challenge.
    pub const ZERO: Self = Self(0);

    /// Creates a challenge from its integer value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Samples a uniform challenge.
    pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        let mut bytes = [0u8; CHALLENGE_BYTES];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Big-endian decoding.
    pub fn from_bytes(bytes: [u8; CHALLENGE_BYTES]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }

    /// Big-endian encoding.
    pub fn to_bytes(&self) -> [u8; CHALLENGE_BYTES] {
        self.0.to_be_bytes()
    }

    /// The integer value of the challenge.
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Embeds the challenge into a scalar field as `hi·2^64 + lo`.
    ///
    /// Every prime field used with this crate is larger than `2^128`, so the
    /// embedding is injective.
    pub fn to_scalar<F: PrimeField>(&self) -> F {
        let hi = F::from((self.0 >> 64) as u64);
        let lo = F::from(self.0 as u64);
        let shift = F::from(u64::MAX) + F::ONE;
        hi * shift + lo
    }
}

impl From<u128> for Challenge {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl Add for Challenge {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Challenge {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl AddAssign for Challenge {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Challenge {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Challenge {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Challenge> for Challenge {
    fn sum<I: Iterator<Item = &'a Challenge>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl ConstantTimeEq for Challenge {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.to_bytes()[..].ct_eq(&other.to_bytes()[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::scalar::Scalar;

    #[test]
    fn arithmetic_wraps_modulo_two_to_the_128() {
        let max = Challenge::new(u128::MAX);
        assert_eq!(max + Challenge::new(1), Challenge::ZERO);
        assert_eq!(Challenge::ZERO - Challenge::new(1), max);

        let parts = [Challenge::new(u128::MAX - 3), Challenge::new(10), Challenge::new(7)];
        let total: Challenge = parts.iter().sum();
        assert_eq!(total, Challenge::new(13));
    }

    #[test]
    fn scalar_embedding_matches_integer_value() {
        let c = Challenge::new((5u128 << 64) + 9);
        let expected = Scalar::from(5u64) * (Scalar::from(u64::MAX) + Scalar::ONE) + Scalar::from(9u64);
        assert_eq!(c.to_scalar::<Scalar>(), expected);
        assert_eq!(Challenge::from_bytes(c.to_bytes()), c);
    }
}
