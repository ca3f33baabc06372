//! Duplex Sponge Interface
//!
//! This module defines the [`DuplexSpongeInterface`] trait, the hash
//! primitive behind the Fiat–Shamir challenges of [`crate::codec`].

pub mod shake;

pub use shake::ShakeDuplexSponge;

/// A duplex sponge: absorbs input and squeezes output, any number of times.
pub trait DuplexSpongeInterface {
    /// Creates a sponge keyed by a 32-byte initialization vector.
    fn new(iv: [u8; 32]) -> Self;

    /// Absorbs input data into the sponge state.
    fn absorb(&mut self, input: &[u8]);

    /// Squeezes `length` bytes. Later squeezes depend on earlier ones.
    fn squeeze(&mut self, length: usize) -> Vec<u8>;
}
