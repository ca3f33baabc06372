//! SHAKE128-based duplex sponge.

use sha3::digest::{ExtendableOutput, Update};
use sha3::Shake128;

use crate::duplex_sponge::DuplexSpongeInterface;

/// SHAKE128 rate in bytes.
const RATE: usize = 168;

/// Duplex sponge construction using SHAKE128.
///
/// The initialization vector fills the first block; squeezing reads the XOF
/// of the absorbed input and absorbs the squeezed bytes back, so consecutive
/// squeezes differ.
#[derive(Clone, Debug)]
pub struct ShakeDuplexSponge(Shake128);

impl DuplexSpongeInterface for ShakeDuplexSponge {
    fn new(iv: [u8; 32]) -> Self {
        let mut hasher = Shake128::default();
        let mut initial_block = [0u8; RATE];
        initial_block[..iv.len()].copy_from_slice(&iv);
        hasher.update(&initial_block);
        Self(hasher)
    }

    fn absorb(&mut self, input: &[u8]) {
        self.0.update(input);
    }

    fn squeeze(&mut self, length: usize) -> Vec<u8> {
        let mut output = vec![0u8; length];
        self.0.clone().finalize_xof_into(&mut output);
        self.0.update(&output);
        output
    }
}
