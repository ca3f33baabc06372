//! Fiat–Shamir codecs: domain-separated transcripts producing [`Challenge`]s.

use sha3::{Digest, Sha3_256};

use crate::challenge::{Challenge, CHALLENGE_BYTES};
use crate::duplex_sponge::{DuplexSpongeInterface, ShakeDuplexSponge};
use crate::group::serialization::write_len_prefixed;

/// A domain-separated hashing codec, typically used by [`crate::fiat_shamir::Nizk`].
///
/// The codec is identified by a domain and absorbs successive prover messages;
/// the challenge it outputs is a deterministic function of the domain and of
/// all messages, so prover and verifier derive the same one.
pub trait Codec {
    /// Generates an empty codec identified by a domain separator.
    fn new(domain_sep: &[u8]) -> Self;

    /// Absorbs a prover message.
    fn prover_message(&mut self, data: &[u8]);

    /// Derives the challenge from everything absorbed so far.
    fn verifier_challenge(&mut self) -> Challenge;
}

/// A codec over any duplex sponge.
///
/// The sponge is keyed with `SHA3-256(domain_sep)`; messages are absorbed
/// length-prefixed; the challenge is 16 squeezed bytes read big-endian.
#[derive(Clone, Debug)]
pub struct ByteChallengeCodec<H: DuplexSpongeInterface> {
    hasher: H,
}

impl<H: DuplexSpongeInterface> Codec for ByteChallengeCodec<H> {
    fn new(domain_sep: &[u8]) -> Self {
        let mut iv = [0u8; 32];
        iv.copy_from_slice(&Sha3_256::digest(domain_sep));
        Self { hasher: H::new(iv) }
    }

    fn prover_message(&mut self, data: &[u8]) {
        let mut framed = Vec::with_capacity(data.len() + 4);
        write_len_prefixed(&mut framed, data);
        self.hasher.absorb(&framed);
    }

    fn verifier_challenge(&mut self) -> Challenge {
        let mut bytes = [0u8; CHALLENGE_BYTES];
        bytes.copy_from_slice(&self.hasher.squeeze(CHALLENGE_BYTES));
        Challenge::from_bytes(bytes)
    }
}

/// SHAKE128-based codec, the default of [`crate::fiat_shamir::Nizk`].
pub type ShakeCodec = ByteChallengeCodec<ShakeDuplexSponge>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_framing_is_unambiguous() {
        let mut split = ShakeCodec::new(b"domain");
        split.prover_message(b"ab");
        split.prover_message(b"c");

        let mut joined = ShakeCodec::new(b"domain");
        joined.prover_message(b"a");
        joined.prover_message(b"bc");

        assert_ne!(split.verifier_challenge(), joined.verifier_challenge());
    }
}
