//! Fiat-Shamir transformation for composed [`Statement`]s.
//!
//! This module defines [`Nizk`], which turns the interactive protocol of a
//! statement into a non-interactive one by deriving the challenge from a
//! codec over, in order and each length-prefixed:
//! - the session identifier,
//! - the statement hash,
//! - the statement identifier including precommitments and constructed statements,
//! - the commitment,
//! - the message the proof is bound to.
//!
//! # Usage
//! This struct is generic over:
//! - `G`: the group of the statement,
//! - `C`: the codec used for Fiat-Shamir ([`ShakeCodec`] by default).

use core::marker::PhantomData;

use group::prime::PrimeGroup;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::instrument;

use crate::challenge::Challenge;
use crate::codec::{Codec, ShakeCodec};
use crate::composition::{Commitment, Statement};
use crate::errors::{into_verdict, Error};
use crate::expression::SecretValues;
use crate::interactive::{Prover, Verifier};
use crate::proof_id::StatementHash;
use crate::transcript::NITranscript;

/// Session identifier used by [`Statement::prove`] and [`Statement::verify`].
pub const DEFAULT_SESSION_ID: &[u8] = b"sigma-compose/default-session";

/// Domain separator keying the codec.
const PROTOCOL_DOMAIN: &[u8] = b"sigma-compose/fiat-shamir/v1";

/// A Fiat-Shamir transformation of a [`Statement`] into a non-interactive proof.
///
/// # Type Parameters
/// - `G`: the group of the statement.
/// - `C`: the codec used for Fiat-Shamir.
#[derive(Debug)]
pub struct Nizk<G: PrimeGroup, C: Codec = ShakeCodec> {
    pub session_id: Vec<u8>,
    /// The statement being proven.
    pub statement: Statement<G>,
    _codec: PhantomData<C>,
}

impl<G: PrimeGroup, C: Codec> Nizk<G, C> {
    /// Constructs a new [`Nizk`] instance.
    ///
    /// # Parameters
    /// - `session_identifier`: Domain separation for this application or session.
    /// - `statement`: The statement to prove.
    pub fn new(session_identifier: &[u8], statement: Statement<G>) -> Self {
        Self {
            session_id: session_identifier.to_vec(),
            statement,
            _codec: PhantomData,
        }
    }

    /// Generates a non-interactive proof bound to `message`.
    ///
    /// # Errors
    /// The proving errors of the statement: missing values, no provable Or
    /// branch, or a precommitment refusing the values.
    #[instrument(skip_all, fields(session = %String::from_utf8_lossy(&self.session_id)))]
    pub fn prove(
        &self,
        values: &SecretValues<G::Scalar>,
        message: &[u8],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<NITranscript<G>, Error> {
        let mut prover = Prover::new(&self.statement, values)?;
        let precommitment = prover.precommit(rng)?;
        let (statement_hash, commitment) = prover.commit(rng)?;
        let challenge =
            self.derive_challenge(&statement_hash, prover.statement(), &commitment, message);
        let responses = prover.compute_response(challenge)?;
        Ok(NITranscript {
            challenge,
            responses,
            precommitment,
            statement_hash,
        })
    }

    /// Verifies a transcript against `message`.
    ///
    /// # Returns
    /// - `Ok(true)` if the proof is valid.
    /// - `Ok(false)` if the proof is for another statement, a precommitment
    ///   fails validation, or the recomputed challenge differs.
    ///
    /// # Errors
    /// [`Error::InconsistentResponse`] for a transcript answering the same
    /// secret differently; construction errors of the statement.
    #[instrument(skip_all, fields(session = %String::from_utf8_lossy(&self.session_id)))]
    pub fn verify(&self, transcript: &NITranscript<G>, message: &[u8]) -> Result<bool, Error> {
        let mut verifier = Verifier::new(&self.statement)?;
        into_verdict(self.check(&mut verifier, transcript, message))
    }

    /// [`prove`](Self::prove) followed by [`NITranscript::to_bytes`].
    pub fn prove_bytes(
        &self,
        values: &SecretValues<G::Scalar>,
        message: &[u8],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<u8>, Error> {
        Ok(self.prove(values, message, rng)?.to_bytes())
    }

    /// [`NITranscript::from_bytes`] followed by [`verify`](Self::verify).
    pub fn verify_bytes(&self, proof: &[u8], message: &[u8]) -> Result<bool, Error> {
        let transcript = match NITranscript::from_bytes(proof) {
            Ok(transcript) => transcript,
            Err(err) if err.is_rejection() => return into_verdict(Err(err)),
            Err(err) => return Err(err),
        };
        self.verify(&transcript, message)
    }

    fn check(
        &self,
        verifier: &mut Verifier<G>,
        transcript: &NITranscript<G>,
        message: &[u8],
    ) -> Result<(), Error> {
        verifier.check_statement_hash(&transcript.statement_hash)?;
        verifier.process_precommitment(&transcript.precommitment)?;
        let statement = verifier.statement();
        statement.validate_precommitments()?;
        let commitment =
            statement.recompute_commitment(&transcript.challenge, &transcript.responses)?;
        let challenge =
            self.derive_challenge(&transcript.statement_hash, statement, &commitment, message);
        if !bool::from(challenge.ct_eq(&transcript.challenge)) {
            return Err(Error::VerificationFailure);
        }
        statement.check_responses_consistency(&transcript.responses, &mut SecretValues::new())
    }

    fn derive_challenge(
        &self,
        statement_hash: &StatementHash,
        statement: &Statement<G>,
        commitment: &Commitment<G>,
        message: &[u8],
    ) -> Challenge {
        let mut codec = C::new(PROTOCOL_DOMAIN);
        codec.prover_message(&self.session_id);
        codec.prover_message(statement_hash);
        codec.prover_message(statement.proof_id().as_bytes());
        codec.prover_message(&commitment.to_bytes());
        codec.prover_message(message);
        codec.verifier_challenge()
    }
}
