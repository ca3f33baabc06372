//! Interactive execution of a statement's Sigma protocol.
//!
//! ```text
//! prover.precommit()      ──▶ precommitment ──▶ verifier.process_precommitment()
//! prover.commit()         ──▶ (hash, commitment) ──▶ verifier.send_challenge()
//!                         ◀── challenge ◀──
//! prover.compute_response() ──▶ response ──▶ verifier.verify()
//! ```
//!
//! Both parties work on a private copy of the statement, on which the Or
//! branch choices and the precommitments of extended statements are cached.

use core::fmt;

use ff::Field;
use group::prime::PrimeGroup;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::instrument;

use crate::challenge::Challenge;
use crate::composition::{Commitment, ProverState, Response, Statement};
use crate::errors::{into_verdict, Error};
use crate::expression::SecretValues;
use crate::extended::Precommitment;
use crate::proof_id::StatementHash;

/// Prover side of the interactive protocol.
pub struct Prover<G: PrimeGroup> {
    statement: Statement<G>,
    statement_hash: StatementHash,
    values: SecretValues<G::Scalar>,
    precommitment: Option<Precommitment<G>>,
    randomizers: SecretValues<G::Scalar>,
    state: Option<ProverState<G::Scalar>>,
}

impl<G: PrimeGroup> fmt::Debug for Prover<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prover")
            .field("statement", &self.statement)
            .field("precommitted", &self.precommitment.is_some())
            .field("committed", &self.state.is_some())
            .finish_non_exhaustive()
    }
}

impl<G: PrimeGroup> Prover<G> {
    pub(crate) fn new(
        statement: &Statement<G>,
        values: &SecretValues<G::Scalar>,
    ) -> Result<Self, Error> {
        statement.validate()?;
        if statement.is_simulated() {
            return Err(Error::NoLiveBranch);
        }
        let mut merged = statement.carried_values();
        merged.extend(values.iter().map(|(secret, value)| (secret.clone(), *value)));
        Ok(Self {
            statement: statement.clone(),
            statement_hash: statement.statement_hash(),
            values: merged,
            precommitment: None,
            randomizers: SecretValues::new(),
            state: None,
        })
    }

    /// The prover's copy of the statement, with precommitments once computed.
    pub fn statement(&self) -> &Statement<G> {
        &self.statement
    }

    pub fn statement_hash(&self) -> &StatementHash {
        &self.statement_hash
    }

    /// Chooses the live branch of every Or and computes the precommitment.
    ///
    /// # Errors
    /// [`Error::IncompleteValues`], [`Error::NoLiveBranch`], or the error of
    /// an extended statement refusing to precommit.
    #[instrument(skip_all)]
    pub fn precommit(
        &mut self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Precommitment<G>, Error> {
        if self.precommitment.is_some() {
            return Err(Error::OutOfOrder("precommitment already computed"));
        }
        let precommitment = self.statement.prepare(&mut self.values, false, rng)?;
        self.precommitment = Some(precommitment.clone());
        Ok(precommitment)
    }

    /// Draws one randomizer per secret and commits. Precommits first if
    /// [`precommit`](Self::precommit) was not called.
    #[instrument(skip_all)]
    pub fn commit(
        &mut self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(StatementHash, Commitment<G>), Error> {
        if self.state.is_some() {
            return Err(Error::OutOfOrder("commitment already computed"));
        }
        if self.precommitment.is_none() {
            self.precommit(rng)?;
        }

        let mut secrets = Vec::new();
        self.statement.collect_secret_occurrences(true, &mut secrets);
        let mut randomizers = SecretValues::new();
        for secret in secrets {
            randomizers
                .entry(secret)
                .or_insert_with(|| G::Scalar::random(&mut *rng));
        }

        let (commitment, state) = self.statement.commit(&randomizers, rng)?;
        self.randomizers = randomizers;
        self.state = Some(state);
        Ok((self.statement_hash, commitment))
    }

    /// Responds to the verifier's challenge.
    #[instrument(skip_all)]
    pub fn compute_response(
        &mut self,
        challenge: Challenge,
    ) -> Result<Response<G::Scalar>, Error> {
        let state = self
            .state
            .take()
            .ok_or(Error::OutOfOrder("commitment not computed"))?;
        let response = self
            .statement
            .respond(state, challenge, &self.randomizers, &self.values);
        self.randomizers.clear();
        response
    }
}

/// Verifier side of the interactive protocol.
#[derive(Debug)]
pub struct Verifier<G: PrimeGroup> {
    statement: Statement<G>,
    statement_hash: StatementHash,
    precommitment_processed: bool,
    commitment: Option<Commitment<G>>,
    challenge: Option<Challenge>,
}

impl<G: PrimeGroup> Verifier<G> {
    pub(crate) fn new(statement: &Statement<G>) -> Result<Self, Error> {
        statement.validate()?;
        Ok(Self {
            statement: statement.clone(),
            statement_hash: statement.statement_hash(),
            precommitment_processed: false,
            commitment: None,
            challenge: None,
        })
    }

    /// The verifier's copy of the statement, with constructed statements once
    /// the precommitment is processed.
    pub fn statement(&self) -> &Statement<G> {
        &self.statement
    }

    pub fn statement_hash(&self) -> &StatementHash {
        &self.statement_hash
    }

    /// # Errors
    /// [`Error::StatementMismatch`] if `statement_hash` is not the hash of this
    /// verifier's statement.
    pub(crate) fn check_statement_hash(&self, statement_hash: &StatementHash) -> Result<(), Error> {
        if bool::from(statement_hash[..].ct_eq(&self.statement_hash[..])) {
            Ok(())
        } else {
            tracing::debug!("statement hash mismatch");
            Err(Error::StatementMismatch)
        }
    }

    /// Builds the constructed statements of the extended statements.
    ///
    /// # Errors
    /// [`Error::StatementMismatch`] if the precommitment does not have the
    /// shape of the statement.
    pub fn process_precommitment(&mut self, precommitment: &Precommitment<G>) -> Result<(), Error> {
        if self.precommitment_processed {
            return Err(Error::OutOfOrder("precommitment already processed"));
        }
        self.statement.process_precommitment(precommitment)?;
        self.precommitment_processed = true;
        Ok(())
    }

    /// Checks the statement hash, stores the commitment and samples the challenge.
    ///
    /// # Errors
    /// [`Error::StatementMismatch`] if the prover proves another statement;
    /// [`Error::OutOfOrder`] if the statement has extended statements and no
    /// precommitment was processed.
    #[instrument(skip_all)]
    pub fn send_challenge(
        &mut self,
        statement_hash: &StatementHash,
        commitment: Commitment<G>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Challenge, Error> {
        if self.challenge.is_some() {
            return Err(Error::OutOfOrder("challenge already sent"));
        }
        self.check_statement_hash(statement_hash)?;
        if !self.precommitment_processed {
            if self.statement.has_extended() {
                return Err(Error::OutOfOrder("precommitment not processed"));
            }
            self.precommitment_processed = true;
        }
        let challenge = Challenge::random(rng);
        self.commitment = Some(commitment);
        self.challenge = Some(challenge);
        Ok(challenge)
    }

    /// Verifies the response: validation hooks, commitment recomputation, then
    /// the response-consistency walk.
    ///
    /// # Returns
    /// `Ok(false)` for an ordinary rejection.
    ///
    /// # Errors
    /// [`Error::InconsistentResponse`] if a secret is answered differently;
    /// [`Error::OutOfOrder`] if no challenge was sent.
    #[instrument(skip_all)]
    pub fn verify(&mut self, response: &Response<G::Scalar>) -> Result<bool, Error> {
        let (commitment, challenge) = match (self.commitment.take(), self.challenge.take()) {
            (Some(commitment), Some(challenge)) => (commitment, challenge),
            _ => return Err(Error::OutOfOrder("challenge not sent")),
        };
        into_verdict(self.check(&commitment, &challenge, response))
    }

    fn check(
        &self,
        commitment: &Commitment<G>,
        challenge: &Challenge,
        response: &Response<G::Scalar>,
    ) -> Result<(), Error> {
        self.statement.validate_precommitments()?;
        let recomputed = self.statement.recompute_commitment(challenge, response)?;
        if recomputed != *commitment {
            return Err(Error::VerificationFailure);
        }
        self.statement
            .check_responses_consistency(response, &mut SecretValues::new())
    }
}
