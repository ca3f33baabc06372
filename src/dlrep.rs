//! Implementation of the leaf statement: knowledge of a discrete-log representation.
//!
//! A [`DLRep`] claims knowledge of values for the secrets of an [`Expression`]
//! such that `lhs = Σ xᵢ·Bᵢ`. The Schnorr-style protocol for it:
//! - commitment `R = Σ kᵢ·Bᵢ` with one randomizer per distinct secret,
//! - responses `rᵢ = kᵢ + c·xᵢ`, one per term,
//! - verification recomputes `R = Σ rᵢ·Bᵢ − c·lhs`.

use ff::Field;
use group::prime::PrimeGroup;
use rand::{CryptoRng, RngCore};

use crate::challenge::Challenge;
use crate::errors::Error;
use crate::expression::{Expression, Secret, SecretValues};
use crate::group::msm;

/// Statement `lhs = expr`.
#[derive(Clone, Debug)]
pub struct DLRep<G: PrimeGroup> {
    lhs: G,
    expr: Expression<G>,
}

impl<G: PrimeGroup> DLRep<G> {
    /// # Errors
    /// [`Error::InvalidExpression`] if `expr` has no terms.
    pub fn new(lhs: G, expr: Expression<G>) -> Result<Self, Error> {
        if expr.is_empty() {
            return Err(Error::InvalidExpression(
                "a DLRep needs at least one term".into(),
            ));
        }
        Ok(Self { lhs, expr })
    }

    pub fn lhs(&self) -> &G {
        &self.lhs
    }

    pub fn expr(&self) -> &Expression<G> {
        &self.expr
    }

    /// Whether every secret of the expression has a value in `values` (or carries one).
    pub(crate) fn has_values(&self, values: &SecretValues<G::Scalar>) -> bool {
        self.expr
            .terms()
            .iter()
            .all(|term| term.secret.value_in(values).is_ok())
    }

    /// Whether the relation holds for the given values.
    pub fn is_satisfied(&self, values: &SecretValues<G::Scalar>) -> bool {
        matches!(self.expr.eval_with(values), Ok(point) if point == self.lhs)
    }

    fn lookup(
        &self,
        map: &SecretValues<G::Scalar>,
    ) -> Result<Vec<G::Scalar>, Error> {
        self.expr
            .terms()
            .iter()
            .map(|term| {
                map.get(&term.secret)
                    .copied()
                    .ok_or_else(|| Error::incomplete(term.secret.name()))
            })
            .collect()
    }

    fn bases(&self) -> Vec<G> {
        self.expr.bases().copied().collect()
    }

    /// Commitment `Σ k[sᵢ]·Bᵢ`.
    pub(crate) fn commit(&self, randomizers: &SecretValues<G::Scalar>) -> Result<G, Error> {
        Ok(msm(&self.lookup(randomizers)?, &self.bases()))
    }

    /// Responses `k[sᵢ] + c·xᵢ`, one per term.
    pub(crate) fn respond(
        &self,
        randomizers: &SecretValues<G::Scalar>,
        values: &SecretValues<G::Scalar>,
        challenge: &Challenge,
    ) -> Result<Vec<G::Scalar>, Error> {
        let c: G::Scalar = challenge.to_scalar();
        let nonces = self.lookup(randomizers)?;
        self.expr
            .terms()
            .iter()
            .zip(nonces)
            .map(|(term, k)| Ok(k + c * term.secret.value_in(values)?))
            .collect()
    }

    /// Recomputes the commitment `Σ rᵢ·Bᵢ − c·lhs` from the responses.
    pub(crate) fn recompute_commitment(
        &self,
        challenge: &Challenge,
        responses: &[G::Scalar],
    ) -> Result<G, Error> {
        if responses.len() != self.expr.len() {
            return Err(Error::StatementMismatch);
        }
        let c: G::Scalar = challenge.to_scalar();
        Ok(msm(responses, &self.bases()) - self.lhs * c)
    }

    /// Checks that every occurrence of a secret got the same response.
    pub(crate) fn check_responses_consistency(
        &self,
        responses: &[G::Scalar],
        seen: &mut SecretValues<G::Scalar>,
    ) -> Result<(), Error> {
        if responses.len() != self.expr.len() {
            return Err(Error::StatementMismatch);
        }
        for (term, response) in self.expr.terms().iter().zip(responses) {
            match seen.get(&term.secret) {
                Some(previous) if previous != response => {
                    return Err(Error::InconsistentResponse {
                        name: term.secret.name().to_owned(),
                    })
                }
                Some(_) => {}
                None => {
                    seen.insert(term.secret.clone(), *response);
                }
            }
        }
        Ok(())
    }

    /// Simulates a transcript under `challenge`. Responses already present in
    /// `responses` are reused, missing ones are drawn at random and recorded.
    pub(crate) fn simulate(
        &self,
        challenge: &Challenge,
        responses: &mut SecretValues<G::Scalar>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> (G, Vec<G::Scalar>) {
        let scalars: Vec<G::Scalar> = self
            .expr
            .terms()
            .iter()
            .map(|term| {
                *responses
                    .entry(term.secret.clone())
                    .or_insert_with(|| G::Scalar::random(&mut *rng))
            })
            .collect();
        let c: G::Scalar = challenge.to_scalar();
        let commitment = msm(&scalars, &self.bases()) - self.lhs * c;
        (commitment, scalars)
    }

    /// The secrets of each term, in order, repetitions included.
    pub(crate) fn term_secrets(&self) -> impl Iterator<Item = &Secret<G::Scalar>> {
        self.expr.terms().iter().map(|term| &term.secret)
    }
}
