//! Proof of knowledge of a BBS+ signature.
//!
//! Signatures are `(A, e, s)` with `A = (e + x)⁻¹·b` and
//! `b = g1 + s·h0 + Σ mᵢ·hᵢ`, verified by `e(A, w + e·g2) = e(b, g2)` for
//! the public key `w = x·g2`.
//!
//! To prove knowledge of a signature on committed messages, the prover
//! randomizes it (Camenisch, Drijvers, Lehmann 2016): for random `r1, r2`
//! and `r3 = r1⁻¹`, it publishes
//!
//! ```text
//! A' = r1·A        Ā = r1·b − e·A'        d = r1·b − r2·h0
//! ```
//!
//! and proves, with `s' = s − r2·r3`,
//!
//! ```text
//! d − Ā = e·A' − r2·h0
//! −g1   = −r3·d + s'·h0 + Σ mᵢ·hᵢ
//! ```
//!
//! The verifier also checks `A' ≠ 0` and `e(A', w) = e(Ā, g2)`.

use core::fmt;
use std::sync::Arc;

use ff::Field;
use group::{Curve, Group, GroupEncoding};
use pairing::Engine;
use rand::{CryptoRng, RngCore};
use rand_core::CryptoRngCore;
use tracing::instrument;

use crate::composition::Statement;
use crate::errors::Error;
use crate::expression::{Expression, Secret, SecretValues};
use crate::extended::{ExtendedStatement, Precommitted};
use crate::group::msm;

/// Public parameters for signing `h.len()` messages.
#[derive(Clone, Debug)]
pub struct SignatureParams<E: Engine> {
    pub g1: E::G1,
    pub g2: E::G2,
    pub h0: E::G1,
    pub h: Vec<E::G1>,
}

impl<E: Engine> SignatureParams<E> {
    /// Samples random parameters for `message_count` messages.
    pub fn generate(rng: &mut (impl RngCore + CryptoRng), message_count: usize) -> Self {
        Self {
            g1: E::G1::random(&mut *rng),
            g2: E::G2::random(&mut *rng),
            h0: E::G1::random(&mut *rng),
            h: (0..message_count).map(|_| E::G1::random(&mut *rng)).collect(),
        }
    }

    pub fn message_count(&self) -> usize {
        self.h.len()
    }

    /// `b = g1 + s·h0 + Σ mᵢ·hᵢ`.
    fn b(&self, messages: &[E::Fr], s: E::Fr) -> Result<E::G1, Error> {
        if messages.len() != self.h.len() {
            return Err(Error::InvalidWitness(format!(
                "expected {} messages, got {}",
                self.h.len(),
                messages.len()
            )));
        }
        Ok(self.g1 + self.h0 * s + msm(messages, &self.h))
    }
}

/// Signing key `x` and public key `w = x·g2`.
#[derive(Clone)]
pub struct KeyPair<E: Engine> {
    pub secret: E::Fr,
    pub public: E::G2,
}

impl<E: Engine> KeyPair<E> {
    pub fn generate(rng: &mut (impl RngCore + CryptoRng), params: &SignatureParams<E>) -> Self {
        let secret = E::Fr::random(&mut *rng);
        Self {
            secret,
            public: params.g2 * secret,
        }
    }
}

impl<E: Engine> fmt::Debug for KeyPair<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// A BBS+ signature `(A, e, s)`.
#[derive(Clone)]
pub struct Signature<E: Engine> {
    pub a: E::G1,
    pub e: E::Fr,
    pub s: E::Fr,
}

impl<E: Engine> fmt::Debug for Signature<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("a", &self.a)
            .finish_non_exhaustive()
    }
}

impl<E: Engine> Signature<E> {
    /// Signs `messages` with the secret key `x`.
    ///
    /// # Errors
    /// [`Error::InvalidWitness`] if the number of messages does not match the parameters.
    pub fn new(
        rng: &mut (impl RngCore + CryptoRng),
        messages: &[E::Fr],
        secret_key: &E::Fr,
        params: &SignatureParams<E>,
    ) -> Result<Self, Error> {
        let s = E::Fr::random(&mut *rng);
        let b = params.b(messages, s)?;
        loop {
            let e = E::Fr::random(&mut *rng);
            if let Some(inverse) = Option::<E::Fr>::from((e + secret_key).invert()) {
                return Ok(Self { a: b * inverse, e, s });
            }
        }
    }

    /// Checks `e(A, w + e·g2) = e(b, g2)`.
    pub fn verify(
        &self,
        messages: &[E::Fr],
        public_key: &E::G2,
        params: &SignatureParams<E>,
    ) -> bool {
        let Ok(b) = params.b(messages, self.s) else {
            return false;
        };
        let lhs = E::pairing(
            &self.a.to_affine(),
            &(*public_key + params.g2 * self.e).to_affine(),
        );
        lhs == E::pairing(&b.to_affine(), &params.g2.to_affine())
    }
}

/// Knowledge of a BBS+ signature on the values of `messages`.
#[derive(Clone)]
pub struct BbsPlusSignatureStmt<E: Engine> {
    params: SignatureParams<E>,
    public_key: E::G2,
    messages: Vec<Secret<E::Fr>>,
    signature: Option<Signature<E>>,
    e: Secret<E::Fr>,
    neg_r2: Secret<E::Fr>,
    neg_r3: Secret<E::Fr>,
    s_prime: Secret<E::Fr>,
}

impl<E: Engine> fmt::Debug for BbsPlusSignatureStmt<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BbsPlusSignatureStmt")
            .field("public_key", &self.public_key)
            .field("messages", &self.messages)
            .field("has_signature", &self.signature.is_some())
            .finish_non_exhaustive()
    }
}

impl<E: Engine> BbsPlusSignatureStmt<E> {
    /// # Errors
    /// [`Error::InvalidExpression`] if the number of messages does not match the parameters.
    pub fn new(
        params: SignatureParams<E>,
        public_key: E::G2,
        messages: Vec<Secret<E::Fr>>,
    ) -> Result<Self, Error> {
        if messages.len() != params.message_count() {
            return Err(Error::InvalidExpression(format!(
                "parameters sign {} messages, got {} secrets",
                params.message_count(),
                messages.len()
            )));
        }
        Ok(Self {
            params,
            public_key,
            messages,
            signature: None,
            e: Secret::new(),
            neg_r2: Secret::new(),
            neg_r3: Secret::new(),
            s_prime: Secret::new(),
        })
    }

    /// Attaches the signature the prover holds.
    pub fn with_signature(mut self, signature: Signature<E>) -> Self {
        self.signature = Some(signature);
        self
    }

    fn message_values(&self, values: &SecretValues<E::Fr>) -> Result<Vec<E::Fr>, Error> {
        self.messages
            .iter()
            .map(|message| message.value_in(values))
            .collect()
    }
}

impl<E: Engine> ExtendedStatement<E::G1> for BbsPlusSignatureStmt<E> {
    fn name(&self) -> &'static str {
        "BbsPlusSignature"
    }

    fn secrets(&self) -> Vec<Secret<E::Fr>> {
        self.messages.clone()
    }

    fn public_elements(&self) -> Vec<E::G1> {
        let mut elements = vec![self.params.g1, self.params.h0];
        elements.extend_from_slice(&self.params.h);
        elements
    }

    fn public_label(&self) -> Vec<u8> {
        let mut label = self.params.g2.to_bytes().as_ref().to_vec();
        label.extend_from_slice(self.public_key.to_bytes().as_ref());
        label
    }

    fn can_prove(&self, values: &SecretValues<E::Fr>) -> bool {
        self.signature.is_some() && self.message_values(values).is_ok()
    }

    #[instrument(skip_all, fields(statement = self.name()))]
    fn precommit(
        &self,
        values: &SecretValues<E::Fr>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Precommitted<E::G1>, Error> {
        let signature = self
            .signature
            .as_ref()
            .ok_or_else(|| Error::InvalidWitness("no signature to prove".into()))?;
        let messages = self.message_values(values)?;
        if !signature.verify(&messages, &self.public_key, &self.params) {
            return Err(Error::InvalidWitness(
                "signature does not verify on the messages".into(),
            ));
        }
        let b = self.params.b(&messages, signature.s)?;

        let (r1, r3) = loop {
            let r1 = E::Fr::random(&mut *rng);
            if let Some(r3) = Option::<E::Fr>::from(r1.invert()) {
                break (r1, r3);
            }
        };
        let r2 = E::Fr::random(&mut *rng);

        let a_prime = signature.a * r1;
        let a_bar = b * r1 - a_prime * signature.e;
        let d = b * r1 - self.params.h0 * r2;
        let s_prime = signature.s - r2 * r3;

        let values = [
            (self.e.clone(), signature.e),
            (self.neg_r2.clone(), -r2),
            (self.neg_r3.clone(), -r3),
            (self.s_prime.clone(), s_prime),
        ]
        .into_iter()
        .collect();
        Ok(Precommitted {
            elements: vec![a_prime, a_bar, d],
            values,
        })
    }

    /// Random elements of the right shape. They do not pass
    /// [`validate`](ExtendedStatement::validate), so a signature proof cannot
    /// sit on a simulated Or branch.
    fn simulate_precommit(&self, rng: &mut dyn CryptoRngCore) -> Result<Vec<E::G1>, Error> {
        Ok((0..3).map(|_| E::G1::random(&mut *rng)).collect())
    }

    fn construct_statement(&self, precommitment: &[E::G1]) -> Result<Statement<E::G1>, Error> {
        let [a_prime, a_bar, d] = precommitment else {
            return Err(Error::StatementMismatch);
        };
        let params = &self.params;

        let randomized = Statement::dlrep(
            *d - *a_bar,
            &self.e * *a_prime + &self.neg_r2 * params.h0,
        )?;
        let terms = [(self.neg_r3.clone(), *d), (self.s_prime.clone(), params.h0)]
            .into_iter()
            .chain(self.messages.iter().cloned().zip(params.h.iter().copied()));
        let opening = Statement::dlrep(-params.g1, Expression::from_terms(terms)?)?;
        Statement::and([randomized, opening])
    }

    fn validate(&self, precommitment: &[E::G1]) -> Result<(), Error> {
        let [a_prime, a_bar, _] = precommitment else {
            return Err(Error::StatementMismatch);
        };
        if bool::from(a_prime.is_identity()) {
            return Err(Error::ValidationFailure("A' is the identity".into()));
        }
        let lhs = E::pairing(&a_prime.to_affine(), &self.public_key.to_affine());
        let rhs = E::pairing(&a_bar.to_affine(), &self.params.g2.to_affine());
        if lhs != rhs {
            return Err(Error::ValidationFailure(
                "randomized signature does not match the public key".into(),
            ));
        }
        Ok(())
    }

    fn renew_internal_secrets(&self) -> Option<Arc<dyn ExtendedStatement<E::G1>>> {
        Some(Arc::new(Self {
            e: Secret::new(),
            neg_r2: Secret::new(),
            neg_r3: Secret::new(),
            s_prime: Secret::new(),
            ..self.clone()
        }))
    }
}
