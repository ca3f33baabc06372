//! Inequality of discrete logarithms.
//!
//! Given pairs `(Y0, g0)` and `(Y1, g1)`, [`DLNotEqual`] proves knowledge of
//! `x` with `Y0 = x·g0` and `Y1 ≠ x·g1`. The prover precommits to
//! `C = ρ·(x·g1 − Y1)` for a random blinder `ρ` and proves, for
//! `α = x·ρ` and `β = −ρ`:
//!
//! ```text
//! 0 = α·g0 + β·Y0    and    C = α·g1 + β·Y1
//! ```
//!
//! The verifier rejects `C = 0`. With `bind`, the constructed statement
//! also proves `Y0 = x·g0`, tying `x` to the other uses of the secret.

use std::sync::Arc;

use ff::Field;
use group::prime::PrimeGroup;
use rand_core::CryptoRngCore;
use tracing::instrument;

use crate::composition::Statement;
use crate::errors::Error;
use crate::expression::{Secret, SecretValues};
use crate::extended::{ExtendedStatement, Precommitted};

/// Proof that `log_{g0} Y0 ≠ log_{g1} Y1`, knowing `x = log_{g0} Y0`.
#[derive(Clone, Debug)]
pub struct DLNotEqual<G: PrimeGroup> {
    valid: (G, G),
    invalid: (G, G),
    x: Secret<G::Scalar>,
    bind: bool,
    alpha: Secret<G::Scalar>,
    beta: Secret<G::Scalar>,
}

impl<G: PrimeGroup> DLNotEqual<G> {
    /// `valid = (Y0, g0)` with `Y0 = x·g0`; `invalid = (Y1, g1)` with `Y1 ≠ x·g1`.
    pub fn new(valid: (G, G), invalid: (G, G), x: Secret<G::Scalar>, bind: bool) -> Self {
        Self {
            valid,
            invalid,
            x,
            bind,
            alpha: Secret::new(),
            beta: Secret::new(),
        }
    }

    pub fn secret(&self) -> &Secret<G::Scalar> {
        &self.x
    }

    pub fn is_bound(&self) -> bool {
        self.bind
    }
}

impl<G: PrimeGroup> ExtendedStatement<G> for DLNotEqual<G> {
    fn name(&self) -> &'static str {
        "DLNotEqual"
    }

    fn secrets(&self) -> Vec<Secret<G::Scalar>> {
        vec![self.x.clone()]
    }

    fn public_elements(&self) -> Vec<G> {
        vec![self.valid.0, self.valid.1, self.invalid.0, self.invalid.1]
    }

    fn public_label(&self) -> Vec<u8> {
        vec![u8::from(self.bind)]
    }

    fn can_prove(&self, values: &SecretValues<G::Scalar>) -> bool {
        let Ok(x) = self.x.value_in(values) else {
            return false;
        };
        let ((y0, g0), (y1, g1)) = (self.valid, self.invalid);
        g0 * x == y0 && g1 * x != y1
    }

    #[instrument(skip_all, fields(statement = self.name()))]
    fn precommit(
        &self,
        values: &SecretValues<G::Scalar>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Precommitted<G>, Error> {
        let x = self.x.value_in(values)?;
        let ((y0, g0), (y1, g1)) = (self.valid, self.invalid);
        if g0 * x != y0 {
            return Err(Error::InvalidWitness("Y0 is not x·g0".into()));
        }
        if g1 * x == y1 {
            return Err(Error::InvalidWitness("the logarithms are equal".into()));
        }

        let blinder = loop {
            let blinder = G::Scalar::random(&mut *rng);
            if !bool::from(blinder.is_zero()) {
                break blinder;
            }
        };
        let commitment = (g1 * x - y1) * blinder;
        let values = [(self.alpha.clone(), x * blinder), (self.beta.clone(), -blinder)]
            .into_iter()
            .collect();
        Ok(Precommitted {
            elements: vec![commitment],
            values,
        })
    }

    fn simulate_precommit(&self, rng: &mut dyn CryptoRngCore) -> Result<Vec<G>, Error> {
        loop {
            let element = G::random(&mut *rng);
            if !bool::from(element.is_identity()) {
                return Ok(vec![element]);
            }
        }
    }

    fn construct_statement(&self, precommitment: &[G]) -> Result<Statement<G>, Error> {
        let [commitment] = precommitment else {
            return Err(Error::StatementMismatch);
        };
        let ((y0, g0), (y1, g1)) = (self.valid, self.invalid);
        let (alpha, beta) = (&self.alpha, &self.beta);

        let mut children = vec![
            Statement::dlrep(G::identity(), alpha * g0 + beta * y0)?,
            Statement::dlrep(*commitment, alpha * g1 + beta * y1)?,
        ];
        if self.bind {
            children.push(Statement::dlrep(y0, &self.x * g0)?);
        }
        Statement::and(children)
    }

    fn validate(&self, precommitment: &[G]) -> Result<(), Error> {
        match precommitment {
            [commitment] if !bool::from(commitment.is_identity()) => Ok(()),
            [_] => Err(Error::ValidationFailure(
                "DLNotEqual precommitment is the identity".into(),
            )),
            _ => Err(Error::StatementMismatch),
        }
    }

    fn renew_internal_secrets(&self) -> Option<Arc<dyn ExtendedStatement<G>>> {
        Some(Arc::new(Self {
            alpha: Secret::new(),
            beta: Secret::new(),
            ..self.clone()
        }))
    }
}
