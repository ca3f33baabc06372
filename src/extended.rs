//! # Extended statements
//!
//! Some claims can only be written as a composition of [`DLRep`](crate::DLRep)s
//! once the prover has published a *precommitment*: a few group elements
//! computed from the secrets before the challenge is known. An
//! [`ExtendedStatement`] describes such a claim through four hooks:
//!
//! - `precommit`: prover side, computes the precommitment and the values of
//!   the internal secrets the inner statement uses,
//! - `simulate_precommit`: a precommitment of the right shape without secrets,
//!   used on simulated Or branches,
//! - `construct_statement`: the inner statement for a given precommitment,
//! - `validate`: verifier-side sanity check of the precommitment.
//!
//! [`Extended`] is the node of a statement tree holding an extended statement
//! together with the cached precommitment and constructed statement.

use core::fmt;
use std::sync::Arc;

use group::prime::PrimeGroup;
use rand::{CryptoRng, RngCore};
use rand_core::CryptoRngCore;

use crate::composition::Statement;
use crate::errors::Error;
use crate::expression::{Secret, SecretValues};

/// Output of [`ExtendedStatement::precommit`].
#[derive(Clone, Debug)]
pub struct Precommitted<G: PrimeGroup> {
    /// The precommitment sent to the verifier.
    pub elements: Vec<G>,
    /// Values of the secrets used by the constructed statement.
    pub values: SecretValues<G::Scalar>,
}

/// A claim whose Sigma protocol needs a precommitment.
pub trait ExtendedStatement<G: PrimeGroup>: fmt::Debug + Send + Sync {
    /// Name of the kind of statement; part of the statement identifier.
    fn name(&self) -> &'static str;

    /// The secrets this statement is about, as seen by the enclosing tree.
    fn secrets(&self) -> Vec<Secret<G::Scalar>>;

    /// Public group elements parametrizing the statement.
    fn public_elements(&self) -> Vec<G>;

    /// Public non-group parameters, encoded as bytes.
    fn public_label(&self) -> Vec<u8> {
        Vec::new()
    }

    /// Whether `values` hold everything [`precommit`](Self::precommit) needs.
    fn can_prove(&self, values: &SecretValues<G::Scalar>) -> bool {
        self.secrets()
            .iter()
            .all(|secret| secret.value_in(values).is_ok())
    }

    /// Computes the precommitment from the secret values.
    fn precommit(
        &self,
        values: &SecretValues<G::Scalar>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Precommitted<G>, Error>;

    /// Samples a precommitment without knowing the secrets.
    fn simulate_precommit(&self, rng: &mut dyn CryptoRngCore) -> Result<Vec<G>, Error>;

    /// Builds the inner statement; the same precommitment gives the same statement.
    fn construct_statement(&self, precommitment: &[G]) -> Result<Statement<G>, Error>;

    /// Checks the precommitment received by the verifier.
    fn validate(&self, _precommitment: &[G]) -> Result<(), Error> {
        Ok(())
    }

    /// A copy of the statement with freshly drawn internal secrets, or `None`
    /// if the constructed statement only uses the secrets of
    /// [`secrets`](Self::secrets).
    ///
    /// Every node renews its statement before precommitting, so a statement
    /// repeated within a tree answers with independent internal values.
    fn renew_internal_secrets(&self) -> Option<Arc<dyn ExtendedStatement<G>>> {
        None
    }
}

/// Precommitment of a whole statement tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Precommitment<G: PrimeGroup> {
    /// A DLRep leaf.
    Empty,
    /// And/Or: one entry per child.
    Composite(Vec<Precommitment<G>>),
    /// An extended statement and the precommitment of its constructed statement.
    Extended {
        elements: Vec<G>,
        inner: Box<Precommitment<G>>,
    },
}

/// Extended statement node of a statement tree.
#[derive(Clone, Debug)]
pub struct Extended<G: PrimeGroup> {
    statement: Arc<dyn ExtendedStatement<G>>,
    precommitment: Option<Vec<G>>,
    constructed: Option<Box<Statement<G>>>,
}

impl<G: PrimeGroup> Extended<G> {
    pub fn new(statement: impl ExtendedStatement<G> + 'static) -> Self {
        Self::from_arc(Arc::new(statement))
    }

    pub fn from_arc(statement: Arc<dyn ExtendedStatement<G>>) -> Self {
        Self {
            statement,
            precommitment: None,
            constructed: None,
        }
    }

    pub fn statement(&self) -> &dyn ExtendedStatement<G> {
        self.statement.as_ref()
    }

    /// The precommitment, once computed or received.
    pub fn precommitment(&self) -> Option<&[G]> {
        self.precommitment.as_deref()
    }

    /// The constructed statement, once the precommitment is known.
    pub fn constructed(&self) -> Option<&Statement<G>> {
        self.constructed.as_deref()
    }

    pub(crate) fn require_constructed(&self) -> Result<&Statement<G>, Error> {
        self.constructed
            .as_deref()
            .ok_or(Error::OutOfOrder("precommitment of an extended statement is missing"))
    }

    /// Prover side: precommits (or simulates the precommitment), constructs the
    /// inner statement and prepares it in turn.
    pub(crate) fn prepare(
        &mut self,
        values: &mut SecretValues<G::Scalar>,
        simulated: bool,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Precommitment<G>, Error> {
        if self.precommitment.is_some() {
            return Err(Error::OutOfOrder("extended statement already precommitted"));
        }
        self.renew();
        let elements = if simulated {
            self.statement.simulate_precommit(&mut *rng)?
        } else {
            let Precommitted {
                elements,
                values: internal,
            } = self.statement.precommit(values, &mut *rng)?;
            values.extend(internal);
            elements
        };

        let mut constructed = self.statement.construct_statement(&elements)?;
        let inner = constructed.prepare(values, simulated, rng)?;
        self.precommitment = Some(elements.clone());
        self.constructed = Some(Box::new(constructed));
        Ok(Precommitment::Extended {
            elements,
            inner: Box::new(inner),
        })
    }

    /// Verifier side: constructs the inner statement from a received precommitment.
    pub(crate) fn receive(
        &mut self,
        elements: &[G],
        inner: &Precommitment<G>,
    ) -> Result<(), Error> {
        if self.precommitment.is_some() {
            return Err(Error::OutOfOrder("extended statement already precommitted"));
        }
        self.renew();
        let mut constructed = self.statement.construct_statement(elements)?;
        constructed.process_precommitment(inner)?;
        self.precommitment = Some(elements.to_vec());
        self.constructed = Some(Box::new(constructed));
        Ok(())
    }

    fn renew(&mut self) {
        if let Some(renewed) = self.statement.renew_internal_secrets() {
            self.statement = renewed;
        }
    }

    /// Runs the validation hook on the precommitment, then on nested extended statements.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let precommitment = self
            .precommitment
            .as_deref()
            .ok_or(Error::OutOfOrder("precommitment of an extended statement is missing"))?;
        self.statement.validate(precommitment)?;
        self.require_constructed()?.validate_precommitments()
    }
}
