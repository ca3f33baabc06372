//! # Secrets and Expressions
//!
//! A [`Secret`] is a named scalar variable; an [`Expression`] is an ordered
//! formal sum `Σ sᵢ·Bᵢ` of secrets times public group elements. Expressions
//! are written with the operators of [`ops`]:
//!
//! ```
//! use curve25519_dalek::RistrettoPoint;
//! use group::Group;
//! use sigma_compose::{Expression, Secret};
//!
//! let mut rng = rand::thread_rng();
//! let (g, h) = (RistrettoPoint::random(&mut rng), RistrettoPoint::random(&mut rng));
//! let (x, r) = (Secret::named("x"), Secret::named("r"));
//! let expr: Expression<RistrettoPoint> = &x * g + &r * h;
//! assert_eq!(expr.len(), 2);
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use ff::Field;
use group::Group;
use rand::Rng;

use crate::errors::Error;

pub mod ops;

/// Values of secrets, indexed by secret.
pub type SecretValues<F> = HashMap<Secret<F>, F>;

/// A named scalar variable, optionally carrying its value.
///
/// Two secrets are the same variable iff their names match; equality,
/// ordering and hashing only look at the name.
///
/// Clones share the carried value: setting it on one handle is seen by every
/// statement holding a clone, up to the moment a prover is created.
/// Secrets created separately under the same name do not share it.
#[derive(Clone)]
pub struct Secret<F> {
    name: Arc<str>,
    value: Arc<RwLock<Option<F>>>,
}

impl<F: Field> Secret<F> {
    /// Creates a secret with a fresh random name.
    ///
    /// The name is drawn from `rand::thread_rng()`. It only needs to be
    /// unique, never unpredictable, and identifiers do not depend on it.
    pub fn new() -> Self {
        let seed: u64 = rand::thread_rng().gen();
        Self::named(format!("secret-{seed:016x}"))
    }

    /// Creates a secret with the given name.
    pub fn named(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            value: Arc::new(RwLock::new(None)),
        }
    }

    /// Attaches a value to the secret.
    pub fn with_value(self, value: F) -> Self {
        self.set_value(value);
        self
    }

    /// Sets the value carried by this handle and all of its clones.
    pub fn set_value(&self, value: F) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<F> {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks the secret up in `values`, falling back to the carried value.
    pub fn value_in(&self, values: &SecretValues<F>) -> Result<F, Error> {
        values
            .get(self)
            .copied()
            .or_else(|| self.value())
            .ok_or_else(|| Error::incomplete(self.name()))
    }
}

impl<F: Field> Default for Secret<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for Secret<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_value = self
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("Secret")
            .field("name", &self.name)
            .field("has_value", &has_value)
            .finish()
    }
}

impl<F> PartialEq for Secret<F> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<F> Eq for Secret<F> {}

impl<F> Hash for Secret<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<F> PartialOrd for Secret<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F> Ord for Secret<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// A single `secret · base` term.
#[derive(Clone, Debug)]
pub struct Term<G: Group> {
    pub secret: Secret<G::Scalar>,
    pub base: G,
}

/// An ordered linear combination of secrets with group elements.
///
/// Term order matters: it fixes the order of responses and is part of the
/// statement identifier.
#[derive(Clone, Debug)]
pub struct Expression<G: Group> {
    terms: Vec<Term<G>>,
}

impl<G: Group> Expression<G> {
    /// A single-term expression.
    pub fn new(secret: Secret<G::Scalar>, base: G) -> Self {
        Self {
            terms: vec![Term { secret, base }],
        }
    }

    /// Builds an expression from `(secret, base)` pairs, in order.
    ///
    /// # Errors
    /// [`Error::InvalidExpression`] if no term is given.
    pub fn from_terms(
        terms: impl IntoIterator<Item = (Secret<G::Scalar>, G)>,
    ) -> Result<Self, Error> {
        let terms: Vec<_> = terms
            .into_iter()
            .map(|(secret, base)| Term { secret, base })
            .collect();
        if terms.is_empty() {
            return Err(Error::InvalidExpression("expression has no terms".into()));
        }
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[Term<G>] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The bases, in term order.
    pub fn bases(&self) -> impl Iterator<Item = &G> {
        self.terms.iter().map(|term| &term.base)
    }

    /// Distinct secrets, in order of first occurrence.
    pub fn secrets(&self) -> Vec<Secret<G::Scalar>> {
        let mut secrets: Vec<Secret<G::Scalar>> = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            if !secrets.contains(&term.secret) {
                secrets.push(term.secret.clone());
            }
        }
        secrets
    }

    /// Evaluates the expression with the values carried by its secrets.
    ///
    /// # Errors
    /// [`Error::IncompleteValues`] if a secret has no value.
    pub fn eval(&self) -> Result<G, Error> {
        self.eval_with(&SecretValues::new())
    }

    /// Evaluates the expression, looking values up in `values` first.
    pub fn eval_with(&self, values: &SecretValues<G::Scalar>) -> Result<G, Error> {
        let scalars = self
            .terms
            .iter()
            .map(|term| term.secret.value_in(values))
            .collect::<Result<Vec<_>, _>>()?;
        let bases: Vec<G> = self.bases().copied().collect();
        Ok(crate::group::msm(&scalars, &bases))
    }
}
