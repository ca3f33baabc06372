//! Small statements with satisfying values, shared by the unit tests.

use curve25519_dalek::{RistrettoPoint, Scalar};
use ff::Field;
use group::Group;
use rand::{CryptoRng, RngCore};

use crate::{Secret, SecretValues, Statement};

pub type G = RistrettoPoint;

/// `Y = x·g`.
pub fn discrete_logarithm(
    rng: &mut (impl RngCore + CryptoRng),
    name: &str,
) -> (Statement<G>, SecretValues<Scalar>) {
    let g = G::random(&mut *rng);
    let x = Scalar::random(&mut *rng);
    let secret = Secret::named(name);
    let statement = Statement::dlrep(g * x, &secret * g).unwrap();
    (statement, SecretValues::from([(secret, x)]))
}

/// `Y = x·g` for a random `Y`: nobody knows `x`.
pub fn unknown_discrete_logarithm(
    rng: &mut (impl RngCore + CryptoRng),
    name: &str,
) -> Statement<G> {
    let g = G::random(&mut *rng);
    Statement::dlrep(G::random(&mut *rng), Secret::named(name) * g).unwrap()
}

/// `X = x·g ∧ Y = x·h`.
pub fn dleq(
    rng: &mut (impl RngCore + CryptoRng),
    name: &str,
) -> (Statement<G>, SecretValues<Scalar>) {
    let (g, h) = (G::random(&mut *rng), G::random(&mut *rng));
    let x = Scalar::random(&mut *rng);
    let secret = Secret::named(name);
    let statement = Statement::dlrep(g * x, &secret * g).unwrap()
        & Statement::dlrep(h * x, &secret * h).unwrap();
    (statement, SecretValues::from([(secret, x)]))
}

/// `C = x·g + r·h`.
pub fn pedersen_commitment(
    rng: &mut (impl RngCore + CryptoRng),
    prefix: &str,
) -> (Statement<G>, SecretValues<Scalar>) {
    let (g, h) = (G::random(&mut *rng), G::random(&mut *rng));
    let (x, r) = (Scalar::random(&mut *rng), Scalar::random(&mut *rng));
    let (sx, sr) = (
        Secret::named(format!("{prefix}.x")),
        Secret::named(format!("{prefix}.r")),
    );
    let statement = Statement::dlrep(g * x + h * r, &sx * g + &sr * h).unwrap();
    (statement, SecretValues::from([(sx, x), (sr, r)]))
}

pub fn merge(maps: impl IntoIterator<Item = SecretValues<Scalar>>) -> SecretValues<Scalar> {
    maps.into_iter().flatten().collect()
}
