#![allow(dead_code)]

use group::{ff::Field, prime::PrimeGroup, Group};
use rand::{CryptoRng, RngCore};

use sigma_compose::{Secret, SecretValues, Statement};

pub type Return<G> = (Statement<G>, SecretValues<<G as Group>::Scalar>);

pub fn random_elem<G: Group>(rng: &mut (impl RngCore + CryptoRng)) -> G {
    G::generator() * G::Scalar::random(rng)
}

/// Knowledge of a discrete logarithm relative to the generator.
pub fn discrete_logarithm<G: PrimeGroup>(
    rng: &mut (impl RngCore + CryptoRng),
    name: &str,
) -> Return<G> {
    let x = G::Scalar::random(&mut *rng);
    let secret = Secret::named(name);
    let statement = Statement::dlrep(G::generator() * x, &secret * G::generator()).unwrap();
    (statement, SecretValues::from([(secret, x)]))
}

/// A discrete logarithm nobody knows.
pub fn unknown_discrete_logarithm<G: PrimeGroup>(
    rng: &mut (impl RngCore + CryptoRng),
    name: &str,
) -> Statement<G> {
    let base: G = random_elem(rng);
    Statement::dlrep(random_elem(rng), Secret::named(name) * base).unwrap()
}

/// Equality of discrete logarithms: `X = x·g ∧ Y = x·h`.
#[allow(non_snake_case)]
pub fn dleq<G: PrimeGroup>(rng: &mut (impl RngCore + CryptoRng), name: &str) -> Return<G> {
    let (g, h): (G, G) = (random_elem(rng), random_elem(rng));
    let x = G::Scalar::random(&mut *rng);
    let secret = Secret::named(name);
    let (X, Y) = (g * x, h * x);
    let statement = Statement::and([
        Statement::dlrep(X, &secret * g).unwrap(),
        Statement::dlrep(Y, &secret * h).unwrap(),
    ])
    .unwrap();
    (statement, SecretValues::from([(secret, x)]))
}

/// Opening of a Pedersen commitment `C = x·g + r·h`.
#[allow(non_snake_case)]
pub fn pedersen_commitment<G: PrimeGroup>(
    rng: &mut (impl RngCore + CryptoRng),
    prefix: &str,
) -> Return<G> {
    let (g, h): (G, G) = (random_elem(rng), random_elem(rng));
    let (x, r) = (G::Scalar::random(&mut *rng), G::Scalar::random(&mut *rng));
    let (sx, sr) = (
        Secret::named(format!("{prefix}.x")),
        Secret::named(format!("{prefix}.r")),
    );
    let C = g * x + h * r;
    let statement = Statement::dlrep(C, &sx * g + &sr * h).unwrap();
    (statement, SecretValues::from([(sx, x), (sr, r)]))
}

/// Blind commitment to BBS messages: `C = Σ mᵢ·hᵢ + s·Q`.
#[allow(non_snake_case)]
pub fn bbs_blind_commitment<G: PrimeGroup>(
    rng: &mut (impl RngCore + CryptoRng),
    count: usize,
) -> Return<G> {
    let Q: G = random_elem(rng);
    let bases: Vec<G> = (0..count).map(|_| random_elem(rng)).collect();
    let s = Secret::named("bbs.s");
    let messages: Vec<Secret<G::Scalar>> = (0..count)
        .map(|i| Secret::named(format!("bbs.m{i}")))
        .collect();

    let mut values = SecretValues::from([(s.clone(), G::Scalar::random(&mut *rng))]);
    let mut expr = &s * Q;
    for (message, base) in messages.iter().zip(&bases) {
        values.insert(message.clone(), G::Scalar::random(&mut *rng));
        expr += message * *base;
    }
    let C = expr.eval_with(&values).unwrap();
    (Statement::dlrep(C, expr).unwrap(), values)
}

pub fn merge<F: Field>(maps: impl IntoIterator<Item = SecretValues<F>>) -> SecretValues<F> {
    maps.into_iter().flatten().collect()
}
