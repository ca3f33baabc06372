use curve25519_dalek::Scalar;
use ff::Field;
use group::Group;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use super::test_relations::*;
use crate::primitives::DLNotEqual;
use crate::proof_id::PROOF_ID_SCHEMA;
use crate::{Secret, SecretValues, Statement};

#[test]
fn renaming_secrets_keeps_the_identifier() {
    let mut rng = ChaCha20Rng::seed_from_u64(201);
    let (g, h, y) = (G::random(&mut rng), G::random(&mut rng), G::random(&mut rng));

    let build = |x: &str, r: &str| {
        let (x, r) = (Secret::named(x), Secret::named(r));
        Statement::dlrep(y, &x * g + &r * h).unwrap() & Statement::dlrep(y, &x * h).unwrap()
    };
    assert_eq!(build("x", "r").proof_id(), build("a", "b").proof_id());
    assert_eq!(build("x", "r").statement_hash(), build("a", "b").statement_hash());
}

#[test]
fn reuse_pattern_and_term_order_change_the_identifier() {
    let mut rng = ChaCha20Rng::seed_from_u64(202);
    let (g, h, y) = (G::random(&mut rng), G::random(&mut rng), G::random(&mut rng));
    let (x, r) = (Secret::named("x"), Secret::named("r"));

    let distinct = Statement::dlrep(y, &x * g + &r * h).unwrap();
    let repeated = Statement::dlrep(y, &x * g + &x * h).unwrap();
    let swapped = Statement::dlrep(y, &r * h + &x * g).unwrap();

    assert_ne!(distinct.proof_id(), repeated.proof_id());
    assert_ne!(distinct.proof_id(), swapped.proof_id());
}

#[test]
fn combinators_and_public_elements_are_bound() {
    let mut rng = ChaCha20Rng::seed_from_u64(203);
    let a = unknown_discrete_logarithm(&mut rng, "a");
    let b = unknown_discrete_logarithm(&mut rng, "b");
    let c = unknown_discrete_logarithm(&mut rng, "b");

    let and = Statement::and([a.clone(), b.clone()]).unwrap();
    let or = Statement::or([a.clone(), b]).unwrap();
    let other = Statement::and([a, c]).unwrap();

    assert_ne!(and.proof_id(), or.proof_id());
    assert_ne!(and.statement_hash(), other.statement_hash());
}

#[test]
fn identifier_layout_of_a_leaf() {
    let mut rng = ChaCha20Rng::seed_from_u64(204);
    let statement = unknown_discrete_logarithm(&mut rng, "x");
    let id = statement.proof_id();
    let bytes = id.as_bytes();

    let schema_len = PROOF_ID_SCHEMA.len();
    assert_eq!(bytes[..4], (schema_len as u32).to_be_bytes());
    assert_eq!(&bytes[4..4 + schema_len], PROOF_ID_SCHEMA);
    // DLRep tag, one term, base, lhs, then one occurrence with index 0.
    let node = &bytes[4 + schema_len..];
    assert_eq!(node[0], 0x01);
    assert_eq!(node[1..5], hex_literal::hex!("00000001"));
    assert_eq!(node.len(), 1 + 4 + 32 + 32 + 4 + 4);
    assert_eq!(node[node.len() - 8..], hex_literal::hex!("0000000100000000"));
}

#[test]
fn precommitment_extends_the_identifier_but_not_the_hash() {
    let mut rng = ChaCha20Rng::seed_from_u64(205);
    let (g0, g1) = (G::random(&mut rng), G::random(&mut rng));
    let v = Scalar::random(&mut rng);
    let x = Secret::named("x");
    let statement = Statement::extended(DLNotEqual::new(
        (g0 * v, g0),
        (G::random(&mut rng), g1),
        x.clone(),
        true,
    ));

    let mut prover = statement.get_prover(&SecretValues::from([(x, v)])).unwrap();
    prover.precommit(&mut rng).unwrap();

    assert_ne!(prover.statement().proof_id(), statement.proof_id());
    assert_eq!(prover.statement().statement_hash(), statement.statement_hash());
}
