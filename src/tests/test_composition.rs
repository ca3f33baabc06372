use curve25519_dalek::Scalar;
use ff::Field;
use group::Group;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use super::test_relations::*;
use crate::{Challenge, Commitment, Error, Response, Secret, SecretValues, Statement, StatementKind};

fn or_children(statement: &Statement<G>) -> &[Statement<G>] {
    match statement.kind() {
        StatementKind::Or(children) => children,
        other => panic!("expected an Or, got {other:?}"),
    }
}

#[test]
fn live_branch_is_the_satisfied_one() {
    let mut rng = ChaCha20Rng::seed_from_u64(101);
    let g = G::random(&mut rng);
    let (x0, x1) = (Secret::named("x0"), Secret::named("x1"));
    let y0 = G::random(&mut rng);
    let v1 = Scalar::random(&mut rng);
    let statement = Statement::or([
        Statement::dlrep(y0, &x0 * g).unwrap(),
        Statement::dlrep(g * v1, &x1 * g).unwrap(),
    ])
    .unwrap();

    // x0 has a value but does not satisfy its branch.
    let values = SecretValues::from([(x0, Scalar::random(&mut rng)), (x1, v1)]);
    let mut prover = statement.get_prover(&values).unwrap();
    prover.precommit(&mut rng).unwrap();

    let branches = or_children(prover.statement());
    assert!(branches[0].is_simulated());
    assert!(!branches[1].is_simulated());
}

#[test]
fn simulated_branches_are_never_live() {
    let mut rng = ChaCha20Rng::seed_from_u64(102);
    let (left, left_values) = discrete_logarithm(&mut rng, "a");
    let (right, right_values) = discrete_logarithm(&mut rng, "b");
    let statement = Statement::or([left.simulated(), right]).unwrap();
    let values = merge([left_values, right_values]);

    let mut prover = statement.get_prover(&values).unwrap();
    prover.precommit(&mut rng).unwrap();
    assert!(or_children(prover.statement())[0].is_simulated());
    assert!(!or_children(prover.statement())[1].is_simulated());
}

#[test]
fn or_without_values_has_no_live_branch() {
    let mut rng = ChaCha20Rng::seed_from_u64(103);
    let statement = Statement::or([
        unknown_discrete_logarithm(&mut rng, "a"),
        unknown_discrete_logarithm(&mut rng, "b"),
    ])
    .unwrap();

    let mut prover = statement.get_prover(&SecretValues::new()).unwrap();
    assert!(matches!(prover.precommit(&mut rng), Err(Error::NoLiveBranch)));
}

#[test]
fn inconsistent_responses_are_an_error() {
    let mut rng = ChaCha20Rng::seed_from_u64(104);
    let (g, h) = (G::random(&mut rng), G::random(&mut rng));
    let (x, x_other) = (Scalar::random(&mut rng), Scalar::random(&mut rng));
    let secret = Secret::named("x");
    // The second clause is about another logarithm: a cheating prover
    // answering it with its own randomizer passes the equations.
    let statement = Statement::and([
        Statement::dlrep(g * x, &secret * g).unwrap(),
        Statement::dlrep(h * x_other, &secret * h).unwrap(),
    ])
    .unwrap();

    let mut verifier = statement.get_verifier().unwrap();
    let (k0, k1) = (Scalar::random(&mut rng), Scalar::random(&mut rng));
    let commitment = Commitment::And(vec![Commitment::Simple(g * k0), Commitment::Simple(h * k1)]);
    let challenge = verifier
        .send_challenge(&statement.statement_hash(), commitment, &mut rng)
        .unwrap();
    let c: Scalar = challenge.to_scalar();
    let response = Response::And(vec![
        Response::Simple(vec![k0 + c * x]),
        Response::Simple(vec![k1 + c * x_other]),
    ]);

    match verifier.verify(&response) {
        Err(Error::InconsistentResponse { name }) => assert_eq!(name, "x"),
        other => panic!("expected an inconsistent response, got {other:?}"),
    }
}

#[test]
fn or_branches_may_answer_a_shared_secret_differently() {
    let mut rng = ChaCha20Rng::seed_from_u64(105);
    let (g, h) = (G::random(&mut rng), G::random(&mut rng));
    let r = Secret::named("r");
    let v = Scalar::random(&mut rng);
    // A bit commitment: both branches use `r`.
    let c = h * v;
    let statement = Statement::or([
        Statement::dlrep(c, &r * h).unwrap(),
        Statement::dlrep(c - g, &r * h).unwrap(),
    ])
    .unwrap();

    let values = SecretValues::from([(r, v)]);
    let proof = statement.prove(&values, b"", &mut rng).unwrap();
    assert!(statement.verify(&proof, b"").unwrap());
}

#[test]
fn or_sub_challenges_sum_to_the_challenge() {
    let mut rng = ChaCha20Rng::seed_from_u64(106);
    let (known, values) = discrete_logarithm(&mut rng, "known");
    let statement = Statement::or([
        unknown_discrete_logarithm(&mut rng, "u0"),
        known,
        unknown_discrete_logarithm(&mut rng, "u1"),
    ])
    .unwrap();

    let proof = statement.prove(&values, b"sum", &mut rng).unwrap();
    let Response::Or(challenges, _) = &proof.responses else {
        panic!("expected an Or response");
    };
    assert_eq!(challenges.iter().sum::<Challenge>(), proof.challenge);
    assert!(statement.verify(&proof, b"sum").unwrap());
}

#[test]
fn repeated_secret_in_one_term_list_shares_its_response() {
    let mut rng = ChaCha20Rng::seed_from_u64(107);
    let (g, h) = (G::random(&mut rng), G::random(&mut rng));
    let x = Secret::named("x");
    let v = Scalar::random(&mut rng);
    let statement = Statement::dlrep(g * v + h * v, &x * g + &x * h).unwrap();

    let proof = statement
        .prove(&SecretValues::from([(x, v)]), b"", &mut rng)
        .unwrap();
    let Response::Simple(scalars) = &proof.responses else {
        panic!("expected a simple response");
    };
    assert_eq!(scalars[0], scalars[1]);
    assert!(statement.verify(&proof, b"").unwrap());
}

#[test]
fn carried_values_are_used_when_the_map_is_silent() {
    let mut rng = ChaCha20Rng::seed_from_u64(108);
    let g = G::random(&mut rng);
    let v = Scalar::random(&mut rng);
    let x = Secret::named("x").with_value(v);
    let statement = Statement::dlrep(g * v, x * g).unwrap();

    let proof = statement.prove(&SecretValues::new(), b"", &mut rng).unwrap();
    assert!(statement.verify(&proof, b"").unwrap());
}

#[test]
fn values_set_after_building_reach_the_statement() {
    let mut rng = ChaCha20Rng::seed_from_u64(112);
    let (g, h) = (G::random(&mut rng), G::random(&mut rng));
    let (v, w) = (Scalar::random(&mut rng), Scalar::random(&mut rng));
    let (x, r) = (Secret::named("x"), Secret::named("r"));
    let statement = Statement::dlrep(g * v, &x * g).unwrap()
        & Statement::dlrep(h * w, &r * h).unwrap();

    x.set_value(v);
    assert!(matches!(
        statement.prove(&SecretValues::new(), b"", &mut rng),
        Err(Error::IncompleteValues { .. })
    ));
    r.set_value(w);
    let proof = statement.prove(&SecretValues::new(), b"", &mut rng).unwrap();
    assert!(statement.verify(&proof, b"").unwrap());

    // The values map still takes precedence.
    let wrong = SecretValues::from([(x.clone(), v + Scalar::ONE)]);
    let proof = statement.prove(&wrong, b"", &mut rng).unwrap();
    assert!(!statement.verify(&proof, b"").unwrap());
}

#[test]
fn operators_flatten_into_the_left_operand() {
    let mut rng = ChaCha20Rng::seed_from_u64(109);
    let a = unknown_discrete_logarithm(&mut rng, "a");
    let b = unknown_discrete_logarithm(&mut rng, "b");
    let c = unknown_discrete_logarithm(&mut rng, "c");

    match (a.clone() | b.clone() | c.clone()).kind() {
        StatementKind::Or(children) => assert_eq!(children.len(), 3),
        other => panic!("expected an Or, got {other:?}"),
    }
    match ((a & b) & c).kind() {
        StatementKind::And(children) => assert_eq!(children.len(), 3),
        other => panic!("expected an And, got {other:?}"),
    }
}

#[test]
fn missing_value_is_reported_by_name() {
    let mut rng = ChaCha20Rng::seed_from_u64(110);
    let statement = unknown_discrete_logarithm(&mut rng, "nameless");
    match statement.prove(&SecretValues::new(), b"", &mut rng) {
        Err(Error::IncompleteValues { name }) => assert_eq!(name, "nameless"),
        other => panic!("expected missing values, got {other:?}"),
    }
}

#[test]
fn protocol_steps_must_run_in_order() {
    let mut rng = ChaCha20Rng::seed_from_u64(111);
    let (statement, values) = discrete_logarithm(&mut rng, "x");

    let mut prover = statement.get_prover(&values).unwrap();
    assert!(matches!(
        prover.compute_response(Challenge::new(1)),
        Err(Error::OutOfOrder(_))
    ));
    let mut verifier = statement.get_verifier().unwrap();
    assert!(matches!(
        verifier.verify(&Response::Simple(vec![Scalar::ONE])),
        Err(Error::OutOfOrder(_))
    ));
}
