use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use curve25519_dalek::{RistrettoPoint, Scalar};
use ff::Field;
use group::Group;
use rand::thread_rng;

use sigma_compose::group::msm;
use sigma_compose::primitives::RangeStmt;
use sigma_compose::{Secret, SecretValues, Statement};

type G = RistrettoPoint;

fn bench_msm(c: &mut Criterion) {
    let mut group = c.benchmark_group("MSM RistrettoPoint");
    let mut rng = thread_rng();

    for size in [1, 4, 16, 64, 256].iter() {
        let scalars: Vec<Scalar> = (0..*size).map(|_| Scalar::random(&mut rng)).collect();
        let bases: Vec<G> = (0..*size).map(|_| G::random(&mut rng)).collect();

        group.bench_with_input(BenchmarkId::new("size", size), size, |b, _| {
            b.iter(|| msm(black_box(&scalars), black_box(&bases)))
        });
    }
    group.finish();
}

/// `n` Pedersen openings, the first of them known, as an Or.
fn pedersen_or(n: usize) -> (Statement<G>, SecretValues<Scalar>) {
    let mut rng = thread_rng();
    let (g, h) = (G::random(&mut rng), G::random(&mut rng));
    let mut values = SecretValues::new();
    let branches = (0..n).map(|i| {
        let (x, r) = (Secret::named(format!("x{i}")), Secret::named(format!("r{i}")));
        let (vx, vr) = (Scalar::random(&mut rng), Scalar::random(&mut rng));
        if i == 0 {
            values.insert(x.clone(), vx);
            values.insert(r.clone(), vr);
        }
        Statement::dlrep(g * vx + h * vr, x * g + r * h)
    });
    let branches: Result<Vec<_>, _> = branches.collect();
    let statement = Statement::or(branches.unwrap()).unwrap();
    (statement, values)
}

fn bench_or(c: &mut Criterion) {
    let mut group = c.benchmark_group("Or of Pedersen openings");
    let mut rng = thread_rng();

    for n in [2, 8, 32].iter() {
        let (statement, values) = pedersen_or(*n);
        let proof = statement.prove(&values, b"", &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("prove", n), n, |b, _| {
            b.iter(|| statement.prove(black_box(&values), b"", &mut thread_rng()))
        });
        group.bench_with_input(BenchmarkId::new("verify", n), n, |b, _| {
            b.iter(|| statement.verify(black_box(&proof), b""))
        });
    }
    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("Range");
    let mut rng = thread_rng();
    let (g, h) = (G::random(&mut rng), G::random(&mut rng));

    for upper in [1u64 << 8, 1 << 16, 1 << 32].iter() {
        let (x, r) = (Secret::named("x"), Secret::named("r"));
        let (vx, vr) = (Scalar::from(upper / 3), Scalar::random(&mut rng));
        let com = g * vx + h * vr;
        let statement =
            Statement::extended(RangeStmt::new(com, g, h, 0u64, *upper, x.clone(), r.clone()).unwrap());
        let values = SecretValues::from([(x, vx), (r, vr)]);
        let proof = statement.prove(&values, b"", &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("prove", upper), upper, |b, _| {
            b.iter(|| statement.prove(black_box(&values), b"", &mut thread_rng()))
        });
        group.bench_with_input(BenchmarkId::new("verify", upper), upper, |b, _| {
            b.iter(|| statement.verify(black_box(&proof), b""))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_msm, bench_or, bench_range);
criterion_main!(benches);
