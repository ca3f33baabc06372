use ff::PrimeField;
use group::Group;

/// Below this many terms the naive sum beats the bucket method.
const PIPPENGER_THRESHOLD: usize = 16;

/// Computes `Σ scalars[i]·bases[i]`.
///
/// Extra scalars or bases are ignored; callers pass slices of equal length.
pub fn msm<G: Group>(scalars: &[G::Scalar], bases: &[G]) -> G {
    if scalars.len().min(bases.len()) < PIPPENGER_THRESHOLD {
        msm_naive(scalars, bases)
    } else {
        msm_pippenger(scalars, bases)
    }
}

fn msm_naive<G: Group>(scalars: &[G::Scalar], bases: &[G]) -> G {
    scalars.iter().zip(bases).map(|(x, g)| *g * x).sum()
}

/// Window width: roughly `ln(n)`, at least 1.
fn window_width(n: usize) -> usize {
    let log2 = (usize::BITS - n.saturating_sub(1).leading_zeros()) as usize;
    (log2 * 69 / 100).max(1)
}

/// Reads `width` bits of a little-endian representation starting at bit `start`.
fn window_value(repr: &[u8], start: usize, width: usize) -> usize {
    let end = (start + width).min(repr.len() * 8);
    (start..end).fold(0, |acc, bit| {
        acc | ((((repr[bit / 8] >> (bit % 8)) & 1) as usize) << (bit - start))
    })
}

/// Bucket method. Scalar representations are read as little-endian bytes.
fn msm_pippenger<G: Group>(scalars: &[G::Scalar], bases: &[G]) -> G {
    let width = window_width(scalars.len());
    let num_bits = <G::Scalar as PrimeField>::NUM_BITS as usize;
    let reprs: Vec<_> = scalars.iter().map(|s| s.to_repr()).collect();

    let mut total = G::identity();
    let windows: Vec<usize> = (0..num_bits).step_by(width).collect();
    for &start in windows.iter().rev() {
        for _ in 0..width {
            total = total.double();
        }

        let mut buckets = vec![G::identity(); (1 << width) - 1];
        for (repr, base) in reprs.iter().zip(bases) {
            let digit = window_value(repr.as_ref(), start, width);
            if digit != 0 {
                buckets[digit - 1] += base;
            }
        }

        let mut running = G::identity();
        let mut window_sum = G::identity();
        for bucket in buckets.iter().rev() {
            running += bucket;
            window_sum += &running;
        }
        total += window_sum;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use bls12_381::{G1Projective, Scalar};
    use ff::Field;

    #[test]
    fn bucket_method_matches_naive_sum() {
        let mut rng = rand::thread_rng();
        for n in [1, 15, 16, 100] {
            let scalars: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();
            let bases: Vec<G1Projective> = (0..n).map(|_| G1Projective::random(&mut rng)).collect();
            assert_eq!(msm(&scalars, &bases), msm_naive(&scalars, &bases), "n = {n}");
        }
    }
}
