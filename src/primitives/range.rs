//! Range proofs on Pedersen commitments by bit decomposition.
//!
//! [`PowerTwoRangeStmt`] proves that `com = x·g + r·h` opens to
//! `x ∈ [0, 2ⁿ)`. The prover commits to each bit, `Cᵢ = bᵢ·g + rᵢ·h`, with
//! randomizers chosen so that `Σ 2ⁱ·rᵢ = r`; the verifier checks
//! `Σ 2ⁱ·Cᵢ = com` and the constructed statement proves every `Cᵢ` commits
//! to 0 or 1:
//!
//! ```text
//! And_i Or(Cᵢ = rᵢ·h, Cᵢ − g = rᵢ·h)
//! ```
//!
//! [`RangeStmt`] reduces `x ∈ [a, b)` to two power-of-two ranges with
//! `2ⁿ ≥ b − a`: `x − a ∈ [0, 2ⁿ)` and `x + 2ⁿ − b ∈ [0, 2ⁿ)`.

use std::sync::Arc;

use ff::{Field, PrimeField};
use group::prime::PrimeGroup;
use num_bigint::BigUint;
use num_traits::One;
use rand_core::CryptoRngCore;
use tracing::instrument;

use crate::composition::Statement;
use crate::errors::Error;
use crate::expression::{Secret, SecretValues};
use crate::extended::{ExtendedStatement, Precommitted};
use crate::group::msm;
use crate::group::serialization::write_len_prefixed;

fn repr_is_little_endian<F: PrimeField>() -> bool {
    F::ONE.to_repr().as_ref().first() == Some(&1)
}

/// The integer in `[0, p)` a scalar stands for.
pub fn scalar_to_biguint<F: PrimeField>(value: &F) -> BigUint {
    let repr = value.to_repr();
    if repr_is_little_endian::<F>() {
        BigUint::from_bytes_le(repr.as_ref())
    } else {
        BigUint::from_bytes_be(repr.as_ref())
    }
}

/// Embeds an integer of at most `F::CAPACITY` bits in the scalar field.
///
/// # Errors
/// [`Error::InvalidExpression`] if the integer is too large.
pub fn biguint_to_scalar<F: PrimeField>(value: &BigUint) -> Result<F, Error> {
    if value.bits() > u64::from(F::CAPACITY) {
        return Err(Error::InvalidExpression(format!(
            "{value} does not fit in the scalar field"
        )));
    }
    let radix = F::from(256);
    Ok(value
        .to_bytes_be()
        .iter()
        .fold(F::ZERO, |acc, byte| acc * radix + F::from(u64::from(*byte))))
}

/// `2^exponent` in the scalar field.
fn power_of_two<F: PrimeField>(exponent: usize) -> F {
    (0..exponent).fold(F::ONE, |acc, _| acc.double())
}

/// `[1, 2, 4, …, 2^(count-1)]`.
fn powers_of_two<F: PrimeField>(count: usize) -> Vec<F> {
    let mut powers = Vec::with_capacity(count);
    let mut power = F::ONE;
    for _ in 0..count {
        powers.push(power);
        power = power.double();
    }
    powers
}

/// Proof that a Pedersen commitment opens to a value in `[0, 2ⁿ)`.
#[derive(Clone, Debug)]
pub struct PowerTwoRangeStmt<G: PrimeGroup> {
    com: G,
    g: G,
    h: G,
    num_bits: usize,
    x: Secret<G::Scalar>,
    r: Secret<G::Scalar>,
    bit_randomizers: Vec<Secret<G::Scalar>>,
}

impl<G: PrimeGroup> PowerTwoRangeStmt<G> {
    /// Statement `com = x·g + r·h` with `0 ≤ x < 2^num_bits`.
    ///
    /// # Errors
    /// [`Error::InvalidExpression`] unless `1 ≤ num_bits < G::Scalar::CAPACITY`.
    pub fn new(
        com: G,
        g: G,
        h: G,
        num_bits: usize,
        x: Secret<G::Scalar>,
        r: Secret<G::Scalar>,
    ) -> Result<Self, Error> {
        if num_bits == 0 || num_bits >= G::Scalar::CAPACITY as usize {
            return Err(Error::InvalidExpression(format!(
                "range of {num_bits} bits is not supported"
            )));
        }
        Ok(Self {
            com,
            g,
            h,
            num_bits,
            x,
            r,
            bit_randomizers: (0..num_bits).map(|_| Secret::new()).collect(),
        })
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    fn opening(&self, values: &SecretValues<G::Scalar>) -> Result<(G::Scalar, G::Scalar), Error> {
        Ok((self.x.value_in(values)?, self.r.value_in(values)?))
    }

    fn opens(&self, x: G::Scalar, r: G::Scalar) -> bool {
        self.g * x + self.h * r == self.com
    }

    fn in_range(&self, x: &G::Scalar) -> bool {
        scalar_to_biguint(x).bits() <= self.num_bits as u64
    }

    /// `Σ 2ⁱ·Cᵢ`.
    fn recombine(&self, bit_commitments: &[G]) -> G {
        msm(&powers_of_two::<G::Scalar>(bit_commitments.len()), bit_commitments)
    }

    /// Solves the last bit commitment so that the weighted sum is `com`.
    fn complete(&self, mut bit_commitments: Vec<G>) -> Result<Vec<G>, Error> {
        let top = Option::<G::Scalar>::from(power_of_two::<G::Scalar>(self.num_bits - 1).invert())
            .ok_or_else(|| Error::InvalidExpression("2^(n-1) is not invertible".into()))?;
        let partial = self.recombine(&bit_commitments);
        bit_commitments.push((self.com - partial) * top);
        Ok(bit_commitments)
    }
}

impl<G: PrimeGroup> ExtendedStatement<G> for PowerTwoRangeStmt<G> {
    fn name(&self) -> &'static str {
        "PowerTwoRange"
    }

    fn secrets(&self) -> Vec<Secret<G::Scalar>> {
        vec![self.x.clone(), self.r.clone()]
    }

    fn public_elements(&self) -> Vec<G> {
        vec![self.com, self.g, self.h]
    }

    fn public_label(&self) -> Vec<u8> {
        (self.num_bits as u32).to_be_bytes().to_vec()
    }

    fn can_prove(&self, values: &SecretValues<G::Scalar>) -> bool {
        matches!(self.opening(values), Ok((x, r)) if self.opens(x, r) && self.in_range(&x))
    }

    #[instrument(skip_all, fields(statement = self.name()))]
    fn precommit(
        &self,
        values: &SecretValues<G::Scalar>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<Precommitted<G>, Error> {
        let (x, r) = self.opening(values)?;
        if !self.opens(x, r) {
            return Err(Error::InvalidWitness(
                "commitment does not open to the given values".into(),
            ));
        }
        if !self.in_range(&x) {
            return Err(Error::InvalidWitness(format!(
                "value does not fit in {} bits",
                self.num_bits
            )));
        }

        let n = self.num_bits;
        let mut randomizers: Vec<G::Scalar> =
            (0..n - 1).map(|_| G::Scalar::random(&mut *rng)).collect();
        let weighted = powers_of_two::<G::Scalar>(n - 1)
            .iter()
            .zip(&randomizers)
            .fold(G::Scalar::ZERO, |acc, (power, randomizer)| acc + *power * randomizer);
        let top = Option::<G::Scalar>::from(power_of_two::<G::Scalar>(n - 1).invert())
            .ok_or_else(|| Error::InvalidExpression("2^(n-1) is not invertible".into()))?;
        randomizers.push((r - weighted) * top);

        let value = scalar_to_biguint(&x);
        let elements = randomizers
            .iter()
            .enumerate()
            .map(|(i, randomizer)| {
                let bit = G::Scalar::from(u64::from(value.bit(i as u64)));
                self.g * bit + self.h * randomizer
            })
            .collect();
        let values = self
            .bit_randomizers
            .iter()
            .cloned()
            .zip(randomizers)
            .collect();
        Ok(Precommitted { elements, values })
    }

    fn simulate_precommit(&self, rng: &mut dyn CryptoRngCore) -> Result<Vec<G>, Error> {
        let free = (1..self.num_bits).map(|_| G::random(&mut *rng)).collect();
        self.complete(free)
    }

    fn construct_statement(&self, precommitment: &[G]) -> Result<Statement<G>, Error> {
        if precommitment.len() != self.num_bits {
            return Err(Error::StatementMismatch);
        }
        let mut bits = precommitment
            .iter()
            .zip(&self.bit_randomizers)
            .map(|(commitment, randomizer)| {
                Statement::or([
                    Statement::dlrep(*commitment, randomizer * self.h)?,
                    Statement::dlrep(*commitment - self.g, randomizer * self.h)?,
                ])
            })
            .collect::<Result<Vec<_>, _>>()?;
        match bits.len() {
            1 => Ok(bits.remove(0)),
            _ => Statement::and(bits),
        }
    }

    fn validate(&self, precommitment: &[G]) -> Result<(), Error> {
        if precommitment.len() != self.num_bits {
            return Err(Error::StatementMismatch);
        }
        if self.recombine(precommitment) != self.com {
            return Err(Error::ValidationFailure(
                "bit commitments do not add up to the commitment".into(),
            ));
        }
        Ok(())
    }

    fn renew_internal_secrets(&self) -> Option<Arc<dyn ExtendedStatement<G>>> {
        Some(Arc::new(Self {
            bit_randomizers: (0..self.num_bits).map(|_| Secret::new()).collect(),
            ..self.clone()
        }))
    }
}

/// Proof that a Pedersen commitment opens to a value in `[lower, upper)`.
#[derive(Clone, Debug)]
pub struct RangeStmt<G: PrimeGroup> {
    com: G,
    g: G,
    h: G,
    lower: BigUint,
    upper: BigUint,
    x: Secret<G::Scalar>,
    r: Secret<G::Scalar>,
    shift_low: G::Scalar,
    shift_high: G::Scalar,
    low: PowerTwoRangeStmt<G>,
    high: PowerTwoRangeStmt<G>,
}

impl<G: PrimeGroup> RangeStmt<G> {
    /// Statement `com = x·g + r·h` with `lower ≤ x < upper`.
    ///
    /// # Errors
    /// [`Error::InvalidExpression`] if the range is empty or its bounds do
    /// not fit in the scalar field.
    pub fn new(
        com: G,
        g: G,
        h: G,
        lower: impl Into<BigUint>,
        upper: impl Into<BigUint>,
        x: Secret<G::Scalar>,
        r: Secret<G::Scalar>,
    ) -> Result<Self, Error> {
        let (lower, upper) = (lower.into(), upper.into());
        if lower >= upper {
            return Err(Error::InvalidExpression(format!(
                "empty range [{lower}, {upper})"
            )));
        }
        let width = &upper - &lower - BigUint::one();
        let num_bits = (width.bits() as usize).max(1);

        let a = biguint_to_scalar::<G::Scalar>(&lower)?;
        let b = biguint_to_scalar::<G::Scalar>(&upper)?;
        let two_n = biguint_to_scalar::<G::Scalar>(&(BigUint::one() << num_bits))?;
        let shift_low = -a;
        let shift_high = two_n - b;

        let low = PowerTwoRangeStmt::new(
            com + g * shift_low,
            g,
            h,
            num_bits,
            Secret::new(),
            r.clone(),
        )?;
        let high = PowerTwoRangeStmt::new(
            com + g * shift_high,
            g,
            h,
            num_bits,
            Secret::new(),
            r.clone(),
        )?;
        Ok(Self {
            com,
            g,
            h,
            lower,
            upper,
            x,
            r,
            shift_low,
            shift_high,
            low,
            high,
        })
    }

    pub fn lower(&self) -> &BigUint {
        &self.lower
    }

    pub fn upper(&self) -> &BigUint {
        &self.upper
    }

    /// Bits of each of the two power-of-two ranges.
    pub fn num_bits(&self) -> usize {
        self.low.num_bits()
    }

    fn contains(&self, x: &G::Scalar) -> bool {
        let value = scalar_to_biguint(x);
        self.lower <= value && value < self.upper
    }
}

impl<G: PrimeGroup> ExtendedStatement<G> for RangeStmt<G> {
    fn name(&self) -> &'static str {
        "Range"
    }

    fn secrets(&self) -> Vec<Secret<G::Scalar>> {
        vec![self.x.clone(), self.r.clone()]
    }

    fn public_elements(&self) -> Vec<G> {
        vec![self.com, self.g, self.h]
    }

    fn public_label(&self) -> Vec<u8> {
        let mut label = Vec::new();
        write_len_prefixed(&mut label, &self.lower.to_bytes_be());
        write_len_prefixed(&mut label, &self.upper.to_bytes_be());
        label
    }

    fn can_prove(&self, values: &SecretValues<G::Scalar>) -> bool {
        match (self.x.value_in(values), self.r.value_in(values)) {
            (Ok(x), Ok(r)) => self.g * x + self.h * r == self.com && self.contains(&x),
            _ => false,
        }
    }

    #[instrument(skip_all, fields(statement = self.name()))]
    fn precommit(
        &self,
        values: &SecretValues<G::Scalar>,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<Precommitted<G>, Error> {
        let x = self.x.value_in(values)?;
        self.r.value_in(values)?;
        if !self.contains(&x) {
            return Err(Error::InvalidWitness(format!(
                "value is outside [{}, {})",
                self.lower, self.upper
            )));
        }
        let values = [
            (self.low.x.clone(), x + self.shift_low),
            (self.high.x.clone(), x + self.shift_high),
        ]
        .into_iter()
        .collect();
        Ok(Precommitted {
            elements: Vec::new(),
            values,
        })
    }

    fn simulate_precommit(&self, _rng: &mut dyn CryptoRngCore) -> Result<Vec<G>, Error> {
        Ok(Vec::new())
    }

    fn construct_statement(&self, precommitment: &[G]) -> Result<Statement<G>, Error> {
        if !precommitment.is_empty() {
            return Err(Error::StatementMismatch);
        }
        Statement::and([
            Statement::extended(self.low.clone()),
            Statement::extended(self.high.clone()),
        ])
    }

    /// The shifted values get new secrets; the bit randomizers are renewed
    /// by the nested nodes themselves.
    fn renew_internal_secrets(&self) -> Option<Arc<dyn ExtendedStatement<G>>> {
        Some(Arc::new(Self {
            low: PowerTwoRangeStmt {
                x: Secret::new(),
                ..self.low.clone()
            },
            high: PowerTwoRangeStmt {
                x: Secret::new(),
                ..self.high.clone()
            },
            ..self.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use curve25519_dalek::{RistrettoPoint, Scalar};
    use group::Group;
    use num_traits::Zero;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    struct Pedersen {
        g: RistrettoPoint,
        h: RistrettoPoint,
        x: Secret<Scalar>,
        r: Secret<Scalar>,
    }

    impl Pedersen {
        fn new(rng: &mut ChaCha20Rng) -> Self {
            Self {
                g: RistrettoPoint::random(&mut *rng),
                h: RistrettoPoint::random(&mut *rng),
                x: Secret::named("x"),
                r: Secret::named("r"),
            }
        }

        fn commit(&self, x: u64, r: Scalar) -> (RistrettoPoint, SecretValues<Scalar>) {
            let x = Scalar::from(x);
            let values = [(self.x.clone(), x), (self.r.clone(), r)].into_iter().collect();
            (self.g * x + self.h * r, values)
        }
    }

    #[test]
    fn scalar_integer_conversions_agree() {
        let n = BigUint::from(0x0123_4567_89ab_cdefu64) << 70;
        let scalar = biguint_to_scalar::<Scalar>(&n).unwrap();
        assert_eq!(scalar_to_biguint(&scalar), n);
        assert_eq!(biguint_to_scalar::<Scalar>(&BigUint::zero()).unwrap(), Scalar::ZERO);
        assert!(biguint_to_scalar::<Scalar>(&(BigUint::one() << 300)).is_err());
    }

    #[test]
    fn bit_commitments_recombine_to_the_commitment() {
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        let ped = Pedersen::new(&mut rng);
        let (com, mut values) = ped.commit(0b1011, Scalar::random(&mut rng));
        let stmt =
            PowerTwoRangeStmt::new(com, ped.g, ped.h, 4, ped.x.clone(), ped.r.clone()).unwrap();

        assert!(stmt.can_prove(&values));
        let precommitted = stmt.precommit(&values, &mut rng).unwrap();
        assert_eq!(precommitted.elements.len(), 4);
        assert!(stmt.validate(&precommitted.elements).is_ok());

        values.extend(precommitted.values);
        let inner = stmt.construct_statement(&precommitted.elements).unwrap();
        assert!(inner.is_satisfied(&values));
    }

    #[test]
    fn out_of_range_values_are_refused() {
        let mut rng = ChaCha20Rng::seed_from_u64(32);
        let ped = Pedersen::new(&mut rng);
        let (com, values) = ped.commit(16, Scalar::random(&mut rng));
        let stmt = PowerTwoRangeStmt::new(com, ped.g, ped.h, 4, ped.x.clone(), ped.r.clone()).unwrap();

        assert!(!stmt.can_prove(&values));
        assert!(matches!(
            stmt.precommit(&values, &mut rng),
            Err(Error::InvalidWitness(_))
        ));
    }

    #[test]
    fn simulated_bit_commitments_pass_validation() {
        let mut rng = ChaCha20Rng::seed_from_u64(33);
        let ped = Pedersen::new(&mut rng);
        let com = RistrettoPoint::random(&mut rng);
        for bits in [1, 2, 8] {
            let stmt =
                PowerTwoRangeStmt::new(com, ped.g, ped.h, bits, ped.x.clone(), ped.r.clone())
                    .unwrap();
            let simulated = stmt.simulate_precommit(&mut rng).unwrap();
            assert_eq!(simulated.len(), bits);
            assert!(stmt.validate(&simulated).is_ok());
        }
    }

    #[test]
    fn single_bit_range_is_a_bare_or() {
        let mut rng = ChaCha20Rng::seed_from_u64(34);
        let ped = Pedersen::new(&mut rng);
        let stmt = PowerTwoRangeStmt::new(ped.g, ped.g, ped.h, 1, ped.x.clone(), ped.r.clone())
            .unwrap();
        let inner = stmt.construct_statement(&[ped.g]).unwrap();
        assert!(matches!(inner.kind(), crate::StatementKind::Or(_)));
    }

    #[test]
    fn unsupported_widths_are_rejected() {
        let ped = Pedersen::new(&mut ChaCha20Rng::seed_from_u64(35));
        for bits in [0, 300] {
            assert!(PowerTwoRangeStmt::new(ped.g, ped.g, ped.h, bits, ped.x.clone(), ped.r.clone())
                .is_err());
        }
    }

    #[test]
    fn range_bounds_are_inclusive_exclusive() {
        let mut rng = ChaCha20Rng::seed_from_u64(36);
        let ped = Pedersen::new(&mut rng);
        let r = Scalar::random(&mut rng);
        for (x, inside) in [(9u64, false), (10, true), (17, true), (18, false)] {
            let (com, values) = ped.commit(x, r);
            let stmt =
                RangeStmt::new(com, ped.g, ped.h, 10u64, 18u64, ped.x.clone(), ped.r.clone())
                    .unwrap();
            assert_eq!(stmt.num_bits(), 3);
            assert_eq!(stmt.can_prove(&values), inside, "x = {x}");
        }
    }

    #[test]
    fn empty_range_is_rejected() {
        let ped = Pedersen::new(&mut ChaCha20Rng::seed_from_u64(37));
        assert!(matches!(
            RangeStmt::new(ped.g, ped.g, ped.h, 5u64, 5u64, ped.x.clone(), ped.r.clone()),
            Err(Error::InvalidExpression(_))
        ));
    }
}
