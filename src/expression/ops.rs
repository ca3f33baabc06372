//! Operators building [`Expression`]s: `secret * base` and `expr + expr`.

use core::ops::{Add, AddAssign, Mul};
use group::Group;

use super::{Expression, Secret, Term};

mod mul {
    use super::*;

    impl<G: Group> Mul<G> for Secret<G::Scalar> {
        type Output = Expression<G>;

        fn mul(self, base: G) -> Self::Output {
            Expression::new(self, base)
        }
    }

    impl<G: Group> Mul<G> for &Secret<G::Scalar> {
        type Output = Expression<G>;

        fn mul(self, base: G) -> Self::Output {
            Expression::new(self.clone(), base)
        }
    }
}

mod add {
    use super::*;

    impl<G: Group> Add<Expression<G>> for Expression<G> {
        type Output = Expression<G>;

        fn add(mut self, rhs: Expression<G>) -> Self::Output {
            self.terms.extend(rhs.terms);
            self
        }
    }

    impl<G: Group> Add<Term<G>> for Expression<G> {
        type Output = Expression<G>;

        fn add(mut self, rhs: Term<G>) -> Self::Output {
            self.terms.push(rhs);
            self
        }
    }

    impl<G: Group> AddAssign<Expression<G>> for Expression<G> {
        fn add_assign(&mut self, rhs: Expression<G>) {
            self.terms.extend(rhs.terms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::SecretValues;
    use curve25519_dalek::{RistrettoPoint, Scalar};

    #[test]
    fn operators_keep_term_order() {
        let mut rng = rand::thread_rng();
        let g = RistrettoPoint::random(&mut rng);
        let h = RistrettoPoint::random(&mut rng);
        let x = Secret::named("x");
        let y = Secret::named("y");

        let mut expr = &x * g + &y * h;
        expr += x.clone() * h;

        let names: Vec<_> = expr.terms().iter().map(|t| t.secret.name()).collect();
        assert_eq!(names, ["x", "y", "x"]);
        assert_eq!(expr.secrets().len(), 2);

        let values = SecretValues::from([(x, Scalar::from(2u64)), (y, Scalar::from(5u64))]);
        let expected = g * Scalar::from(2u64) + h * Scalar::from(7u64);
        assert_eq!(expr.eval_with(&values).unwrap(), expected);
    }

    #[test]
    fn eval_requires_every_value() {
        let g = RistrettoPoint::generator();
        let expr = Secret::<Scalar>::named("x").with_value(Scalar::from(3u64)) * g
            + Secret::named("missing") * g;
        assert!(matches!(
            expr.eval(),
            Err(crate::Error::IncompleteValues { name }) if name == "missing"
        ));
    }
}
