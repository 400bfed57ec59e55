//! Arithmetic operators across trees, forests, formal sums and scalars.
//!
//! Products of trees and forests stay forests; anything involving a sum or a
//! coefficient becomes a [`FormalSum`]. Every result is reduced.

use super::{Forest, FormalSum, Scalar, Tree};
use num_rational::Rational64;
use std::ops::{Add, Mul, Neg, Sub};

// Forest products

impl Mul for Tree {
    type Output = Forest;

    fn mul(self, rhs: Tree) -> Forest {
        Forest::new(vec![self, rhs]).reduce()
    }
}

impl Mul<Forest> for Tree {
    type Output = Forest;

    fn mul(self, rhs: Forest) -> Forest {
        self.as_forest().multiply(&rhs)
    }
}

impl Mul<Tree> for Forest {
    type Output = Forest;

    fn mul(self, rhs: Tree) -> Forest {
        self.multiply(&rhs.as_forest())
    }
}

impl Mul for Forest {
    type Output = Forest;

    fn mul(self, rhs: Forest) -> Forest {
        self.multiply(&rhs)
    }
}

impl<'a> Mul<&'a Forest> for &'a Forest {
    type Output = Forest;

    fn mul(self, rhs: &'a Forest) -> Forest {
        self.multiply(rhs)
    }
}

// Formal sums

impl<S: Scalar> Add for FormalSum<S> {
    type Output = FormalSum<S>;

    fn add(self, rhs: FormalSum<S>) -> FormalSum<S> {
        self.plus(&rhs)
    }
}

impl<S: Scalar> Sub for FormalSum<S> {
    type Output = FormalSum<S>;

    fn sub(self, rhs: FormalSum<S>) -> FormalSum<S> {
        self.minus(&rhs)
    }
}

impl<S: Scalar> Mul for FormalSum<S> {
    type Output = FormalSum<S>;

    fn mul(self, rhs: FormalSum<S>) -> FormalSum<S> {
        self.times(&rhs)
    }
}

impl<S: Scalar> Neg for FormalSum<S> {
    type Output = FormalSum<S>;

    fn neg(self) -> FormalSum<S> {
        self.negate()
    }
}

impl<'a, S: Scalar> Add<&'a FormalSum<S>> for &'a FormalSum<S> {
    type Output = FormalSum<S>;

    fn add(self, rhs: &'a FormalSum<S>) -> FormalSum<S> {
        self.plus(rhs)
    }
}

impl<'a, S: Scalar> Sub<&'a FormalSum<S>> for &'a FormalSum<S> {
    type Output = FormalSum<S>;

    fn sub(self, rhs: &'a FormalSum<S>) -> FormalSum<S> {
        self.minus(rhs)
    }
}

impl<'a, S: Scalar> Mul<&'a FormalSum<S>> for &'a FormalSum<S> {
    type Output = FormalSum<S>;

    fn mul(self, rhs: &'a FormalSum<S>) -> FormalSum<S> {
        self.times(rhs)
    }
}

impl<'a, S: Scalar> Neg for &'a FormalSum<S> {
    type Output = FormalSum<S>;

    fn neg(self) -> FormalSum<S> {
        self.negate()
    }
}

/// Lift `Tree` and `Forest` operands to a sum when the other side is a sum
macro_rules! lift_into_sum {
    ($($kind:ty),*) => {$(
        impl<S: Scalar> Add<FormalSum<S>> for $kind {
            type Output = FormalSum<S>;

            fn add(self, rhs: FormalSum<S>) -> FormalSum<S> {
                FormalSum::<S>::from(self).plus(&rhs)
            }
        }

        impl<S: Scalar> Add<$kind> for FormalSum<S> {
            type Output = FormalSum<S>;

            fn add(self, rhs: $kind) -> FormalSum<S> {
                self.plus(&FormalSum::<S>::from(rhs))
            }
        }

        impl<S: Scalar> Sub<FormalSum<S>> for $kind {
            type Output = FormalSum<S>;

            fn sub(self, rhs: FormalSum<S>) -> FormalSum<S> {
                FormalSum::<S>::from(self).minus(&rhs)
            }
        }

        impl<S: Scalar> Sub<$kind> for FormalSum<S> {
            type Output = FormalSum<S>;

            fn sub(self, rhs: $kind) -> FormalSum<S> {
                self.minus(&FormalSum::<S>::from(rhs))
            }
        }

        impl<S: Scalar> Mul<FormalSum<S>> for $kind {
            type Output = FormalSum<S>;

            fn mul(self, rhs: FormalSum<S>) -> FormalSum<S> {
                rhs.multiply_forest(&Forest::from(self))
            }
        }

        impl<S: Scalar> Mul<$kind> for FormalSum<S> {
            type Output = FormalSum<S>;

            fn mul(self, rhs: $kind) -> FormalSum<S> {
                self.multiply_forest(&Forest::from(rhs))
            }
        }

        impl<S: Scalar> PartialEq<FormalSum<S>> for $kind {
            fn eq(&self, other: &FormalSum<S>) -> bool {
                FormalSum::<S>::from(self.clone()) == *other
            }
        }

        impl<S: Scalar> PartialEq<$kind> for FormalSum<S> {
            fn eq(&self, other: &$kind) -> bool {
                *self == FormalSum::<S>::from(other.clone())
            }
        }
    )*};
}

lift_into_sum!(Tree, Forest);

impl PartialEq<Forest> for Tree {
    fn eq(&self, other: &Forest) -> bool {
        self.as_forest() == *other
    }
}

impl PartialEq<Tree> for Forest {
    fn eq(&self, other: &Tree) -> bool {
        *self == other.as_forest()
    }
}

/// `scalar ± kind` and `kind ± scalar` for a tree or forest operand
macro_rules! scalar_sum_ops {
    ($s:ty; $($kind:ty),*) => {$(
        impl Add<$kind> for $s {
            type Output = FormalSum<$s>;

            fn add(self, rhs: $kind) -> FormalSum<$s> {
                FormalSum::scalar(self).plus(&FormalSum::<$s>::from(rhs))
            }
        }

        impl Add<$s> for $kind {
            type Output = FormalSum<$s>;

            fn add(self, rhs: $s) -> FormalSum<$s> {
                FormalSum::<$s>::from(self).plus(&FormalSum::scalar(rhs))
            }
        }

        impl Sub<$kind> for $s {
            type Output = FormalSum<$s>;

            fn sub(self, rhs: $kind) -> FormalSum<$s> {
                FormalSum::scalar(self).minus(&FormalSum::<$s>::from(rhs))
            }
        }

        impl Sub<$s> for $kind {
            type Output = FormalSum<$s>;

            fn sub(self, rhs: $s) -> FormalSum<$s> {
                FormalSum::<$s>::from(self).minus(&FormalSum::scalar(rhs))
            }
        }
    )*};
}

/// Operators with a coefficient on either side. The coefficient type fixes
/// the scalar type of the resulting sum.
macro_rules! scalar_ops {
    ($($s:ty),*) => {$(
        scalar_sum_ops!($s; Tree, Forest);

        impl Mul<Tree> for $s {
            type Output = FormalSum<$s>;

            fn mul(self, rhs: Tree) -> FormalSum<$s> {
                rhs.scale(self)
            }
        }

        impl Mul<$s> for Tree {
            type Output = FormalSum<$s>;

            fn mul(self, rhs: $s) -> FormalSum<$s> {
                self.scale(rhs)
            }
        }

        impl Mul<Forest> for $s {
            type Output = FormalSum<$s>;

            fn mul(self, rhs: Forest) -> FormalSum<$s> {
                rhs.scale(self)
            }
        }

        impl Mul<$s> for Forest {
            type Output = FormalSum<$s>;

            fn mul(self, rhs: $s) -> FormalSum<$s> {
                self.scale(rhs)
            }
        }

        impl Mul<FormalSum<$s>> for $s {
            type Output = FormalSum<$s>;

            fn mul(self, rhs: FormalSum<$s>) -> FormalSum<$s> {
                rhs.scale(self)
            }
        }

        impl Mul<$s> for FormalSum<$s> {
            type Output = FormalSum<$s>;

            fn mul(self, rhs: $s) -> FormalSum<$s> {
                self.scale(rhs)
            }
        }

        impl Add<FormalSum<$s>> for $s {
            type Output = FormalSum<$s>;

            fn add(self, rhs: FormalSum<$s>) -> FormalSum<$s> {
                FormalSum::scalar(self).plus(&rhs)
            }
        }

        impl Add<$s> for FormalSum<$s> {
            type Output = FormalSum<$s>;

            fn add(self, rhs: $s) -> FormalSum<$s> {
                self.plus(&FormalSum::scalar(rhs))
            }
        }

        impl Sub<$s> for FormalSum<$s> {
            type Output = FormalSum<$s>;

            fn sub(self, rhs: $s) -> FormalSum<$s> {
                self.minus(&FormalSum::scalar(rhs))
            }
        }

        impl Sub<FormalSum<$s>> for $s {
            type Output = FormalSum<$s>;

            fn sub(self, rhs: FormalSum<$s>) -> FormalSum<$s> {
                FormalSum::scalar(self).minus(&rhs)
            }
        }

        impl PartialEq<$s> for FormalSum<$s> {
            fn eq(&self, other: &$s) -> bool {
                *self == FormalSum::scalar(other.clone())
            }
        }
    )*};
}

scalar_ops!(i32, i64, i128, f64, Rational64);

/// Sums and differences of trees and forests. Neither operand fixes the
/// coefficient type, so these are methods generic over `S` rather than
/// operators.
macro_rules! sum_methods {
    ($($kind:ty),*) => {$(
        impl $kind {
            /// `self + other` as a formal sum
            pub fn plus<S, T>(&self, other: T) -> FormalSum<S>
            where
                S: Scalar,
                T: Into<FormalSum<S>>,
            {
                FormalSum::<S>::from(self.clone()).plus(&other.into())
            }

            /// `self - other` as a formal sum
            pub fn minus<S, T>(&self, other: T) -> FormalSum<S>
            where
                S: Scalar,
                T: Into<FormalSum<S>>,
            {
                FormalSum::<S>::from(self.clone()).minus(&other.into())
            }

            /// `-self` as a formal sum
            pub fn negate<S: Scalar>(&self) -> FormalSum<S> {
                FormalSum::<S>::from(self.clone()).negate()
            }
        }
    )*};
}

sum_methods!(Tree, Forest);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Antipode;

    fn t(s: &str) -> Tree {
        s.parse().unwrap()
    }

    #[test]
    fn test_tree_products_are_forests() {
        let a = t("[[]]");
        let b = Tree::leaf();

        let forest = a.clone() * b.clone();
        assert_eq!(forest.num_trees(), 2);
        assert_eq!(forest, b.clone() * a.clone());

        let bigger = forest.clone() * a.clone();
        assert_eq!(bigger, a.clone() * forest.clone());
        assert_eq!(bigger.nodes(), 5);

        // ∅ is transparent in products
        assert_eq!(Tree::void() * a.clone(), a);
        assert_eq!(b.pow(0), Forest::unit());
    }

    #[test]
    fn test_scalar_products_promote_to_sums() {
        let a = t("[[],[]]");
        let s = 3i64 * a.clone();
        assert_eq!(s.coefficient(&a.as_forest()), 3);
        assert_eq!(s, a.clone() * 3i64);
        assert_eq!(s.clone() * 2i64, 6i64 * a.clone());
        assert_eq!(2i64 * Forest::single(a.clone()), a.scale(2i64));
    }

    #[test]
    fn test_tree_plus_tree_needs_a_sum() {
        let a = t("[[]]");
        let b = t("[[[]]]");
        let s = FormalSum::<i64>::from(a.clone()) + b.clone();
        assert_eq!(s.num_forests(), 2);

        let doubled = FormalSum::<i64>::from(a.clone()) + a.clone();
        assert_eq!(doubled, 2i64 * a.clone());

        let cancelled = FormalSum::<i64>::from(a.clone()) - a.clone();
        assert!(cancelled.is_zero());
        assert_eq!(cancelled, 0i64);
    }

    #[test]
    fn test_scalar_plus_tree() {
        let a = t("[[]]");
        let s = 1i64 + a.clone();
        assert_eq!(s.coefficient(&Forest::unit()), 1);
        assert_eq!(s.coefficient(&a.as_forest()), 1);
        assert_eq!(s.clone() - 1i64, a);
        assert_eq!(a.clone() + 1i64, s);
    }

    #[test]
    fn test_scalar_with_forest_and_difference() {
        let a = t("[[]]");
        let forest = a.clone() * Tree::leaf();

        let s = 2i64 + forest.clone();
        assert_eq!(s.coefficient(&Forest::unit()), 2);
        assert_eq!(s.coefficient(&forest), 1);
        assert_eq!(forest.clone() + 2i64, s);

        let d = forest.clone() - 2i64;
        assert_eq!(d.coefficient(&Forest::unit()), -2);
        assert_eq!(2i64 - forest.clone(), -d);

        let e = a.clone() - 1i64;
        assert_eq!(e.coefficient(&a.as_forest()), 1);
        assert_eq!(e.coefficient(&Forest::unit()), -1);
        assert_eq!(1i64 - a.clone(), -e);
        assert_eq!(Rational64::new(1, 2) - a.clone(), -(a - Rational64::new(1, 2)));
    }

    #[test]
    fn test_sum_methods_on_trees_and_forests() {
        let a = t("[[]]");
        let b = t("[[],[]]");

        let s: FormalSum<i64> = a.plus(b.clone());
        assert_eq!(s.num_forests(), 2);
        assert_eq!(s, FormalSum::<i64>::from(a.clone()) + b.clone());
        assert_eq!(a.plus::<i64, _>(a.clone()), 2i64 * a.clone());
        assert!(a.minus::<i64, _>(a.clone()).is_zero());

        let forest = a.clone() * b.clone();
        let mixed: FormalSum<i64> = a.minus(forest.clone());
        assert_eq!(mixed.coefficient(&forest), -1);
        assert_eq!(forest.plus::<i64, _>(forest.clone()), 2i64 * forest.clone());
        assert!(forest.minus::<i64, _>(forest.clone()).is_zero());

        let neg: FormalSum<i64> = a.negate();
        assert_eq!(neg, -1i64 * a.clone());
        assert_eq!(forest.negate::<i64>() + forest.clone(), 0i64);
        assert_eq!(a.plus::<i64, _>(3i64 * b.clone()).coefficient(&b.as_forest()), 3);
    }

    #[test]
    fn test_sum_arithmetic() {
        let a: FormalSum<i64> = t("[[]]").into();
        let b: FormalSum<i64> = 2i64 * Tree::leaf();

        // (a + b)^2 = a^2 + 2ab + b^2
        let lhs = (a.clone() + b.clone()).pow(2);
        let rhs = a.clone() * a.clone() + 2i64 * (a.clone() * b.clone()) + b.clone() * b.clone();
        assert_eq!(lhs, rhs);

        assert_eq!(-(&a - &b), &b - &a);
        assert_eq!(&a * &b, b.clone() * a.clone());
    }

    #[test]
    fn test_tree_times_sum() {
        let a = t("[[]]");
        let s: FormalSum<i64> = 1i64 + Tree::leaf();
        let product = a.clone() * s.clone();
        assert_eq!(product, s * a.clone());
        assert_eq!(product.coefficient(&a.as_forest()), 1);
        assert_eq!(product.coefficient(&(a * Tree::leaf())), 1);
    }

    #[test]
    fn test_polymorphic_equality() {
        let a = t("[[],[[]]]");
        let mirrored = t("[[[]],[]]");

        assert_eq!(a, mirrored);
        assert_eq!(a, Forest::single(mirrored.clone()));
        assert_eq!(Forest::single(a.clone()), mirrored);
        assert_eq!(a, FormalSum::<i64>::from(mirrored.clone()));
        assert_eq!(FormalSum::<i64>::from(a.clone()), Forest::single(mirrored.clone()));

        // A sum equals a tree only with coefficient 1
        assert_ne!(2i64 * a.clone(), a);
        assert_ne!(a, a.clone() * Tree::leaf());
    }

    #[test]
    fn test_rational_and_float_coefficients() {
        let half = Rational64::new(1, 2);
        let s = half * t("[[]]") + half * t("[[]]");
        assert_eq!(s, t("[[]]"));

        let f = 0.5f64 * Tree::leaf();
        let signed: FormalSum<f64> = Tree::leaf().antipode().unwrap();
        assert_eq!(f.clone() * -2.0f64, signed);
    }
}
