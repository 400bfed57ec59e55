//! Coefficient rings and the targets of tree functions

use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// A commutative ring with unit, as needed to accumulate products and sums
/// of tree-function values.
pub trait Ring:
    Clone
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
}

impl<T> Ring for T where
    T: Clone + Zero + One + Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Neg<Output = T>
{
}

/// Coefficients of a [`FormalSum`](super::FormalSum).
///
/// Any host numeric type with ring operations qualifies: machine integers,
/// `f64`, or exact rationals such as `num_rational::Rational64`.
pub trait Scalar: Ring + PartialEq + Debug + Send + Sync + 'static {}

impl<T> Scalar for T where T: Ring + PartialEq + Debug + Send + Sync + 'static {}

/// A ring that scalars of type `S` embed into.
///
/// This is the target of a tree function that is extended linearly to
/// formal sums: the coefficients of the sum have to be carried over into the
/// result.
pub trait Algebra<S: Scalar>: Ring {
    /// Image of a scalar under the unit map
    fn from_scalar(c: S) -> Self;
}

impl<S: Scalar> Algebra<S> for S {
    fn from_scalar(c: S) -> S {
        c
    }
}
