//! Formal linear combinations of forests

use super::{Algebra, Forest, Scalar, Tree};
use crate::{HopfError, Result};
use num_traits::{One, Zero};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A general element of the Hopf algebra, `Σ cᵢ · Fᵢ`.
///
/// Every arithmetic operation returns a reduced sum: one term per distinct
/// forest (up to isomorphism), no zero coefficients, and the zero element
/// represented as the single term `0 · ∅`.
#[derive(Clone)]
pub struct FormalSum<S> {
    terms: Vec<(Forest, S)>,
}

impl<S: Scalar> FormalSum<S> {
    /// Create a sum from parallel lists of forests and coefficients.
    ///
    /// With `coefficients = None` every coefficient is 1. The result is not
    /// reduced.
    pub fn new(forests: Vec<Forest>, coefficients: Option<Vec<S>>) -> Result<Self> {
        let coefficients = match coefficients {
            Some(c) if c.len() != forests.len() => {
                return Err(HopfError::LengthMismatch {
                    forests: forests.len(),
                    coefficients: c.len(),
                })
            }
            Some(c) => c,
            None => vec![S::one(); forests.len()],
        };
        Ok(FormalSum {
            terms: forests.into_iter().zip(coefficients).collect(),
        })
    }

    /// Collect terms into a reduced sum
    pub fn from_terms<I: IntoIterator<Item = (Forest, S)>>(terms: I) -> Self {
        FormalSum {
            terms: terms.into_iter().collect(),
        }
        .reduce()
    }

    /// The single term `c · f`, reduced
    pub fn term(forest: Forest, c: S) -> Self {
        Self::from_terms([(forest, c)])
    }

    /// `c · ∅`
    pub fn scalar(c: S) -> Self {
        Self::term(Forest::unit(), c)
    }

    /// Merge isomorphic forests, drop zero coefficients and normalize the
    /// empty result to `0 · ∅`.
    pub fn reduce(&self) -> Self {
        let mut index: HashMap<Forest, usize> = HashMap::with_capacity(self.terms.len());
        let mut merged: Vec<(Forest, S)> = Vec::with_capacity(self.terms.len());

        for (forest, c) in &self.terms {
            let forest = forest.reduce();
            match index.get(&forest) {
                Some(&i) => {
                    let sum = merged[i].1.clone() + c.clone();
                    merged[i].1 = sum;
                }
                None => {
                    index.insert(forest.clone(), merged.len());
                    merged.push((forest, c.clone()));
                }
            }
        }

        merged.retain(|(_, c)| !c.is_zero());
        if merged.is_empty() {
            merged.push((Forest::unit(), S::zero()));
        }
        FormalSum { terms: merged }
    }

    /// Iterate over `(forest, coefficient)` terms
    pub fn terms(&self) -> impl Iterator<Item = (&Forest, &S)> {
        self.terms.iter().map(|(f, c)| (f, c))
    }

    /// Coefficient of `forest` in the reduced sum
    pub fn coefficient(&self, forest: &Forest) -> S {
        self.terms
            .iter()
            .filter(|(f, _)| f == forest)
            .fold(S::zero(), |acc, (_, c)| acc + c.clone())
    }

    /// Whether the sum reduces to zero
    pub fn is_zero(&self) -> bool {
        self.reduce().terms.iter().all(|(_, c)| c.is_zero())
    }

    /// Total number of nodes over all terms
    pub fn nodes(&self) -> usize {
        self.terms.iter().map(|(f, _)| f.nodes()).sum()
    }

    /// Total number of tree factors over all terms
    pub fn num_trees(&self) -> usize {
        self.terms.iter().map(|(f, _)| f.num_trees()).sum()
    }

    /// Number of terms
    pub fn num_forests(&self) -> usize {
        self.terms.len()
    }

    /// Add two sums
    pub fn plus(&self, other: &FormalSum<S>) -> FormalSum<S> {
        Self::from_terms(self.terms.iter().chain(&other.terms).cloned())
    }

    /// Subtract `other` from this sum
    pub fn minus(&self, other: &FormalSum<S>) -> FormalSum<S> {
        self.plus(&other.negate())
    }

    /// `-s`
    pub fn negate(&self) -> FormalSum<S> {
        self.scale(-S::one())
    }

    /// Scalar multiplication
    pub fn scale(&self, scalar: S) -> FormalSum<S> {
        Self::from_terms(self.terms.iter().map(|(f, c)| (f.clone(), c.clone() * scalar.clone())))
    }

    /// Multiply two sums (using forest multiplication)
    pub fn times(&self, other: &FormalSum<S>) -> FormalSum<S> {
        Self::from_terms(self.terms.iter().flat_map(|(f1, c1)| {
            other
                .terms
                .iter()
                .map(move |(f2, c2)| (f1.multiply(f2), c1.clone() * c2.clone()))
        }))
    }

    /// Multiply every term by a forest
    pub fn multiply_forest(&self, forest: &Forest) -> FormalSum<S> {
        Self::from_terms(self.terms.iter().map(|(f, c)| (f.multiply(forest), c.clone())))
    }

    /// The `n`-th power; `n = 0` gives `1 · ∅`
    pub fn pow(&self, n: u32) -> FormalSum<S> {
        (0..n).fold(Self::one(), |acc, _| acc.times(self))
    }

    /// Like [`FormalSum::pow`] for a signed exponent; negative exponents are
    /// rejected.
    pub fn try_pow(&self, n: i64) -> Result<FormalSum<S>> {
        let n = u32::try_from(n).map_err(|_| HopfError::InvalidExponent(n))?;
        Ok(self.pow(n))
    }

    /// Replace every forest `f` by `(-1)^|f| f`
    pub fn sign(&self) -> FormalSum<S> {
        Self::from_terms(self.terms.iter().map(|(f, c)| {
            let c = if f.nodes() % 2 == 0 { c.clone() } else { -c.clone() };
            (f.clone(), c)
        }))
    }

    /// Apply [`Forest::singleton_reduced`] to every term
    pub fn singleton_reduced(&self) -> FormalSum<S> {
        Self::from_terms(self.terms.iter().map(|(f, c)| (f.singleton_reduced(), c.clone())))
    }

    /// `Σ cᵢ Fᵢ!`, the tree factorial extended linearly over the sum.
    ///
    /// Forest factorials use checked `u128` arithmetic and surface
    /// [`HopfError::Overflow`] instead of wrapping.
    pub fn factorial(&self) -> Result<S> {
        self.terms.iter().try_fold(S::zero(), |acc, (f, c)| {
            Ok(acc + c.clone() * scalar_from_u128::<S>(f.factorial()?))
        })
    }

    /// Reduced terms in forest order, for order-independent comparisons
    fn sorted_terms(&self) -> Vec<(Forest, S)> {
        let mut terms = self.reduce().terms;
        terms.sort_by(|a, b| a.0.cmp(&b.0));
        terms
    }
}

/// `n · 1` in `S`, by binary doubling
fn scalar_from_u128<S: Scalar>(n: u128) -> S {
    let mut out = S::zero();
    for bit in (0..u128::BITS - n.leading_zeros()).rev() {
        out = out.clone() + out;
        if (n >> bit) & 1 == 1 {
            out = out + S::one();
        }
    }
    out
}

impl<S: Scalar> From<Tree> for FormalSum<S> {
    fn from(tree: Tree) -> Self {
        FormalSum::term(Forest::single(tree), S::one())
    }
}

impl<S: Scalar> From<Forest> for FormalSum<S> {
    fn from(forest: Forest) -> Self {
        FormalSum::term(forest, S::one())
    }
}

impl<S: Scalar> Zero for FormalSum<S> {
    fn zero() -> Self {
        FormalSum::scalar(S::zero())
    }

    fn is_zero(&self) -> bool {
        FormalSum::is_zero(self)
    }
}

impl<S: Scalar> One for FormalSum<S> {
    fn one() -> Self {
        FormalSum::scalar(S::one())
    }
}

impl<S: Scalar> Algebra<S> for FormalSum<S> {
    fn from_scalar(c: S) -> Self {
        FormalSum::scalar(c)
    }
}

impl<S: Scalar> PartialEq for FormalSum<S> {
    fn eq(&self, other: &Self) -> bool {
        let a = self.reduce();
        let b = other.reduce();
        if a.terms.len() != b.terms.len() {
            return false;
        }
        let lookup: HashMap<&Forest, &S> = b.terms.iter().map(|(f, c)| (f, c)).collect();
        a.terms.iter().all(|(f, c)| lookup.get(f).map_or(false, |other_c| *other_c == c))
    }
}

impl<S: Scalar + Eq> Eq for FormalSum<S> {}

impl<S: Scalar + Hash> Hash for FormalSum<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (forest, c) in self.sorted_terms() {
            forest.hash(state);
            c.hash(state);
        }
    }
}

impl<S: Scalar + fmt::Display> fmt::Display for FormalSum<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (forest, c)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}*{}", c, forest)?;
        }
        Ok(())
    }
}

impl<S: Scalar> fmt::Debug for FormalSum<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.terms.iter().map(|(forest, c)| (forest, c))).finish()
    }
}
