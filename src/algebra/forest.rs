//! Forest: a commutative product of rooted trees

use super::{FormalSum, Scalar, Tree};
use crate::Result;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A forest is a commutative product of trees, stored as a sorted vector.
///
/// The void tree ∅ is the unit of the product: `Forest::unit()` holds a
/// single ∅ factor, and ∅ factors are ignored by equality and hashing.
/// `Forest::empty()` holds no factors at all; it compares equal to the unit
/// but has no antipode.
#[derive(Clone)]
pub struct Forest {
    trees: Vec<Tree>,
}

impl Forest {
    /// A forest with no factors
    pub fn empty() -> Self {
        Forest { trees: Vec::new() }
    }

    /// The reduced empty forest, a single ∅ factor
    pub fn unit() -> Self {
        Forest {
            trees: vec![Tree::void()],
        }
    }

    /// Create a forest from a vector of trees
    pub fn new(mut trees: Vec<Tree>) -> Self {
        trees.sort();
        Forest { trees }
    }

    /// Create a forest with a single tree
    pub fn single(tree: Tree) -> Self {
        Forest { trees: vec![tree] }
    }

    /// Check if the forest has no factors
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Whether the forest equals the unit, i.e. has no non-void factors
    pub fn is_unit(&self) -> bool {
        self.factors().is_empty()
    }

    /// Number of factors, including ∅ factors
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Get the trees
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Create iterator over trees
    pub fn iter(&self) -> std::slice::Iter<'_, Tree> {
        self.trees.iter()
    }

    /// The non-void factors
    fn factors(&self) -> &[Tree] {
        // ∅ sorts before every real tree
        let first_real = self.trees.partition_point(Tree::is_void);
        &self.trees[first_real..]
    }

    /// Get the total number of nodes across all trees
    pub fn nodes(&self) -> usize {
        self.trees.iter().map(Tree::nodes).sum()
    }

    /// Π t! over the factors
    pub fn factorial(&self) -> Result<u128> {
        self.trees.iter().try_fold(1u128, |acc, t| {
            let f = t.factorial()?;
            acc.checked_mul(f).ok_or(crate::HopfError::Overflow {
                quantity: "forest factorial",
                nodes: self.nodes(),
            })
        })
    }

    /// Drop ∅ factors, leaving a single ∅ if nothing else remains
    pub fn reduce(&self) -> Forest {
        let factors = self.factors();
        if factors.is_empty() {
            Forest::unit()
        } else {
            Forest {
                trees: factors.to_vec(),
            }
        }
    }

    /// Multiply two forests (concatenate, sort and reduce)
    pub fn multiply(&self, other: &Forest) -> Forest {
        let mut trees = self.trees.clone();
        trees.extend(other.trees.iter().cloned());
        Forest::new(trees).reduce()
    }

    /// The product of `n` copies of this forest; `n = 0` gives ∅
    pub fn pow(&self, n: u32) -> Forest {
        let factors = self.factors();
        let mut trees = Vec::with_capacity(factors.len() * n as usize);
        for _ in 0..n {
            trees.extend(factors.iter().cloned());
        }
        Forest::new(trees).reduce()
    }

    /// For `t1 ⋯ tk`, the tree `[t1, ..., tk]`
    pub fn join(&self) -> Tree {
        Tree::new(self.factors().to_vec())
    }

    /// Drop redundant single-node factors.
    ///
    /// If the forest contains a tree with more than one node, every • factor
    /// is removed; a forest made only of • factors collapses to one •.
    pub fn singleton_reduced(&self) -> Forest {
        let out = self.reduce();
        if out.trees.len() <= 1 {
            return out;
        }
        let trees: Vec<Tree> = out.trees.into_iter().filter(|t| !t.is_leaf()).collect();
        if trees.is_empty() {
            Forest::single(Tree::leaf())
        } else {
            Forest { trees }
        }
    }

    /// `1 · f`
    pub fn as_forest_sum<S: Scalar>(&self) -> FormalSum<S> {
        FormalSum::from(self.clone())
    }

    /// `c · f`
    pub fn scale<S: Scalar>(&self, c: S) -> FormalSum<S> {
        FormalSum::term(self.clone(), c)
    }

    /// `(-1)^|f| f`
    pub fn sign<S: Scalar>(&self) -> FormalSum<S> {
        if self.nodes() % 2 == 0 {
            self.as_forest_sum()
        } else {
            self.scale(-S::one())
        }
    }
}

impl PartialEq for Forest {
    fn eq(&self, other: &Self) -> bool {
        self.factors() == other.factors()
    }
}

impl Eq for Forest {}

impl Hash for Forest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.factors().hash(state);
    }
}

impl Ord for Forest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.factors().cmp(other.factors())
    }
}

impl PartialOrd for Forest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.trees.is_empty() {
            return write!(f, "∅");
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", tree)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Forest({})", self)
    }
}

impl Default for Forest {
    fn default() -> Self {
        Self::unit()
    }
}

impl From<Tree> for Forest {
    fn from(tree: Tree) -> Self {
        Forest::single(tree)
    }
}

impl FromIterator<Tree> for Forest {
    fn from_iter<I: IntoIterator<Item = Tree>>(iter: I) -> Self {
        Forest::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Forest {
    type Item = Tree;
    type IntoIter = std::vec::IntoIter<Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.into_iter()
    }
}

impl<'a> IntoIterator for &'a Forest {
    type Item = &'a Tree;
    type IntoIter = std::slice::Iter<'a, Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Tree {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_and_unit() {
        let f = Forest::empty();
        assert!(f.is_empty());
        assert_eq!(f.num_trees(), 0);
        assert_eq!(f, Forest::unit());
        assert_eq!(f.reduce().num_trees(), 1);
        assert!(f.reduce().trees()[0].is_void());
    }

    #[test]
    fn test_forest_multiplication() {
        let f1 = Forest::single(Tree::leaf());
        let f2 = Forest::single(t("[[]]"));

        let f3 = f1.multiply(&f2);
        assert_eq!(f3.num_trees(), 2);
        assert_eq!(f3, f2.multiply(&f1));
        assert_eq!(f3.nodes(), 3);
    }

    #[test]
    fn test_reduce_drops_void_factors() {
        let f = Forest::new(vec![Tree::void(), t("[[],[[]]]"), Tree::void()]);
        assert_eq!(f.num_trees(), 3);
        assert_eq!(f.reduce().num_trees(), 1);
        assert_eq!(f, Forest::single(t("[[[]],[]]")));

        let only_void = Forest::new(vec![Tree::void(), Tree::void()]);
        assert_eq!(only_void.reduce().num_trees(), 1);
        assert!(only_void.is_unit());
    }

    #[test]
    fn test_multiset_equality() {
        let a = Forest::new(vec![t("[]"), t("[[]]"), t("[]")]);
        let b = Forest::new(vec![t("[[]]"), t("[]"), t("[]")]);
        let c = Forest::new(vec![t("[[]]"), t("[]")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_factorial_is_multiplicative() {
        let f = Forest::new(vec![t("[[]]"), t("[[],[]]")]);
        assert_eq!(f.factorial().unwrap(), 6);
        assert_eq!(Forest::unit().factorial().unwrap(), 1);
    }

    #[test]
    fn test_pow_and_join() {
        let f = Forest::new(vec![Tree::leaf(), t("[[]]")]);
        assert_eq!(f.pow(2).num_trees(), 4);
        assert_eq!(f.pow(0), Forest::unit());
        assert_eq!(f.join(), t("[[],[[]]]"));
    }

    #[test]
    fn test_singleton_reduced() {
        let f1 = Forest::new(vec![Tree::leaf(), t("[[],[]]")]);
        let f2 = Forest::new(vec![Tree::leaf(), Tree::leaf(), Tree::leaf()]);

        assert_eq!(f1.singleton_reduced(), Forest::single(t("[[],[]]")));
        assert_eq!(f2.singleton_reduced(), Forest::single(Tree::leaf()));
        assert_eq!(Forest::unit().singleton_reduced(), Forest::unit());
    }

    #[test]
    fn test_sign() {
        let f = Forest::new(vec![t("[[]]"), t("[[],[]]")]);
        let signed: FormalSum<i64> = f.sign();
        assert_eq!(signed.coefficient(&f), -1);
    }
}
