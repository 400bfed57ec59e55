//! Antipode operation on rooted trees

use super::memo::MemoTable;
use super::{Forest, FormalSum, Scalar, Tree};
use crate::config::EngineConfig;
use crate::{HopfError, Result};
use num_traits::One;
use tracing::trace;

/// Memoization cache for antipode computations.
///
/// Keyed by canonical tree, so isomorphic trees share one entry. The cache is
/// an ordinary value: share it (e.g. behind an `Arc`) to reuse results across
/// calls, or drop it to release them.
pub struct AntipodeCache<S> {
    table: MemoTable<Tree, FormalSum<S>>,
    split_threshold: usize,
}

impl<S: Scalar> AntipodeCache<S> {
    /// Create an unbounded cache
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a cache sized by `config`
    pub fn with_config(config: &EngineConfig) -> Self {
        AntipodeCache {
            table: MemoTable::with_capacity("antipode", config.cache_capacity),
            split_threshold: config.parallel_split_threshold,
        }
    }

    /// S(t) for a single tree.
    ///
    /// `S(∅) = ∅`, `S(•) = -•`, and otherwise
    /// `S(t) = -t - Σ S(P_c(t)) · R_c(t)` over the proper cuts, i.e. leaving
    /// out the cut that keeps `t` whole and the one that removes it.
    pub fn tree(&self, t: &Tree) -> FormalSum<S> {
        if t.is_void() {
            return FormalSum::scalar(S::one());
        }
        if t.is_leaf() {
            return t.scale(-S::one());
        }

        self.table.get_or_compute(t.clone(), || {
            trace!(nodes = t.nodes(), "computing antipode");

            let mut terms: Vec<(Forest, S)> = vec![(t.as_forest(), -S::one())];
            for (kept, removed) in t.split_with_threshold(self.split_threshold).pairs() {
                if kept.is_void() || kept == t {
                    continue;
                }
                let pruned = self.product(removed);
                let trunk = kept.as_forest();
                terms.extend(pruned.terms().map(|(f, c)| (f.multiply(&trunk), -c.clone())));
            }

            FormalSum::from_terms(terms)
        })
    }

    /// S(t1 ⋯ tk) = S(t1) ⋯ S(tk). Fails on a forest with no factors.
    pub fn forest(&self, forest: &Forest) -> Result<FormalSum<S>> {
        if forest.is_empty() {
            return Err(HopfError::EmptyForestAntipode);
        }
        Ok(self.product(forest))
    }

    /// The antipode extended linearly to a formal sum
    pub fn sum(&self, sum: &FormalSum<S>) -> Result<FormalSum<S>> {
        let mut terms = Vec::new();
        for (forest, c) in sum.terms() {
            let image = self.forest(forest)?;
            terms.extend(image.terms().map(|(f, d)| (f.clone(), c.clone() * d.clone())));
        }
        Ok(FormalSum::from_terms(terms))
    }

    fn product(&self, forest: &Forest) -> FormalSum<S> {
        forest
            .iter()
            .fold(FormalSum::one(), |acc, tree| acc.times(&self.tree(tree)))
    }

    /// Number of trees with a memoized antipode
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether nothing is memoized yet
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Forget every memoized antipode
    pub fn clear(&self) {
        self.table.clear();
    }
}

impl<S: Scalar> Default for AntipodeCache<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for computing the antipode
pub trait Antipode<S: Scalar> {
    /// Compute the antipode using (and filling) `cache`
    fn antipode_with_cache(&self, cache: &AntipodeCache<S>) -> Result<FormalSum<S>>;

    /// Compute the antipode S(x), memoizing only within this call
    fn antipode(&self) -> Result<FormalSum<S>> {
        self.antipode_with_cache(&AntipodeCache::new())
    }

    /// S((-1)^|x| x). The antipode and the sign map commute, so this is also
    /// the signed antipode S(x).
    fn signed_antipode(&self) -> Result<FormalSum<S>> {
        let cache = AntipodeCache::new();
        Ok(self.antipode_with_cache(&cache)?.sign())
    }
}

impl<S: Scalar> Antipode<S> for Tree {
    fn antipode_with_cache(&self, cache: &AntipodeCache<S>) -> Result<FormalSum<S>> {
        Ok(cache.tree(self))
    }
}

impl<S: Scalar> Antipode<S> for Forest {
    fn antipode_with_cache(&self, cache: &AntipodeCache<S>) -> Result<FormalSum<S>> {
        cache.forest(self)
    }
}

impl<S: Scalar> Antipode<S> for FormalSum<S> {
    fn antipode_with_cache(&self, cache: &AntipodeCache<S>) -> Result<FormalSum<S>> {
        cache.sum(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::tree::tests::arb_tree;
    use crate::algebra::trees_of_order;
    use proptest::prelude::*;

    fn t(s: &str) -> Tree {
        s.parse().unwrap()
    }

    fn antipode(tree: &Tree) -> FormalSum<i64> {
        tree.antipode().unwrap()
    }

    #[test]
    fn test_antipode_void_and_leaf() {
        assert_eq!(antipode(&Tree::void()), FormalSum::one());
        assert_eq!(antipode(&Tree::leaf()), Tree::leaf().scale(-1));
    }

    #[test]
    fn test_antipode_two_and_three_nodes() {
        let leaf = Tree::leaf();

        // S([•]) = -[•] + ••
        let expected = FormalSum::from_terms([(t("[[]]").as_forest(), -1), (leaf.pow(2), 1)]);
        assert_eq!(antipode(&t("[[]]")), expected);

        // S([•,•]) = -[•,•] + 2 •[•] - •••
        let expected = FormalSum::from_terms([
            (t("[[],[]]").as_forest(), -1),
            (Forest::new(vec![leaf.clone(), t("[[]]")]), 2),
            (leaf.pow(3), -1),
        ]);
        assert_eq!(antipode(&t("[[],[]]")), expected);

        // S([[•]]) = -[[•]] + 2 •[•] - •••
        let expected = FormalSum::from_terms([
            (t("[[[]]]").as_forest(), -1),
            (Forest::new(vec![leaf.clone(), t("[[]]")]), 2),
            (leaf.pow(3), -1),
        ]);
        assert_eq!(antipode(&t("[[[]]]")), expected);
    }

    #[test]
    fn test_antipode_has_no_other_term_of_t() {
        for n in 1..=6 {
            for tree in trees_of_order(n) {
                let s = antipode(&tree);
                assert_eq!(s.coefficient(&tree.as_forest()), -1);
                let rest = s.plus(&tree.as_forest_sum());
                assert_eq!(rest.coefficient(&tree.as_forest()), 0);
                // Every remaining term is a forest of at least two trees
                assert!(rest.terms().all(|(f, c)| *c == 0 || f.num_trees() >= 2));
            }
        }
    }

    #[test]
    fn test_antipode_involution() {
        let cache = AntipodeCache::<i64>::new();
        for n in 1..=5 {
            for tree in trees_of_order(n) {
                let s = cache.tree(&tree);
                let ss = cache.sum(&s).unwrap();
                assert_eq!(ss, tree.as_forest_sum(), "S(S(t)) != t for {}", tree);
            }
        }
    }

    #[test]
    fn test_antipode_of_empty_forest_fails() {
        let result: Result<FormalSum<i64>> = Forest::empty().antipode();
        assert!(matches!(result, Err(HopfError::EmptyForestAntipode)));

        let unit: FormalSum<i64> = Forest::unit().antipode().unwrap();
        assert_eq!(unit, FormalSum::one());
    }

    #[test]
    fn test_forest_antipode_is_multiplicative() {
        let a = t("[[]]");
        let b = t("[[],[]]");
        let forest: FormalSum<i64> = Forest::new(vec![a.clone(), b.clone()]).antipode().unwrap();
        assert_eq!(forest, antipode(&a).times(&antipode(&b)));
    }

    #[test]
    fn test_signed_antipode_commutes() {
        let tree = t("[[[]],[]]");
        let signed: FormalSum<i64> = tree.signed_antipode().unwrap();
        let sign_first: FormalSum<i64> = tree.sign::<i64>().antipode().unwrap();
        assert_eq!(signed, sign_first);
    }

    #[test]
    fn test_cache_is_shared_between_calls() {
        let cache = AntipodeCache::<i64>::new();
        let tree = t("[[[]],[[]]]");
        let first = cache.tree(&tree);
        let filled = cache.len();
        assert!(filled > 0);

        assert_eq!(cache.tree(&t("[[[]],[[]]]")), first);
        assert_eq!(cache.len(), filled);

        cache.clear();
        assert!(cache.is_empty());
    }

    proptest! {
        #[test]
        fn prop_antipode_is_isomorphism_invariant(tree in arb_tree()) {
            let mirror = Tree::new(tree.children().iter().rev().cloned().collect());
            prop_assert_eq!(antipode(&mirror), antipode(&tree));
        }
    }
}
