//! Coproduct of rooted trees: enumeration of admissible cuts

use super::{Forest, Tree};
use rayon::prelude::*;
use tracing::trace;

/// Number of cut combinations above which [`Tree::split`] fans out over the
/// rayon thread pool.
pub const DEFAULT_PARALLEL_SPLIT_THRESHOLD: usize = 256;

/// The coproduct `Δ(t) = Σ P_c(t) ⊗ R_c(t)` as two parallel lists.
///
/// `kept[i]` is the trunk `R_c(t)` that still contains the root (∅ for the
/// cut that removes everything) and `removed[i]` is the forest `P_c(t)` of
/// pruned branches (the ∅ forest when nothing was cut).
#[derive(Clone, Debug)]
pub struct Split {
    kept: Vec<Tree>,
    removed: Vec<Forest>,
}

impl Split {
    /// Number of admissible cuts
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    /// Always false: every tree, even ∅, has at least one cut
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// The trunks `R_c(t)`
    pub fn kept(&self) -> &[Tree] {
        &self.kept
    }

    /// The pruned forests `P_c(t)`
    pub fn removed(&self) -> &[Forest] {
        &self.removed
    }

    /// Iterate over `(kept, removed)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (&Tree, &Forest)> {
        self.kept.iter().zip(&self.removed)
    }

    /// Split back into the two parallel lists
    pub fn into_parts(self) -> (Vec<Tree>, Vec<Forest>) {
        (self.kept, self.removed)
    }
}

impl Tree {
    /// Compute the coproduct of this tree.
    ///
    /// For `t = [t1, ..., tk]` the cuts are the Cartesian product of the cuts
    /// of the children, plus the cut that removes `t` entirely, so there are
    /// `1 + Π |split(tᵢ)|` of them. The order of the pairs is unspecified.
    pub fn split(&self) -> Split {
        self.split_with_threshold(DEFAULT_PARALLEL_SPLIT_THRESHOLD)
    }

    /// [`Tree::split`] with an explicit parallelization threshold
    pub fn split_with_threshold(&self, parallel_threshold: usize) -> Split {
        if self.is_void() {
            return Split {
                kept: vec![Tree::void()],
                removed: vec![Forest::unit()],
            };
        }
        if self.is_leaf() {
            return Split {
                kept: vec![self.clone(), Tree::void()],
                removed: vec![Forest::unit(), Forest::single(self.clone())],
            };
        }

        let child_splits: Vec<Split> = self
            .children()
            .iter()
            .map(|child| child.split_with_threshold(parallel_threshold))
            .collect();
        let radices: Vec<usize> = child_splits.iter().map(Split::len).collect();
        let combinations: usize = radices.iter().product();

        // Decode `index` as a mixed-radix number, one digit per child
        let combine = |index: usize| -> (Tree, Forest) {
            let mut rest = index;
            let mut kept = Vec::with_capacity(child_splits.len());
            let mut removed = Vec::new();
            for (split, &radix) in child_splits.iter().zip(&radices) {
                let digit = rest % radix;
                rest /= radix;
                kept.push(split.kept[digit].clone());
                removed.extend(split.removed[digit].iter().cloned());
            }
            (Tree::new(kept), Forest::new(removed).reduce())
        };

        let cuts: Vec<(Tree, Forest)> = if combinations >= parallel_threshold {
            trace!(nodes = self.nodes(), combinations, "splitting in parallel");
            (0..combinations).into_par_iter().map(combine).collect()
        } else {
            (0..combinations).map(combine).collect()
        };

        let mut kept = Vec::with_capacity(combinations + 1);
        let mut removed = Vec::with_capacity(combinations + 1);
        kept.push(Tree::void());
        removed.push(Forest::single(self.clone()));
        for (k, r) in cuts {
            kept.push(k);
            removed.push(r);
        }

        Split { kept, removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::trees_of_order;
    use std::collections::HashMap;

    fn t(s: &str) -> Tree {
        s.parse().unwrap()
    }

    /// The cut pairs as a multiset
    fn cut_multiset(split: &Split) -> HashMap<(Tree, Forest), usize> {
        let mut counts = HashMap::new();
        for (kept, removed) in split.pairs() {
            *counts.entry((kept.clone(), removed.clone())).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_split_void_and_leaf() {
        let void = Tree::void().split();
        assert_eq!(void.len(), 1);
        assert!(void.kept()[0].is_void());
        assert!(void.removed()[0].is_unit());

        let leaf = Tree::leaf().split();
        assert_eq!(leaf.len(), 2);
    }

    #[test]
    fn test_split_two_nodes() {
        let split = t("[[]]").split();

        // ∅ ⊗ t, t ⊗ ∅ and • ⊗ •
        assert_eq!(split.len(), 3);
        let cuts = cut_multiset(&split);
        assert!(cuts.contains_key(&(Tree::void(), Forest::single(t("[[]]")))));
        assert!(cuts.contains_key(&(t("[[]]"), Forest::unit())));
        assert!(cuts.contains_key(&(Tree::leaf(), Forest::single(Tree::leaf()))));
    }

    #[test]
    fn test_split_cardinality() {
        assert_eq!(t("[[],[]]").split().len(), 5);
        assert_eq!(t("[[[]],[]]").split().len(), 7);

        for n in 1..=7 {
            for tree in trees_of_order(n) {
                let expected =
                    1 + tree.children().iter().map(|c| c.split().len()).product::<usize>();
                assert_eq!(tree.split().len(), expected);
            }
        }
    }

    #[test]
    fn test_cut_preserves_nodes() {
        for tree in trees_of_order(6) {
            for (kept, removed) in tree.split().pairs() {
                assert_eq!(kept.nodes() + removed.nodes(), tree.nodes());
            }
        }
    }

    #[test]
    fn test_parallel_split_matches_sequential() {
        let tree = t("[[[],[]],[[],[]],[[]],[]]");
        let sequential = tree.split_with_threshold(usize::MAX);
        let parallel = tree.split_with_threshold(1);
        assert_eq!(sequential.len(), parallel.len());
        assert_eq!(cut_multiset(&sequential), cut_multiset(&parallel));
    }

    #[test]
    fn test_split_is_isomorphism_invariant() {
        let a = t("[[[]],[],[[],[]]]");
        let b = t("[[[],[]],[],[[]]]");
        assert_eq!(cut_multiset(&a.split()), cut_multiset(&b.split()));
    }
}
