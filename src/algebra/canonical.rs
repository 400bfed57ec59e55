//! Canonical (isomorphism-normalized) form of rooted trees and the
//! combinatorial quantities derived from it

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Isomorphism-normalized shape of a non-void rooted tree.
///
/// Children are kept sorted with the heaviest subtree first; two trees are
/// isomorphic exactly when their canonical forms compare equal. The form is
/// reference counted, so cloning it is cheap.
#[derive(Clone)]
pub struct CanonicalForm(Arc<CanonicalNode>);

struct CanonicalNode {
    nodes: usize,
    factorial: Option<u128>,
    symmetry: Option<u128>,
    children: Vec<CanonicalForm>,
}

impl CanonicalForm {
    /// The single-node shape
    pub fn leaf() -> Self {
        CanonicalForm(Arc::new(CanonicalNode {
            nodes: 1,
            factorial: Some(1),
            symmetry: Some(1),
            children: Vec::new(),
        }))
    }

    /// Build the canonical form of a root whose children have the given
    /// canonical forms, in any order.
    pub fn from_children(mut children: Vec<CanonicalForm>) -> Self {
        // Heaviest first
        children.sort_by(|a, b| b.cmp(a));

        let nodes = 1 + children.iter().map(|c| c.nodes()).sum::<usize>();
        let factorial = children
            .iter()
            .try_fold(nodes as u128, |acc, c| acc.checked_mul(c.factorial()?));
        let symmetry = symmetry_of(&children);

        CanonicalForm(Arc::new(CanonicalNode {
            nodes,
            factorial,
            symmetry,
            children,
        }))
    }

    /// Number of nodes, |t|
    pub fn nodes(&self) -> usize {
        self.0.nodes
    }

    /// Tree factorial t!, `None` if it does not fit in a `u128`
    pub fn factorial(&self) -> Option<u128> {
        self.0.factorial
    }

    /// Order of the symmetry group σ(t), `None` if it does not fit in a `u128`
    pub fn symmetry(&self) -> Option<u128> {
        self.0.symmetry
    }

    /// Children in canonical order
    pub fn children(&self) -> &[CanonicalForm] {
        &self.0.children
    }

    /// Depths of the nodes visited in pre-order
    pub fn level_sequence(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes());
        self.push_levels(0, &mut out);
        out
    }

    fn push_levels(&self, depth: usize, out: &mut Vec<usize>) {
        out.push(depth);
        for child in self.children() {
            child.push_levels(depth + 1, out);
        }
    }
}

/// σ = Π mᵢ! σ(cᵢ)^mᵢ over runs of equal children (children are sorted)
fn symmetry_of(children: &[CanonicalForm]) -> Option<u128> {
    let mut symmetry = 1u128;
    let mut i = 0;
    while i < children.len() {
        let mut run = 1;
        while i + run < children.len() && children[i + run] == children[i] {
            run += 1;
        }
        let repeated = children[i].symmetry()?.checked_pow(run as u32)?;
        let factor = checked_factorial_of(run)?.checked_mul(repeated)?;
        symmetry = symmetry.checked_mul(factor)?;
        i += run;
    }
    Some(symmetry)
}

/// n! with overflow detection
pub(crate) fn checked_factorial_of(n: usize) -> Option<u128> {
    (1..=n as u128).try_fold(1u128, |acc, k| acc.checked_mul(k))
}

impl PartialEq for CanonicalForm {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CanonicalForm {}

/// Orders by node count, then lexicographically over the (sorted) children.
impl Ord for CanonicalForm {
    fn cmp(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.0, &other.0) {
            return Ordering::Equal;
        }
        self.nodes()
            .cmp(&other.nodes())
            .then_with(|| self.children().cmp(other.children()))
    }
}

impl PartialOrd for CanonicalForm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for CanonicalForm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nodes().hash(state);
        self.children().hash(state);
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, child) in self.children().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalForm({})", self)
    }
}
