//! Rooted tree data structure and operations

use super::canonical::{checked_factorial_of, CanonicalForm};
use super::{Forest, FormalSum, Scalar};
use crate::{HopfError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// A rooted tree, or the void element ∅.
///
/// - `Tree::void()` is the formal empty tree with zero nodes
/// - `Tree::leaf()` is the single-node tree •
/// - `Tree::new(children)` grafts the given subtrees onto a new root
///
/// The children keep the order they were given in, which is only used for
/// display. Equality, hashing and ordering go through the canonical form, so
/// trees that differ by a permutation of children compare equal.
#[derive(Clone)]
pub struct Tree {
    root: Option<Arc<Node>>,
}

struct Node {
    children: Vec<Tree>,
    canonical: CanonicalForm,
}

impl Tree {
    /// The void element ∅
    pub fn void() -> Self {
        Tree { root: None }
    }

    /// The single-node tree •
    pub fn leaf() -> Self {
        Tree::new(Vec::new())
    }

    /// Create the tree `[t1, ..., tk]`. Void children are dropped.
    pub fn new(children: Vec<Tree>) -> Self {
        let children: Vec<Tree> = children.into_iter().filter(|c| !c.is_void()).collect();
        let canonical = CanonicalForm::from_children(
            children.iter().filter_map(|c| c.canonical().cloned()).collect(),
        );
        Tree {
            root: Some(Arc::new(Node { children, canonical })),
        }
    }

    /// Rebuild a tree from its level sequence (see [`Tree::level_sequence`]).
    ///
    /// The empty sequence gives ∅.
    pub fn from_level_sequence(levels: &[usize]) -> Result<Self> {
        let Some((&first, rest)) = levels.split_first() else {
            return Ok(Tree::void());
        };
        if first != 0 {
            return Err(HopfError::InvalidTree(format!(
                "level sequence must start at 0, found {}",
                first
            )));
        }

        // open[d] collects the finished children of the open node at depth d
        let mut open: Vec<Vec<Tree>> = vec![Vec::new()];
        for &level in rest {
            if level == 0 || level > open.len() {
                return Err(HopfError::InvalidTree(format!(
                    "level {} cannot follow depth {}",
                    level,
                    open.len() - 1
                )));
            }
            close_to_depth(&mut open, level);
            open.push(Vec::new());
        }
        close_to_depth(&mut open, 1);

        Ok(Tree::new(open.pop().unwrap_or_default()))
    }

    /// Whether this is the void element ∅
    pub fn is_void(&self) -> bool {
        self.root.is_none()
    }

    /// Whether this is the single-node tree •
    pub fn is_leaf(&self) -> bool {
        self.nodes() == 1
    }

    /// Children of the root, in construction order
    pub fn children(&self) -> &[Tree] {
        match &self.root {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Canonical form, `None` for ∅
    pub fn canonical(&self) -> Option<&CanonicalForm> {
        self.root.as_ref().map(|node| &node.canonical)
    }

    /// Number of nodes, |t|
    pub fn nodes(&self) -> usize {
        self.canonical().map_or(0, CanonicalForm::nodes)
    }

    /// Tree factorial t!, with ∅! = 1
    pub fn factorial(&self) -> Result<u128> {
        match self.canonical() {
            None => Ok(1),
            Some(canonical) => canonical.factorial().ok_or_else(|| self.overflow("tree factorial")),
        }
    }

    /// Symmetry factor σ(t), with σ(∅) = 1
    pub fn symmetry(&self) -> Result<u128> {
        match self.canonical() {
            None => Ok(1),
            Some(canonical) => canonical.symmetry().ok_or_else(|| self.overflow("symmetry factor")),
        }
    }

    /// β(t) = |t|! / σ(t), the number of distinct labellings of the nodes
    /// with 1..=|t| up to symmetry.
    pub fn labelled_embeddings(&self) -> Result<u128> {
        let n_factorial = checked_factorial_of(self.nodes()).ok_or_else(|| self.overflow("|t|!"))?;
        exact_div(n_factorial, self.symmetry()?, self)
    }

    /// α(t) = β(t) / t!, the number of labellings that also increase away
    /// from the root.
    pub fn distinct_increasing_labellings(&self) -> Result<u128> {
        exact_div(self.labelled_embeddings()?, self.factorial()?, self)
    }

    fn overflow(&self, quantity: &'static str) -> HopfError {
        HopfError::Overflow {
            quantity,
            nodes: self.nodes(),
        }
    }

    /// Node depths in pre-order of the canonical form.
    ///
    /// `[[[]],[]]` gives `[0, 1, 2, 1]`.
    pub fn level_sequence(&self) -> Vec<usize> {
        self.canonical().map(CanonicalForm::level_sequence).unwrap_or_default()
    }

    /// The same tree with the heaviest branches rotated to the left
    pub fn sorted(&self) -> Tree {
        match self.canonical() {
            Some(canonical) => Tree::from_canonical(canonical),
            None => Tree::void(),
        }
    }

    fn from_canonical(canonical: &CanonicalForm) -> Tree {
        Tree {
            root: Some(Arc::new(Node {
                children: canonical.children().iter().map(Tree::from_canonical).collect(),
                canonical: canonical.clone(),
            })),
        }
    }

    /// For `t = [t1, ..., tk]`, the forest `t1 ⋯ tk`
    pub fn unjoin(&self) -> Forest {
        if self.is_void() {
            return Forest::unit();
        }
        Forest::new(self.children().to_vec())
    }

    /// The one-factor forest `t`
    pub fn as_forest(&self) -> Forest {
        Forest::single(self.clone())
    }

    /// `1 · t`
    pub fn as_forest_sum<S: Scalar>(&self) -> FormalSum<S> {
        FormalSum::from(self.clone())
    }

    /// `c · t`
    pub fn scale<S: Scalar>(&self, c: S) -> FormalSum<S> {
        FormalSum::term(self.as_forest(), c)
    }

    /// `(-1)^|t| t`
    pub fn sign<S: Scalar>(&self) -> FormalSum<S> {
        if self.nodes() % 2 == 0 {
            self.as_forest_sum()
        } else {
            self.scale(-S::one())
        }
    }

    /// The forest of `n` copies of this tree; `n = 0` gives ∅
    pub fn pow(&self, n: u32) -> Forest {
        Forest::new(vec![self.clone(); n as usize]).reduce()
    }

    /// Apply the natural growth operator: attach a new leaf at each node
    pub fn graft_all_leaves(&self) -> Vec<Tree> {
        if self.is_void() {
            return vec![Tree::leaf()];
        }

        let children = self.children();
        let mut result = Vec::with_capacity(self.nodes());

        let mut at_root = children.to_vec();
        at_root.push(Tree::leaf());
        result.push(Tree::new(at_root));

        for (i, child) in children.iter().enumerate() {
            for grafted in child.graft_all_leaves() {
                let mut new_children = children.to_vec();
                new_children[i] = grafted;
                result.push(Tree::new(new_children));
            }
        }

        result
    }
}

fn close_to_depth(open: &mut Vec<Vec<Tree>>, depth: usize) {
    while open.len() > depth {
        let children = open.pop().unwrap_or_default();
        if let Some(parent) = open.last_mut() {
            parent.push(Tree::new(children));
        }
    }
}

fn exact_div(numerator: u128, denominator: u128, tree: &Tree) -> Result<u128> {
    if denominator == 0 || numerator % denominator != 0 {
        return Err(HopfError::NonIntegral {
            tree: tree.to_string(),
            numerator,
            denominator,
        });
    }
    Ok(numerator / denominator)
}

/// One representative of every isomorphism class of trees with `k` nodes,
/// in canonical order. `k = 0` gives ∅ alone.
pub fn trees_of_order(k: usize) -> Vec<Tree> {
    if k == 0 {
        return vec![Tree::void()];
    }
    if k == 1 {
        return vec![Tree::leaf()];
    }

    // Generate by grafting from smaller trees
    let mut result = BTreeSet::new();
    for tree in trees_of_order(k - 1) {
        for grafted in tree.graft_all_leaves() {
            result.insert(grafted.sorted());
        }
    }

    result.into_iter().collect()
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Tree {}

impl Hash for Tree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

/// ∅ first, then by canonical form
impl Ord for Tree {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl PartialOrd for Tree {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_void() {
            return write!(f, "∅");
        }
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

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tree({})", self)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::void()
    }
}

/// Parses the nested-bracket notation, e.g. `"[[[]],[]]"`; `"∅"` or `"null"`
/// give the void element.
impl FromStr for Tree {
    type Err = HopfError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "∅" {
            return Ok(Tree::void());
        }
        serde_json::from_str(s).map_err(|e| HopfError::InvalidTree(format!("{}: {}", s, e)))
    }
}

/// Serialized as nested lists of children, with `null` for ∅
impl Serialize for Tree {
    fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        match &self.root {
            None => serializer.serialize_none(),
            Some(node) => serializer.collect_seq(&node.children),
        }
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let children = Option::<Vec<Tree>>::deserialize(deserializer)?;
        Ok(children.map_or_else(Tree::void, Tree::new))
    }
}

/// Builder for constructing trees from parent/child node indices
pub struct TreeBuilder {
    children: Vec<Vec<usize>>,
}

impl TreeBuilder {
    /// Create a new builder starting with a root (node 0)
    pub fn new() -> Self {
        TreeBuilder {
            children: vec![Vec::new()],
        }
    }

    /// Add a child to a parent node
    pub fn add_child(&mut self, parent: usize, child: usize) -> &mut Self {
        let needed = parent.max(child) + 1;
        if self.children.len() < needed {
            self.children.resize(needed, Vec::new());
        }
        self.children[parent].push(child);
        self
    }

    /// Build the tree, checking that the indices describe a tree rooted at 0
    pub fn build(&self) -> Result<Tree> {
        let n_nodes = self.children.len();
        let mut parent_count = vec![0usize; n_nodes];

        for (parent, child_list) in self.children.iter().enumerate() {
            for &child in child_list {
                if child == parent {
                    return Err(HopfError::InvalidTree("Self-loops not allowed".to_string()));
                }
                if child == 0 {
                    return Err(HopfError::InvalidTree("The root cannot be a child".to_string()));
                }
                parent_count[child] += 1;
                if parent_count[child] > 1 {
                    return Err(HopfError::InvalidTree(format!(
                        "Node {} has more than one parent",
                        child
                    )));
                }
            }
        }

        // Every node except the root hangs off exactly one parent, so the
        // structure is a tree iff everything is reachable from the root.
        let mut visited = vec![false; n_nodes];
        let mut stack = vec![0];
        visited[0] = true;
        while let Some(node) = stack.pop() {
            for &child in &self.children[node] {
                if !visited[child] {
                    visited[child] = true;
                    stack.push(child);
                }
            }
        }
        if let Some(orphan) = visited.iter().position(|&v| !v) {
            return Err(HopfError::InvalidTree(format!(
                "Node {} is not connected to the root",
                orphan
            )));
        }

        Ok(self.assemble(0))
    }

    fn assemble(&self, node: usize) -> Tree {
        Tree::new(self.children[node].iter().map(|&child| self.assemble(child)).collect())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
