//! # hopf-trees: the Connes-Kreimer Hopf algebra of rooted trees
//!
//! Rooted trees, forests and formal sums of forests as immutable values,
//! with the coproduct (`split`), a memoized antipode, and the convolution
//! calculus of tree functions used for B-series.
//!
//! ## Features
//!
//! - **Trees**: canonical forms, factorial, symmetry and labelling counts
//! - **Algebra**: forest products, formal sums with exact or float coefficients
//! - **Coproduct and antipode**: admissible cuts, thread-safe memoization
//! - **Convolution**: `apply`, `apply_product` and `apply_power`, including
//!   negative powers through the antipode
//!
//! ```
//! use hopf_trees::prelude::*;
//!
//! let t: Tree = "[[[]],[]]".parse().unwrap();
//! assert_eq!(t.nodes(), 4);
//! assert_eq!(t.factorial().unwrap(), 8);
//! assert_eq!(t.split().len(), 7);
//!
//! let s: FormalSum<i64> = t.antipode().unwrap();
//! assert_eq!(s.coefficient(&t.as_forest()), -1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core algebraic structures and operations
pub mod algebra;

/// Engine configuration
pub mod config;

// Re-export commonly used types
pub use algebra::{Antipode, Character, Convolution, Forest, FormalSum, Tree};
pub use config::EngineConfig;

/// Error types for the library
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HopfError {
    /// Invalid tree structure or representation
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// Forests and coefficients given as lists of different lengths
    #[error("Got {forests} forests but {coefficients} coefficients")]
    LengthMismatch {
        /// Number of forests
        forests: usize,
        /// Number of coefficients
        coefficients: usize,
    },

    /// The antipode of a forest with no factors
    #[error("Antipode of an empty forest is undefined")]
    EmptyForestAntipode,

    /// Negative exponent
    #[error("Invalid exponent: {0}")]
    InvalidExponent(i64),

    /// A combinatorial quantity does not fit into `u128`
    #[error("{quantity} overflows u128 for a tree with {nodes} nodes")]
    Overflow {
        /// What was being computed
        quantity: &'static str,
        /// Size of the tree
        nodes: usize,
    },

    /// A count that should be integral is not
    #[error("{numerator}/{denominator} is not an integer for {tree}")]
    NonIntegral {
        /// The tree the count was computed for
        tree: String,
        /// Numerator
        numerator: u128,
        /// Denominator
        denominator: u128,
    },

    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, HopfError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        algebra::{
            counit, trees_of_order, Algebra, Antipode, AntipodeCache, Character, Convolution,
            Forest, FormalSum, Ring, Scalar, Split, Tree, TreeBuilder,
        },
        config::EngineConfig,
        HopfError, Result,
    };
}
