//! Core Hopf algebra structures and operations

mod antipode;
mod canonical;
mod convolution;
mod coproduct;
mod forest;
mod forest_sum;
mod memo;
mod ops;
mod scalar;
mod tree;

pub use antipode::{Antipode, AntipodeCache};
pub use canonical::CanonicalForm;
pub use convolution::{counit, CacheStats, Character, Convolution};
pub use coproduct::{Split, DEFAULT_PARALLEL_SPLIT_THRESHOLD};
pub use forest::Forest;
pub use forest_sum::FormalSum;
pub use memo::MemoTable;
pub use scalar::{Algebra, Ring, Scalar};
pub use tree::{trees_of_order, Tree, TreeBuilder};
