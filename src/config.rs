//! Engine configuration

use crate::algebra::DEFAULT_PARALLEL_SPLIT_THRESHOLD;
use crate::{HopfError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for memo tables and parallel evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of entries per memo table before it is cleared;
    /// `None` keeps everything until the engine is dropped or cleared
    pub cache_capacity: Option<usize>,
    /// Number of cut combinations from which `split` runs on the rayon pool
    pub parallel_split_threshold: usize,
}

impl EngineConfig {
    /// Unbounded caches, default parallelism
    pub fn unbounded() -> Self {
        EngineConfig {
            cache_capacity: None,
            parallel_split_threshold: DEFAULT_PARALLEL_SPLIT_THRESHOLD,
        }
    }

    /// Never split in parallel
    pub fn sequential() -> Self {
        Self::unbounded().with_parallel_split_threshold(usize::MAX)
    }

    /// Bound every memo table to `capacity` entries
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Set the parallel split threshold
    pub fn with_parallel_split_threshold(mut self, threshold: usize) -> Self {
        self.parallel_split_threshold = threshold;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == Some(0) {
            return Err(HopfError::InvalidConfig("Cache capacity must be positive".to_string()));
        }
        if self.parallel_split_threshold == 0 {
            return Err(HopfError::InvalidConfig(
                "Parallel split threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}
