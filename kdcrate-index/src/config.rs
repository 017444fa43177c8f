//! Build and search configuration

use kdcrate_core::{Error, Real, Result};
use serde::{Deserialize, Serialize};

/// Default maximum number of points stored in a leaf
pub const DEFAULT_LEAF_BUCKET_SIZE: usize = 10;

/// Default range size above which subtrees are built on the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 16_384;

/// Configuration for building a [`crate::KdTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdTreeConfig {
    /// Ranges with at most this many points become leaves
    pub leaf_bucket_size: usize,
    /// Ranges with more points than this build their two halves in parallel.
    /// `None` builds on the calling thread only.
    pub parallel_threshold: Option<usize>,
}

impl Default for KdTreeConfig {
    fn default() -> Self {
        Self {
            leaf_bucket_size: DEFAULT_LEAF_BUCKET_SIZE,
            parallel_threshold: Some(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}

impl KdTreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leaf_bucket_size(mut self, leaf_bucket_size: usize) -> Self {
        self.leaf_bucket_size = leaf_bucket_size;
        self
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: Option<usize>) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Check the configuration before a build
    pub fn validate(&self) -> Result<()> {
        if self.leaf_bucket_size == 0 {
            return Err(Error::InvalidInput(
                "leaf_bucket_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-query search options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams<T: Real> {
    /// Approximation factor. A subtree is skipped when its closest possible
    /// squared distance times `(1 + eps)^2` exceeds the current bound, so
    /// reported neighbors are within `(1 + eps)` of the true ones. Zero is exact.
    pub eps: T,
    /// Sort radius search results by ascending distance. k-NN results are always sorted.
    pub sorted: bool,
}

impl<T: Real> Default for SearchParams<T> {
    fn default() -> Self {
        Self {
            eps: nalgebra::zero(),
            sorted: false,
        }
    }
}

impl<T: Real> SearchParams<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_eps(mut self, eps: T) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Multiplier applied to box distances before comparing them with the bound
    pub(crate) fn prune_factor(&self) -> T {
        let f = nalgebra::one::<T>() + self.eps;
        f * f
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KdTreeConfig::default();
        assert_eq!(config.leaf_bucket_size, DEFAULT_LEAF_BUCKET_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_bucket_size_is_rejected() {
        let config = KdTreeConfig::new().with_leaf_bucket_size(0);
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: KdTreeConfig = serde_json::from_str(r#"{"leaf_bucket_size": 32}"#).unwrap();
        assert_eq!(config.leaf_bucket_size, 32);
        assert_eq!(config.parallel_threshold, Some(DEFAULT_PARALLEL_THRESHOLD));

        let config: KdTreeConfig =
            serde_json::from_str(r#"{"parallel_threshold": null}"#).unwrap();
        assert_eq!(config.parallel_threshold, None);
    }

    #[test]
    fn test_prune_factor() {
        let exact = SearchParams::<f64>::default();
        assert_eq!(exact.prune_factor(), 1.0);
        assert!(!exact.sorted);

        let approx = SearchParams::new().with_eps(0.5f64);
        assert!((approx.prune_factor() - 2.25).abs() < 1e-12);
    }
}
