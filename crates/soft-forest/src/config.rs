//! Routing configuration with builder pattern.
//!
//! [`RoutingConfig`] carries the scalar attributes of one routing layer:
//! which layer of the hybrid forest it is, how many nodes the tree has, how
//! many features each gate looks at and the base random seed. It is built
//! with the `bon` builder and validated at build time.
//!
//! # Example
//!
//! ```
//! use soft_forest::RoutingConfig;
//!
//! let config = RoutingConfig::builder()
//!     .max_nodes(7)
//!     .num_features_per_node(2)
//!     .layer_num(1)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.layout().unwrap().n_internal(), 3);
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::repr::TreeLayout;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `max_nodes` does not describe a complete binary tree.
    #[error("max_nodes must be odd and >= 1 to form a complete binary tree, got {0}")]
    InvalidMaxNodes(usize),

    /// There are no features to select from.
    #[error("num_features must be > 0")]
    NoFeatures,

    /// The feature count does not fit a `u32` feature index.
    #[error("num_features must be <= u32::MAX, got {0}")]
    TooManyFeatures(usize),

    /// A perfect tree of this depth does not fit `usize` node indices.
    #[error("tree depth {0} is too large")]
    InvalidDepth(u32),

    /// More features per node were requested than the input has.
    #[error("num_features_per_node ({k}) cannot exceed num_features ({num_features})")]
    TooManyFeaturesPerNode { k: usize, num_features: usize },
}

// =============================================================================
// RoutingConfig
// =============================================================================

/// Configuration for one k-feature routing layer.
///
/// # Defaults
///
/// - `layer_num`: 0
/// - `random_seed`: 42
///
/// `max_nodes` and `num_features_per_node` have no sensible default and must
/// be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct RoutingConfig {
    /// Layer of the hybrid forest this tree belongs to. Default: 0.
    #[builder(default)]
    pub layer_num: u32,

    /// Total number of nodes in the tree (internal + leaves). Must be odd.
    pub max_nodes: usize,

    /// Number of features each gate combines (k).
    pub num_features_per_node: usize,

    /// Base random seed for feature-subset selection. Default: 42.
    #[builder(default = 42)]
    pub random_seed: u64,
}

impl<S: routing_config_builder::IsComplete> RoutingConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxNodes`] if `max_nodes` is zero or even.
    pub fn build(self) -> Result<RoutingConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl RoutingConfig {
    /// Validate the tree geometry.
    ///
    /// The feature count is only known once a batch arrives, so the
    /// `num_features_per_node` bound is checked by [`check_num_features`](Self::check_num_features).
    pub fn validate(&self) -> Result<(), ConfigError> {
        TreeLayout::new(self.max_nodes)?;
        Ok(())
    }

    /// Tree layout implied by `max_nodes`.
    pub fn layout(&self) -> Result<TreeLayout, ConfigError> {
        TreeLayout::new(self.max_nodes)
    }

    /// Check that `num_features_per_node` distinct features can be drawn
    /// from `num_features`.
    pub fn check_num_features(&self, num_features: usize) -> Result<(), ConfigError> {
        check_subset_size(num_features, self.num_features_per_node)
    }
}

/// Shared bound check for subset selection.
#[inline]
pub(crate) fn check_subset_size(num_features: usize, k: usize) -> Result<(), ConfigError> {
    if num_features == 0 {
        return Err(ConfigError::NoFeatures);
    }
    if k > num_features {
        return Err(ConfigError::TooManyFeaturesPerNode { k, num_features });
    }
    Ok(())
}
