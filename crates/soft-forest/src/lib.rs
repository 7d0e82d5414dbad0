//! soft-forest: k-feature soft routing for hybrid decision forests.
//!
//! Computes, for a batch of feature vectors, the probability that each vector
//! reaches every node of one soft decision tree layer. Each internal node is a
//! logistic gate over k input features chosen deterministically from
//! `(random_seed, layer_num, point_index)`.
//!
//! # Key Types
//!
//! - [`RoutingConfig`] - Layer attributes (`max_nodes`, k, layer, seed)
//! - [`KFeatureRouting`] - The routing function
//! - [`NodeParams`](repr::NodeParams) - Borrowed per-node gate weights and biases
//! - [`FeatureSubsetSelector`](sampling::FeatureSubsetSelector) - Stateless feature sampling
//!
//! # Routing
//!
//! Build a config with `RoutingConfig::builder()`, wrap it in
//! [`KFeatureRouting`], then call [`KFeatureRouting::route`].
//! See the [`inference`] module for an example.

// Re-export approx traits for users who want to compare tables
pub use approx;

pub mod config;
pub mod data;
pub mod error;
pub mod inference;
pub mod repr;
pub mod sampling;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, RoutingConfig};
pub use error::{Result, RoutingError};
pub use inference::{KFeatureRouting, route};
pub use repr::{NodeParams, TreeLayout};
pub use utils::{Parallelism, run_with_threads};
