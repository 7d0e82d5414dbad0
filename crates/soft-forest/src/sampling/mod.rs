//! Deterministic feature sampling for routing gates.
//!
//! - [`feature_subset`]: per-(layer, point) k-feature subsets

pub mod feature_subset;

pub use feature_subset::{FeatureSubsetSelector, select_feature_subset, subset_state};
