//! Error types for routing.
//!
//! Every failure is detected before the first output entry is written, so a
//! caller never observes a partially populated probability table.

use crate::config::ConfigError;

/// Errors returned by the routing engine and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// Invalid tree or feature-subset configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// An input or output array does not have the shape the tree requires.
    #[error("{what} has shape {actual:?}, expected {expected}")]
    Shape {
        what: &'static str,
        actual: Vec<usize>,
        expected: String,
    },

    /// A tensor contains NaN or infinity (reported by [`check_finite`](crate::data::check_finite)).
    #[error("{what} contains non-finite value {value} at index {index:?}")]
    NonFinite {
        what: &'static str,
        index: Vec<usize>,
        value: f32,
    },

    /// The scoped rayon pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl RoutingError {
    pub(crate) fn shape(what: &'static str, actual: &[usize], expected: impl Into<String>) -> Self {
        Self::Shape {
            what,
            actual: actual.to_vec(),
            expected: expected.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;
