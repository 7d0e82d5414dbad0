//! Forward routing through a soft decision tree.
//!
//! # Module Structure
//!
//! - [`gate`]: logistic gate over a feature subset
//! - [`routing`]: reach-probability propagation over a batch
//!
//! # Quick Start
//!
//! ```
//! use ndarray::array;
//! use soft_forest::{KFeatureRouting, Parallelism, RoutingConfig};
//! use soft_forest::repr::NodeParams;
//!
//! let config = RoutingConfig::builder()
//!     .max_nodes(3)
//!     .num_features_per_node(1)
//!     .build()
//!     .unwrap();
//! let routing = KFeatureRouting::new(config).unwrap();
//!
//! let batch = array![[2.0f32]];
//! let weights = array![[1.0f32]];
//! let biases = array![0.0f32];
//! let params = NodeParams::new(weights.view(), biases.view());
//!
//! let table = routing.route(batch.view(), params, Parallelism::Sequential).unwrap();
//! assert_eq!(table.shape(), &[1, 3]);
//! ```

pub mod gate;
pub mod routing;

pub use gate::{left_probability, sigmoid};
pub use routing::{DEFAULT_BLOCK_SIZE, KFeatureRouting, route};
