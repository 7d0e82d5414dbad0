//! Soft decision tree representation.
//!
//! Trees are never materialized as node objects. A tree is the arithmetic
//! layout in [`TreeLayout`] plus the per-node gate parameters in
//! [`NodeParams`], both indexed by [`NodeId`].

/// Node identifier.
///
/// Nodes are stored breadth-first, so this is also the column of the node in
/// a probability table row.
pub type NodeId = usize;

pub mod layout;
pub mod params;

pub use layout::TreeLayout;
pub use params::NodeParams;
