//! Index arithmetic for complete binary trees stored breadth-first.
//!
//! ```text
//!            0
//!          /   \
//!         1     2
//!        / \   / \
//!       3   4 5   6
//! ```
//!
//! Node `j` has children `2j + 1` and `2j + 2`. With `max_nodes` odd, the
//! internal nodes are exactly `0 .. max_nodes / 2` and every child index of an
//! internal node is `< max_nodes`.

use std::ops::Range;

use super::NodeId;
use crate::config::ConfigError;

/// Layout of a complete binary tree with a fixed number of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeLayout {
    n_nodes: usize,
}

impl TreeLayout {
    /// Create a layout for `max_nodes` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxNodes`] if `max_nodes` is zero or even.
    /// An even count would put the right child of the last internal node
    /// outside the table.
    pub fn new(max_nodes: usize) -> Result<Self, ConfigError> {
        if max_nodes == 0 || max_nodes.is_multiple_of(2) {
            return Err(ConfigError::InvalidMaxNodes(max_nodes));
        }
        Ok(Self { n_nodes: max_nodes })
    }

    /// Layout of a perfect tree with `depth` levels below the root.
    ///
    /// `depth = 0` is a lone root, `depth = 2` has 7 nodes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDepth`] if the node count overflows `usize`.
    pub fn with_depth(depth: u32) -> Result<Self, ConfigError> {
        let n_nodes = depth
            .checked_add(1)
            .and_then(|shift| 1usize.checked_shl(shift))
            .ok_or(ConfigError::InvalidDepth(depth))?
            - 1;
        Ok(Self { n_nodes })
    }

    /// Total number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of internal (gated) nodes.
    #[inline]
    pub fn n_internal(&self) -> usize {
        self.n_nodes / 2
    }

    /// Number of leaves.
    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.n_nodes - self.n_internal()
    }

    #[inline]
    pub fn internal_nodes(&self) -> Range<NodeId> {
        0..self.n_internal()
    }

    #[inline]
    pub fn leaves(&self) -> Range<NodeId> {
        self.n_internal()..self.n_nodes
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        node >= self.n_internal()
    }

    #[inline]
    pub fn left_child(node: NodeId) -> NodeId {
        2 * node + 1
    }

    #[inline]
    pub fn right_child(node: NodeId) -> NodeId {
        2 * node + 2
    }

    /// Parent of `node`, or `None` for the root.
    #[inline]
    pub fn parent(node: NodeId) -> Option<NodeId> {
        (node > 0).then(|| (node - 1) / 2)
    }

    /// Depth of `node` (root = 0).
    #[inline]
    pub fn depth(node: NodeId) -> u32 {
        (node + 1).ilog2()
    }

    /// Depth of the deepest node in the tree.
    #[inline]
    pub fn max_depth(&self) -> u32 {
        Self::depth(self.n_nodes - 1)
    }
}
