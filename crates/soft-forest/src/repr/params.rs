//! Per-node logistic gate parameters.

use ndarray::{ArrayView1, ArrayView2};

use super::{NodeId, TreeLayout};
use crate::data::axis;
use crate::error::{Result, RoutingError};

/// Borrowed gate parameters for every internal node of one tree.
///
/// `weights` has one row of length k per internal node and `biases` one
/// scalar per internal node. Both are owned by the caller and only read.
/// Extra trailing rows are allowed and ignored.
#[derive(Debug, Clone, Copy)]
pub struct NodeParams<'a> {
    weights: ArrayView2<'a, f32>,
    biases: ArrayView1<'a, f32>,
}

impl<'a> NodeParams<'a> {
    #[inline]
    pub fn new(weights: ArrayView2<'a, f32>, biases: ArrayView1<'a, f32>) -> Self {
        Self { weights, biases }
    }

    /// Weight vector of `node`.
    #[inline]
    pub fn weights(&self, node: NodeId) -> ArrayView1<'a, f32> {
        self.weights.index_axis_move(axis::ROWS, node)
    }

    #[inline]
    pub fn bias(&self, node: NodeId) -> f32 {
        self.biases[node]
    }

    /// Number of nodes the parameter arrays cover.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.weights.nrows().min(self.biases.len())
    }

    /// Check that the arrays cover every internal node of `layout` with
    /// `features_per_node` weights each.
    pub fn validate(&self, layout: &TreeLayout, features_per_node: usize) -> Result<()> {
        let n_internal = layout.n_internal();
        if n_internal == 0 {
            return Ok(());
        }
        if self.weights.nrows() < n_internal || self.weights.ncols() != features_per_node {
            return Err(RoutingError::shape(
                "tree_parameters",
                self.weights.shape(),
                format!("at least [{}, {}]", n_internal, features_per_node),
            ));
        }
        if self.biases.len() < n_internal {
            return Err(RoutingError::shape(
                "tree_biases",
                self.biases.shape(),
                format!("at least {} entries", n_internal),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    #[test]
    fn accessors() {
        let weights = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let biases = array![0.1, 0.2, 0.3];
        let params = NodeParams::new(weights.view(), biases.view());

        assert_eq!(params.n_nodes(), 3);
        assert_eq!(params.weights(1).to_vec(), vec![3.0, 4.0]);
        assert_eq!(params.bias(2), 0.3);
    }

    #[test]
    fn weight_rows_outlive_params() {
        let weights = array![[1.0f32, 2.0], [3.0, 4.0]];
        let biases = array![0.0f32, 0.0];
        let row = {
            let params = NodeParams::new(weights.view(), biases.view());
            params.weights(1)
        };
        assert_eq!(row, array![3.0f32, 4.0]);
    }

    #[test]
    fn validate_accepts_exact_and_extra_rows() {
        let layout = TreeLayout::new(7).unwrap();
        let weights = Array2::<f32>::zeros((4, 2));
        let biases = Array1::<f32>::zeros(3);
        let params = NodeParams::new(weights.view(), biases.view());
        assert!(params.validate(&layout, 2).is_ok());
    }

    #[test]
    fn validate_rejects_missing_rows() {
        let layout = TreeLayout::new(7).unwrap();
        let weights = Array2::<f32>::zeros((2, 2));
        let biases = Array1::<f32>::zeros(3);
        let params = NodeParams::new(weights.view(), biases.view());
        let err = params.validate(&layout, 2).unwrap_err();
        assert!(matches!(err, RoutingError::Shape { what: "tree_parameters", .. }));
    }

    #[test]
    fn validate_rejects_wrong_width() {
        let layout = TreeLayout::new(3).unwrap();
        let weights = Array2::<f32>::zeros((1, 3));
        let biases = Array1::<f32>::zeros(1);
        let params = NodeParams::new(weights.view(), biases.view());
        assert!(params.validate(&layout, 2).is_err());
    }

    #[test]
    fn validate_rejects_short_biases() {
        let layout = TreeLayout::new(3).unwrap();
        let weights = Array2::<f32>::zeros((1, 1));
        let biases = Array1::<f32>::zeros(0);
        let params = NodeParams::new(weights.view(), biases.view());
        let err = params.validate(&layout, 1).unwrap_err();
        assert!(matches!(err, RoutingError::Shape { what: "tree_biases", .. }));
    }

    #[test]
    fn lone_root_needs_no_params() {
        let layout = TreeLayout::new(1).unwrap();
        let weights = Array2::<f32>::zeros((0, 0));
        let biases = Array1::<f32>::zeros(0);
        let params = NodeParams::new(weights.view(), biases.view());
        assert!(params.validate(&layout, 5).is_ok());
    }
}
