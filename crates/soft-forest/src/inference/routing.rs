//! Reach-probability propagation for one soft decision tree layer.
//!
//! For every data point the engine walks the internal nodes in index order.
//! Index order is a valid breadth-first order for a tree stored by
//! `2j + 1` / `2j + 2`, so a node's probability is final before its children
//! are written:
//!
//! ```text
//! table[i, 0]      = 1
//! table[i, 2j + 1] = table[i, j] * gate_j(x_i)
//! table[i, 2j + 2] = table[i, j] * (1 - gate_j(x_i))
//! ```
//!
//! The gate of every node looks at the same k features for a given point:
//! the subset is keyed by `(random_seed, layer_num, point_index)`.
//!
//! # Block Size
//!
//! Rows are processed in blocks of [`DEFAULT_BLOCK_SIZE`] rows. With
//! [`Parallelism::Parallel`] blocks run on the rayon pool; each block owns a
//! disjoint chunk of output rows, so no synchronization is needed and the
//! result is identical to a sequential run.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewD, ArrayViewMut1, ArrayViewMut2};
use tracing::{debug, trace};

use super::gate::left_probability;
use crate::Parallelism;
use crate::config::{ConfigError, RoutingConfig};
use crate::data::{axis, batch_view_2d};
use crate::error::{Result, RoutingError};
use crate::repr::{NodeParams, TreeLayout};
use crate::sampling::FeatureSubsetSelector;

/// Default number of rows routed together.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Routing function for one layer of a hybrid soft decision forest.
///
/// Holds only validated configuration; parameters and batches are borrowed
/// per call and nothing is retained between calls.
#[derive(Debug, Clone)]
pub struct KFeatureRouting {
    config: RoutingConfig,
    layout: TreeLayout,
    block_size: usize,
}

impl KFeatureRouting {
    /// Create a routing function for `config`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidMaxNodes`] if `config.max_nodes` is zero or even.
    pub fn new(config: RoutingConfig) -> std::result::Result<Self, ConfigError> {
        let layout = config.layout()?;
        Ok(Self {
            config,
            layout,
            block_size: DEFAULT_BLOCK_SIZE,
        })
    }

    /// Set the number of rows routed together. Values below 1 are treated as 1.
    #[inline]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> TreeLayout {
        self.layout
    }

    /// Shape of the probability table for `n_rows` points.
    #[inline]
    pub fn output_shape(&self, n_rows: usize) -> (usize, usize) {
        (n_rows, self.layout.n_nodes())
    }

    /// Route a batch, allocating the probability table.
    ///
    /// # Arguments
    ///
    /// * `batch` - Feature matrix `[n_samples, n_features]`
    /// * `params` - Gate parameters for every internal node
    /// * `parallelism` - Whether blocks may run on the rayon pool
    ///
    /// # Returns
    ///
    /// Reach probabilities `[n_samples, max_nodes]`.
    pub fn route(
        &self,
        batch: ArrayView2<f32>,
        params: NodeParams<'_>,
        parallelism: Parallelism,
    ) -> Result<Array2<f32>> {
        let mut output = Array2::<f32>::zeros(self.output_shape(batch.nrows()));
        self.route_into(batch, params, parallelism, output.view_mut())?;
        Ok(output)
    }

    /// Route a batch of dynamic rank.
    ///
    /// An empty batch of any rank yields a `0 × max_nodes` table; a non-empty
    /// batch must be two-dimensional.
    pub fn route_dyn(
        &self,
        batch: ArrayViewD<f32>,
        params: NodeParams<'_>,
        parallelism: Parallelism,
    ) -> Result<Array2<f32>> {
        match batch_view_2d(batch)? {
            Some(batch) => self.route(batch, params, parallelism),
            None => Ok(Array2::zeros(self.output_shape(0))),
        }
    }

    /// Route a batch into a caller-allocated table.
    ///
    /// All checks run before the first entry of `output` is written; on error
    /// `output` is untouched.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::Shape`] if `output` is not `[n_samples, max_nodes]`
    ///   or `params` does not cover every internal node with k weights
    /// - [`RoutingError::Config`] if the batch has no features or fewer than
    ///   `num_features_per_node`
    pub fn route_into(
        &self,
        batch: ArrayView2<f32>,
        params: NodeParams<'_>,
        parallelism: Parallelism,
        mut output: ArrayViewMut2<f32>,
    ) -> Result<()> {
        let (n_rows, n_features) = batch.dim();
        let (_, n_nodes) = self.output_shape(n_rows);
        if output.dim() != (n_rows, n_nodes) {
            return Err(RoutingError::shape(
                "output",
                output.shape(),
                format!("[{}, {}]", n_rows, n_nodes),
            ));
        }

        if n_rows == 0 {
            debug!(n_nodes, "empty batch, nothing to route");
            return Ok(());
        }

        let selector = FeatureSubsetSelector::new(n_features, self.config.num_features_per_node)?;
        params.validate(&self.layout, selector.k())?;

        debug!(
            n_rows,
            n_features,
            n_nodes,
            layer_num = self.config.layer_num,
            k = selector.k(),
            block_size = self.block_size,
            parallel = parallelism.is_parallel(),
            "routing batch"
        );

        let block_size = self.block_size;
        let blocks = batch
            .axis_chunks_iter(axis::ROWS, block_size)
            .zip(output.axis_chunks_iter_mut(axis::ROWS, block_size))
            .enumerate();

        parallelism.maybe_par_bridge_for_each_init(
            blocks,
            || Vec::with_capacity(n_features),
            |subset, (block_idx, (feat_block, mut out_block))| {
                let first_row = block_idx * block_size;
                trace!(first_row, n_rows = feat_block.nrows(), "routing block");

                for (offset, (point, out_row)) in feat_block
                    .rows()
                    .into_iter()
                    .zip(out_block.rows_mut())
                    .enumerate()
                {
                    self.route_point(&selector, params, point, first_row + offset, subset, out_row);
                }
            },
        );

        Ok(())
    }

    /// Route a single point.
    ///
    /// `point_index` is the point's row in its batch; it keys the feature
    /// subset, so routing row `i` alone matches row `i` of [`route`](Self::route).
    pub fn route_row(
        &self,
        point: ArrayView1<f32>,
        point_index: usize,
        params: NodeParams<'_>,
    ) -> Result<Array1<f32>> {
        let selector = FeatureSubsetSelector::new(point.len(), self.config.num_features_per_node)?;
        params.validate(&self.layout, selector.k())?;

        let mut output = Array1::<f32>::zeros(self.layout.n_nodes());
        let mut subset = Vec::with_capacity(point.len());
        self.route_point(&selector, params, point, point_index, &mut subset, output.view_mut());
        Ok(output)
    }

    #[inline]
    fn route_point(
        &self,
        selector: &FeatureSubsetSelector,
        params: NodeParams<'_>,
        point: ArrayView1<f32>,
        point_index: usize,
        subset: &mut Vec<u32>,
        mut out: ArrayViewMut1<f32>,
    ) {
        out[0] = 1.0;
        if self.layout.n_internal() == 0 {
            return;
        }

        // Keyed by point, not node: one draw serves every gate of the row.
        selector.select_into(
            self.config.random_seed,
            self.config.layer_num,
            point_index,
            subset,
        );

        for node in self.layout.internal_nodes() {
            let parent = out[node];
            let left = left_probability(point, subset, params.weights(node), params.bias(node));
            out[TreeLayout::left_child(node)] = parent * left;
            out[TreeLayout::right_child(node)] = parent * (1.0 - left);
        }
    }
}

/// Route a batch with the flat argument list of the routing op.
///
/// Builds a [`KFeatureRouting`] for the given attributes and routes with the
/// global rayon pool.
///
/// # Errors
///
/// Any error of [`RoutingConfig::validate`] or [`KFeatureRouting::route_into`].
pub fn route<'a>(
    batch: ArrayView2<f32>,
    tree_parameters: ArrayView2<'a, f32>,
    tree_biases: ArrayView1<'a, f32>,
    layer_num: u32,
    max_nodes: usize,
    num_features_per_node: usize,
    random_seed: u64,
) -> Result<Array2<f32>> {
    let config = RoutingConfig::builder()
        .layer_num(layer_num)
        .max_nodes(max_nodes)
        .num_features_per_node(num_features_per_node)
        .random_seed(random_seed)
        .build()?;
    let routing = KFeatureRouting::new(config)?;
    let params = NodeParams::new(tree_parameters, tree_biases);
    routing.route(batch, params, Parallelism::from_threads(0))
}
