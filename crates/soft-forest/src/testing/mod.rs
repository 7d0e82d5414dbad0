//! Test and benchmark utilities.
//!
//! - Seeded synthetic batches and gate parameters
//! - [`assert_routing_invariants`] for checking probability tables

use ndarray::{Array1, Array2, ArrayView2};
use rand::SeedableRng;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::repr::TreeLayout;

/// Random batch `[rows, cols]` with values uniform in `[min, max]`.
pub fn random_batch(rows: usize, cols: usize, seed: u64, min: f32, max: f32) -> Array2<f32> {
    assert!(max >= min);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let width = max - min;
    Array2::from_shape_simple_fn((rows, cols), || min + rng.r#gen::<f32>() * width)
}

/// Random gate parameters for `n_internal` nodes with `k` weights each.
///
/// Weights are uniform in `[-1, 1]`, biases in `[-0.5, 0.5]`.
pub fn random_node_params(n_internal: usize, k: usize, seed: u64) -> (Array2<f32>, Array1<f32>) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let weights = Array2::from_shape_simple_fn((n_internal, k), || rng.r#gen::<f32>() * 2.0 - 1.0);
    let biases = Array1::from_shape_simple_fn(n_internal, || rng.r#gen::<f32>() - 0.5);
    (weights, biases)
}

/// Assert the structural invariants of a probability table.
///
/// For every row:
/// - the root entry is exactly 1
/// - every entry lies in `[0, 1]`
/// - each sibling pair sums to its parent (within `epsilon`)
/// - the leaves sum to 1 (within `epsilon`)
///
/// # Panics
///
/// Panics with the offending row and node on the first violation.
pub fn assert_routing_invariants(table: ArrayView2<f32>, layout: TreeLayout, epsilon: f32) {
    assert_eq!(table.ncols(), layout.n_nodes(), "table width must equal max_nodes");

    for (i, row) in table.rows().into_iter().enumerate() {
        assert_eq!(row[0], 1.0, "row {i}: root probability must be 1");

        for (j, &p) in row.iter().enumerate() {
            assert!((0.0..=1.0).contains(&p), "row {i}, node {j}: {p} outside [0, 1]");
        }

        for j in layout.internal_nodes() {
            let children = row[TreeLayout::left_child(j)] + row[TreeLayout::right_child(j)];
            assert!(
                (children - row[j]).abs() <= epsilon,
                "row {i}, node {j}: children sum {children} != parent {}",
                row[j]
            );
        }

        let leaf_sum: f32 = layout.leaves().map(|j| row[j]).sum();
        assert!(
            (leaf_sum - 1.0).abs() <= epsilon,
            "row {i}: leaves sum to {leaf_sum}"
        );
    }
}
