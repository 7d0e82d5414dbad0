//! Property-based tests for routing invariants.
//!
//! Random batches, gate parameters, odd tree sizes and seeds; every generated
//! table must satisfy the probability invariants.

use std::collections::HashSet;

use ndarray::{Array1, Array2};
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use soft_forest::sampling::FeatureSubsetSelector;
use soft_forest::testing::assert_routing_invariants;
use soft_forest::{KFeatureRouting, NodeParams, Parallelism, RoutingConfig};

// =============================================================================
// Strategies
// =============================================================================

/// Strategy for bounded finite f32 values.
fn arb_value() -> impl Strategy<Value = f32> {
    -10.0f32..10.0f32
}

/// `(max_nodes, n_features, k, n_rows)` with `max_nodes` odd and `k <= n_features`.
fn arb_shape() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (0usize..16, 1usize..12, 0usize..20).prop_flat_map(|(half, n_features, n_rows)| {
        (Just(2 * half + 1), Just(n_features), 0..=n_features, Just(n_rows))
    })
}

#[allow(clippy::type_complexity)]
fn arb_case() -> impl Strategy<Value = (usize, usize, Array2<f32>, Array2<f32>, Array1<f32>, u32, u64)>
{
    arb_shape().prop_flat_map(|(max_nodes, n_features, k, n_rows)| {
        let n_internal = max_nodes / 2;
        (
            Just(max_nodes),
            Just(k),
            prop_vec(arb_value(), n_rows * n_features)
                .prop_map(move |v| Array2::from_shape_vec((n_rows, n_features), v).unwrap()),
            prop_vec(arb_value(), n_internal * k)
                .prop_map(move |v| Array2::from_shape_vec((n_internal, k), v).unwrap()),
            prop_vec(arb_value(), n_internal).prop_map(Array1::from_vec),
            0u32..8,
            any::<u64>(),
        )
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn table_invariants((max_nodes, k, batch, weights, biases, layer_num, seed) in arb_case()) {
        let config = RoutingConfig::builder()
            .max_nodes(max_nodes)
            .num_features_per_node(k)
            .layer_num(layer_num)
            .random_seed(seed)
            .build()
            .unwrap();
        let routing = KFeatureRouting::new(config).unwrap();
        let params = NodeParams::new(weights.view(), biases.view());

        let table = routing.route(batch.view(), params, Parallelism::Sequential).unwrap();
        prop_assert_eq!(table.dim(), (batch.nrows(), max_nodes));
        assert_routing_invariants(table.view(), routing.layout(), 1e-5);

        let par = routing.route(batch.view(), params, Parallelism::Parallel).unwrap();
        prop_assert_eq!(table, par);
    }

    #[test]
    fn subset_is_k_distinct_in_range(
        n_features in 1usize..200,
        k_frac in 0.0f64..=1.0,
        layer_num in any::<u32>(),
        point in 0usize..100_000,
        seed in any::<u64>(),
    ) {
        let k = ((n_features as f64) * k_frac).floor() as usize;
        let selector = FeatureSubsetSelector::new(n_features, k).unwrap();

        let subset = selector.select(seed, layer_num, point);
        prop_assert_eq!(subset.len(), k);
        let unique: HashSet<_> = subset.iter().copied().collect();
        prop_assert_eq!(unique.len(), k);
        prop_assert!(subset.iter().all(|&f| (f as usize) < n_features));
        prop_assert_eq!(&subset, &selector.select(seed, layer_num, point));
    }
}
