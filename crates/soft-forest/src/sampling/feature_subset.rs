//! Stateless k-feature subset selection.
//!
//! Every gate looks at `k` of the `F` input features. Which features is a pure
//! function of `(seed, layer_num, point_index)`: each component is hashed into
//! one word of a fresh generator's state, and a partial Fisher-Yates
//! shuffle draws `k` distinct indices. No generator state outlives a call, so
//! selection is reproducible across processes and safe from any thread.
//!
//! # Example
//!
//! ```
//! use soft_forest::sampling::FeatureSubsetSelector;
//!
//! let selector = FeatureSubsetSelector::new(10, 3).unwrap();
//! let a = selector.select(42, 0, 7);
//! let b = selector.select(42, 0, 7);
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 3);
//! ```

use rand::SeedableRng;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::{ConfigError, check_subset_size};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer. A bijection on `u64`.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Constant last state word; keeps the generator state away from all-zero.
const STREAM_TAG: u64 = 0x517C_C1B7_2722_0A95;

/// Generator state for a `(seed, layer_num, point_index)` context.
///
/// Each component is mixed into its own state word. `mix64` is a bijection,
/// so distinct triples always yield distinct states and therefore distinct
/// streams, for every `u64` point index.
#[inline]
pub fn subset_state(seed: u64, layer_num: u32, point_index: u64) -> [u64; 4] {
    [
        mix64(seed.wrapping_add(GOLDEN_GAMMA)),
        mix64((layer_num as u64).wrapping_add(GOLDEN_GAMMA.wrapping_mul(2))),
        mix64(point_index.wrapping_add(GOLDEN_GAMMA.wrapping_mul(3))),
        STREAM_TAG,
    ]
}

/// Fresh generator for one context.
#[inline]
fn context_rng(seed: u64, layer_num: u32, point_index: u64) -> Xoshiro256PlusPlus {
    let mut bytes = [0u8; 32];
    for (chunk, word) in bytes
        .chunks_exact_mut(8)
        .zip(subset_state(seed, layer_num, point_index))
    {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    Xoshiro256PlusPlus::from_seed(bytes)
}

/// Select `k` distinct features from `0..num_features` for one context.
///
/// Returns sorted indices, so weight `s` of a gate always pairs with the s-th
/// smallest selected feature.
///
/// # Errors
///
/// - [`ConfigError::NoFeatures`] if `num_features == 0`
/// - [`ConfigError::TooManyFeaturesPerNode`] if `k > num_features`
pub fn select_feature_subset(
    layer_num: u32,
    point_index: usize,
    seed: u64,
    num_features: usize,
    k: usize,
) -> Result<Vec<u32>, ConfigError> {
    let selector = FeatureSubsetSelector::new(num_features, k)?;
    Ok(selector.select(seed, layer_num, point_index))
}

// ============================================================================
// FeatureSubsetSelector
// ============================================================================

/// Selector with validated `(num_features, k)`.
///
/// Validation happens once in [`new`](Self::new); selection itself cannot
/// fail. The selector holds no generator and is `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSubsetSelector {
    num_features: u32,
    k: usize,
}

impl FeatureSubsetSelector {
    /// Create a selector drawing `k` of `num_features` features.
    ///
    /// # Errors
    ///
    /// Besides the subset-size errors of [`select_feature_subset`], returns
    /// [`ConfigError::TooManyFeatures`] if `num_features` does not fit a `u32`
    /// feature index.
    pub fn new(num_features: usize, k: usize) -> Result<Self, ConfigError> {
        check_subset_size(num_features, k)?;
        let num_features =
            u32::try_from(num_features).map_err(|_| ConfigError::TooManyFeatures(num_features))?;
        Ok(Self { num_features, k })
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.num_features as usize
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Features for `(seed, layer_num, point_index)`.
    pub fn select(&self, seed: u64, layer_num: u32, point_index: usize) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.num_features as usize);
        self.select_into(seed, layer_num, point_index, &mut out);
        out
    }

    /// Like [`select`](Self::select), reusing `out` as the shuffle buffer.
    ///
    /// On return `out` holds exactly the `k` selected features.
    pub fn select_into(&self, seed: u64, layer_num: u32, point_index: usize, out: &mut Vec<u32>) {
        out.clear();
        out.extend(0..self.num_features);

        if self.k < out.len() {
            let mut rng = context_rng(seed, layer_num, point_index as u64);
            let n = out.len();

            // Partial Fisher-Yates shuffle
            for i in 0..self.k {
                let j = rng.gen_range(i..n);
                out.swap(i, j);
            }

            out.truncate(self.k);
            out.sort_unstable();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
