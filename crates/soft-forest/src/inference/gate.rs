//! Logistic gates.
//!
//! A gate maps a point to the probability of taking the left branch:
//! `sigmoid(bias + Σ weights[s] * point[subset[s]])`. The right branch gets the
//! complement, which is what keeps sibling probabilities summing to their
//! parent.

use ndarray::ArrayView1;

/// Numerically stable sigmoid.
/// Clamps input to [-500, 500] and branches on sign so `exp` never overflows.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    let clamped = x.clamp(-500.0, 500.0);
    if clamped >= 0.0 {
        1.0 / (1.0 + (-clamped).exp())
    } else {
        let e = clamped.exp();
        e / (1.0 + e)
    }
}

/// Probability that `point` is routed to the left child.
///
/// `subset` and `weights` must have the same length; every subset entry must
/// index into `point`. NaN features propagate into the result.
#[inline]
pub fn left_probability(
    point: ArrayView1<f32>,
    subset: &[u32],
    weights: ArrayView1<f32>,
    bias: f32,
) -> f32 {
    debug_assert_eq!(subset.len(), weights.len(), "one weight per selected feature");

    let logit = subset
        .iter()
        .zip(weights.iter())
        .fold(bias, |acc, (&f, &w)| acc + w * point[f as usize]);

    sigmoid(logit)
}
