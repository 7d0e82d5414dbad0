//! Batch views and input checks.
//!
//! The routing engine takes row-major `ndarray` views: one row per data point,
//! one column per feature. This module holds the axis names used throughout
//! the crate and the collaborators that run before routing:
//!
//! - [`batch_view_2d`]: rank check for dynamically shaped batches
//! - [`check_finite`]: NaN/Inf scan over any tensor

use ndarray::{ArrayView, ArrayView2, ArrayViewD, Dimension, Ix2};

use crate::error::{Result, RoutingError};

/// Axis constants for `[n_samples, n_features]` arrays.
pub mod axis {
    use ndarray::Axis;

    pub const ROWS: Axis = Axis(0);
    pub const COLS: Axis = Axis(1);
}

/// View a dynamically shaped batch as a 2-d `[n_samples, n_features]` matrix.
///
/// Returns `Ok(None)` when the leading dimension is 0: an empty batch of any
/// rank routes to an empty table.
///
/// # Errors
///
/// [`RoutingError::Shape`] if the batch is non-empty and not two-dimensional.
pub fn batch_view_2d<'a>(batch: ArrayViewD<'a, f32>) -> Result<Option<ArrayView2<'a, f32>>> {
    if batch.shape().first() == Some(&0) {
        return Ok(None);
    }
    let shape = batch.shape().to_vec();
    batch
        .into_dimensionality::<Ix2>()
        .map(Some)
        .map_err(|_| RoutingError::shape("input_data", &shape, "a two-dimensional batch"))
}

/// Check that every element of `values` is finite.
///
/// # Errors
///
/// [`RoutingError::NonFinite`] naming the first NaN or infinite element in
/// logical (row-major) order.
pub fn check_finite<D: Dimension>(what: &'static str, values: ArrayView<f32, D>) -> Result<()> {
    for (index, &value) in values.into_dyn().indexed_iter() {
        if !value.is_finite() {
            return Err(RoutingError::NonFinite {
                what,
                index: index.slice().to_vec(),
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array3, IxDyn, array};

    #[test]
    fn batch_view_2d_accepts_matrix() {
        let m = array![[1.0f32, 2.0], [3.0, 4.0]];
        let view = batch_view_2d(m.view().into_dyn()).unwrap().unwrap();
        assert_eq!(view.dim(), (2, 2));
    }

    #[test]
    fn batch_view_2d_empty_any_rank() {
        let empty = Array1::<f32>::zeros(0);
        assert!(batch_view_2d(empty.view().into_dyn()).unwrap().is_none());

        let empty3 = Array3::<f32>::zeros((0, 2, 2));
        assert!(batch_view_2d(empty3.view().into_dyn()).unwrap().is_none());
    }

    #[test]
    fn batch_view_2d_rejects_other_ranks() {
        let v = Array1::<f32>::zeros(3);
        let err = batch_view_2d(v.view().into_dyn()).unwrap_err();
        assert!(matches!(err, RoutingError::Shape { what: "input_data", .. }));

        let t = ndarray::ArrayD::<f32>::zeros(IxDyn(&[2, 2, 2]));
        assert!(batch_view_2d(t.view()).is_err());
    }

    #[test]
    fn check_finite_passes_clean_input() {
        let m = array![[1.0f32, -2.0], [0.0, 1e30]];
        assert!(check_finite("input_data", m.view()).is_ok());
    }

    #[test]
    fn check_finite_reports_first_offender() {
        let m = array![[1.0f32, 2.0], [f32::INFINITY, f32::NAN]];
        match check_finite("input_data", m.view()) {
            Err(RoutingError::NonFinite { what, index, value }) => {
                assert_eq!(what, "input_data");
                assert_eq!(index, vec![1, 0]);
                assert!(value.is_infinite());
            }
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn check_finite_on_biases() {
        let b = array![0.0f32, f32::NAN];
        let err = check_finite("tree_biases", b.view()).unwrap_err();
        assert!(err.to_string().contains("tree_biases"));
    }
}
