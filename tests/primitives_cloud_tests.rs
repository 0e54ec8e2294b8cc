#![cfg(feature = "dev")]
//! Tests for point clouds and local views.
//!
//! ## Test Organization
//!
//! 1. **Construction** - Shape checks
//! 2. **Accessors** - Rows, centroid, gathering
//! 3. **Local Views** - Self-inclusive handling

use approx::assert_relative_eq;
use intdim_rs::internals::primitives::cloud::{LocalView, PointCloud};
use intdim_rs::internals::primitives::errors::IdError;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_cloud_shape() {
    let data = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let cloud = PointCloud::new(&data, 2).unwrap();
    assert_eq!(cloud.n_points(), 3);
    assert_eq!(cloud.dims(), 2);
    assert!(!cloud.is_empty());
    assert_eq!(cloud.point(1), &[2.0, 3.0]);
}

#[test]
fn test_cloud_rejects_zero_dims() {
    let data = [1.0, 2.0];
    assert!(matches!(
        PointCloud::new(&data, 0),
        Err(IdError::InvalidParameter { parameter: "dims", .. })
    ));
}

#[test]
fn test_cloud_rejects_ragged_buffer() {
    let data = [1.0, 2.0, 3.0];
    assert_eq!(
        PointCloud::new(&data, 2).unwrap_err(),
        IdError::MismatchedDimensions { len: 3, dims: 2 }
    );
}

#[test]
fn test_ensure_finite_locates_value() {
    let data = [0.0, 1.0, 2.0, f64::NAN];
    let cloud = PointCloud::new(&data, 2).unwrap();
    let err = cloud.ensure_finite().unwrap_err();
    assert!(matches!(err, IdError::InvalidNumericValue(_)));
    assert!(err.to_string().contains("point 1"));
}

// ============================================================================
// Accessor Tests
// ============================================================================

#[test]
fn test_centroid() {
    let data = [0.0, 0.0, 2.0, 4.0, 4.0, 2.0];
    let cloud = PointCloud::new(&data, 2).unwrap();
    let c = cloud.centroid();
    assert_relative_eq!(c[0], 2.0);
    assert_relative_eq!(c[1], 2.0);
}

#[test]
fn test_gather_preserves_order() {
    let data = [0.0, 10.0, 20.0, 30.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    let mut out = vec![99.0];
    cloud.gather_into(&[3, 0, 2], &mut out);
    assert_eq!(out, vec![30.0, 0.0, 20.0]);
}

#[test]
fn test_rows_iterates_in_order() {
    let data = [1.0, 2.0, 3.0, 4.0];
    let cloud = PointCloud::new(&data, 2).unwrap();
    let rows: Vec<&[f64]> = cloud.rows().collect();
    assert_eq!(rows, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
}

// ============================================================================
// Local View Tests
// ============================================================================

#[test]
fn test_local_view_self_inclusive_skips_reference() {
    let center = [0.0, 0.0];
    let rows = [0.0, 0.0, 1.0, 0.0, 0.0, 2.0];
    let distances = [0.0, 1.0, 2.0];
    let neighbors = PointCloud::new(&rows, 2).unwrap();

    let view = LocalView::new(&center, neighbors, &distances, true).unwrap();
    assert!(view.is_self_inclusive());
    assert_eq!(view.neighbor_distances(), &[1.0, 2.0]);
    assert_eq!(view.n_neighbors(), 2);
    assert_eq!(view.neighbors().n_points(), 3);

    let exclusive = LocalView::new(&center, neighbors, &distances, false).unwrap();
    assert_eq!(exclusive.n_neighbors(), 3);
}

#[test]
fn test_local_view_rejects_misaligned_distances() {
    let center = [0.0];
    let rows = [1.0, 2.0];
    let neighbors = PointCloud::new(&rows, 1).unwrap();
    assert!(LocalView::new(&center, neighbors, &[1.0], false).is_err());

    let wide_center = [0.0, 0.0];
    assert!(matches!(
        LocalView::new(&wide_center, neighbors, &[1.0, 2.0], false),
        Err(IdError::MismatchedDimensions { len: 2, dims: 1 })
    ));
}
