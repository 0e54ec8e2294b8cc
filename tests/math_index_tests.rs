#![cfg(feature = "dev")]
//! Tests for the neighbor index.
//!
//! ## Test Organization
//!
//! 1. **Brute Force Agreement** - kNN and radius queries against a scan
//! 2. **Self Handling** - Inclusive and exclusive index queries
//! 3. **Errors** - Oversized k, bad rows, bad points

use approx::assert_relative_eq;
use intdim_rs::datasets::hyperball;
use intdim_rs::internals::math::distance::DistanceMetric;
use intdim_rs::internals::math::index::{NeighborIndex, Query};
use intdim_rs::internals::primitives::cloud::PointCloud;
use intdim_rs::internals::primitives::errors::IdError;

fn brute_force(
    cloud: &PointCloud<'_, f64>,
    metric: &DistanceMetric<f64>,
    center: &[f64],
    skip: Option<usize>,
) -> Vec<(f64, usize)> {
    let mut all: Vec<(f64, usize)> = cloud
        .rows()
        .enumerate()
        .filter(|&(j, _)| Some(j) != skip)
        .map(|(j, row)| (metric.distance(center, row), j))
        .collect();
    all.sort_by(|a, b| a.partial_cmp(b).unwrap());
    all
}

// ============================================================================
// Brute Force Agreement Tests
// ============================================================================

#[test]
fn test_knn_matches_brute_force() {
    let data = hyperball(200, 3, 3, 1.0, 11).unwrap();
    let cloud = PointCloud::new(&data, 3).unwrap();

    for metric in [
        DistanceMetric::Euclidean,
        DistanceMetric::Manhattan,
        DistanceMetric::Chebyshev,
    ] {
        let index = NeighborIndex::new(cloud, metric.clone()).unwrap();
        for i in [0, 17, 199] {
            let got = index.query(Query::Index(i), 8, false).unwrap();
            let expected = brute_force(&cloud, &metric, cloud.point(i), Some(i));
            assert_eq!(got.len(), 8);
            for (r, &(d, j)) in expected.iter().take(8).enumerate() {
                assert_eq!(got.indices[r], j);
                assert_relative_eq!(got.distances[r], d, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_free_point_query() {
    let data = hyperball(100, 2, 2, 1.0, 5).unwrap();
    let cloud = PointCloud::new(&data, 2).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();

    let center = [0.1, -0.2];
    let got = index.query(Query::Point(&center), 5, false).unwrap();
    let expected = brute_force(&cloud, &DistanceMetric::Euclidean, &center, None);
    let want: Vec<usize> = expected.iter().take(5).map(|&(_, j)| j).collect();
    assert_eq!(got.indices, want);
}

#[test]
fn test_radius_query_is_inclusive_and_sorted() {
    let data = [0.0, 1.0, 2.0, 3.0, 4.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();

    let got = index.query_radius(Query::Index(2), 1.0, false).unwrap();
    assert_eq!(got.indices, vec![1, 3]);
    assert_eq!(got.distances, vec![1.0, 1.0]);

    let wide = index.query_radius(Query::Index(0), 2.5, false).unwrap();
    assert_eq!(wide.indices, vec![1, 2]);
}

#[test]
fn test_results_sorted_by_distance() {
    let data = hyperball(300, 4, 6, 1.0, 3).unwrap();
    let cloud = PointCloud::new(&data, 6).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    let got = index.query(Query::Index(42), 25, false).unwrap();
    assert!(got.distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(!got.indices.contains(&42));
}

// ============================================================================
// Self Handling Tests
// ============================================================================

#[test]
fn test_self_inclusive_prepends_query_row() {
    let data = [0.0, 1.0, 3.0, 6.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();

    let got = index.query(Query::Index(1), 3, true).unwrap();
    assert_eq!(got.indices, vec![1, 0, 2]);
    assert_eq!(got.distances, vec![0.0, 1.0, 2.0]);

    let radius = index.query_radius(Query::Index(1), 1.0, true).unwrap();
    assert_eq!(radius.indices, vec![1, 0]);
}

#[test]
fn test_duplicates_are_not_the_query_row() {
    let data = [5.0, 5.0, 5.0, 9.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();

    let got = index.query(Query::Index(0), 2, false).unwrap();
    assert_eq!(got.indices, vec![1, 2]);
    assert_eq!(got.distances, vec![0.0, 0.0]);
}

#[test]
fn test_available() {
    let data = [0.0, 1.0, 2.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    assert_eq!(index.available(&Query::Index(0), false), 2);
    assert_eq!(index.available(&Query::Index(0), true), 3);
    assert_eq!(index.available(&Query::Point(&[0.5]), false), 3);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_k_larger_than_available() {
    let data = [0.0, 1.0, 2.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    assert_eq!(
        index.query(Query::Index(0), 3, false).unwrap_err(),
        IdError::IndexQuery {
            requested: 3,
            available: 2
        }
    );
    assert!(index.query(Query::Index(0), 3, true).is_ok());
}

#[test]
fn test_bad_queries() {
    let data = [0.0, 0.0, 1.0, 1.0];
    let cloud = PointCloud::new(&data, 2).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();

    assert_eq!(
        index.query(Query::Index(5), 1, false).unwrap_err(),
        IdError::InvalidIndex { index: 5, len: 2 }
    );
    assert!(matches!(
        index.query(Query::Point(&[0.0]), 1, false),
        Err(IdError::MismatchedDimensions { len: 1, dims: 2 })
    ));
    assert!(matches!(
        index.query(Query::Point(&[0.0, f64::NAN]), 1, false),
        Err(IdError::InvalidNumericValue(_))
    ));
    assert!(index.query_radius(Query::Index(0), -1.0, false).is_err());
}

#[test]
fn test_build_rejects_bad_input() {
    let empty: [f64; 0] = [];
    let cloud = PointCloud::new(&empty, 2).unwrap();
    assert_eq!(
        NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap_err(),
        IdError::EmptyInput
    );

    let data = [0.0, 1.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    assert!(NeighborIndex::new(cloud, DistanceMetric::Minkowski(0.5)).is_err());
}
