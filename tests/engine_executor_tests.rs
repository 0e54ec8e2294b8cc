#![cfg(feature = "dev")]
//! Tests for the pointwise execution engine.
//!
//! These drive [`PointwiseExecutor`] directly over a shared index.
//!
//! ## Test Organization
//!
//! 1. **Ordering** - One output per query, in query order
//! 2. **Scope Dispatch** - Global and local estimators
//! 3. **Failure Policy** - Sentinels versus fatal errors
//! 4. **Parallelism** - Identical results for any job count

use approx::assert_relative_eq;
use intdim_rs::datasets::hyperball;
use intdim_rs::internals::algorithms::estimator::Estimator;
use intdim_rs::internals::algorithms::global::pca::Pca;
use intdim_rs::internals::algorithms::local::lpca::LocalPca;
use intdim_rs::internals::algorithms::local::mle::{LocalMle, levina_bickel};
use intdim_rs::internals::engine::executor::{PointwiseConfig, PointwiseExecutor};
use intdim_rs::internals::engine::output::NeighborhoodKind;
use intdim_rs::internals::math::distance::DistanceMetric;
use intdim_rs::internals::math::index::{NeighborIndex, Query};
use intdim_rs::internals::primitives::cloud::PointCloud;
use intdim_rs::internals::primitives::errors::IdError;

fn knn_config(k: usize, n_jobs: usize) -> PointwiseConfig<f64> {
    PointwiseConfig {
        neighborhood: NeighborhoodKind::Knn(k),
        n_jobs,
        self_inclusive: false,
        chunk_size: None,
    }
}

fn same(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
}

// ============================================================================
// Ordering Tests
// ============================================================================

#[test]
fn test_one_output_per_query_in_order() {
    let data = hyperball(120, 2, 3, 1.0, 4).unwrap();
    let cloud = PointCloud::new(&data, 3).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    let exec = PointwiseExecutor::new(&index, knn_config(10, 1));

    let queries = [7, 3, 99, 3];
    let result = exec.run(&queries, &LocalMle::new()).unwrap();
    assert_eq!(result.indices, queries.to_vec());
    assert_eq!(result.len(), 4);
    assert_eq!(result.dimensions[1], result.dimensions[3]);

    // Each value is the Levina-Bickel estimate of that row's neighbors.
    let nn = index.query(Query::Index(99), 10, false).unwrap();
    assert_relative_eq!(result.dimensions[2], levina_bickel(&nn.distances).unwrap());
}

#[test]
fn test_empty_query_list() {
    let data = hyperball(20, 2, 2, 1.0, 1).unwrap();
    let cloud = PointCloud::new(&data, 2).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    let result = PointwiseExecutor::new(&index, knn_config(5, 1))
        .run(&[], &LocalMle::new())
        .unwrap();
    assert!(result.is_empty());
    assert_eq!(result.failure_rate(), 0.0);
}

// ============================================================================
// Scope Dispatch Tests
// ============================================================================

#[test]
fn test_global_estimator_sees_neighbor_rows() {
    let data = hyperball(200, 2, 4, 1.0, 8).unwrap();
    let cloud = PointCloud::new(&data, 4).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    let pca = Pca::new().build().unwrap();

    let result = PointwiseExecutor::new(&index, knn_config(15, 1))
        .run(&[0], &pca)
        .unwrap();

    let nn = index.query(Query::Index(0), 15, false).unwrap();
    let mut rows = Vec::new();
    cloud.gather_into(&nn.indices, &mut rows);
    let expected = pca.estimate(&PointCloud::new(&rows, 4).unwrap()).unwrap();
    assert_relative_eq!(result.dimensions[0], expected, epsilon = 1e-12);
}

#[test]
fn test_radius_neighborhoods_are_capped() {
    let data = hyperball(300, 2, 2, 1.0, 6).unwrap();
    let cloud = PointCloud::new(&data, 2).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    let config = PointwiseConfig {
        neighborhood: NeighborhoodKind::Radius {
            radius: 10.0,
            max_neighbors: 12,
        },
        n_jobs: 1,
        self_inclusive: false,
        chunk_size: None,
    };
    let radius = PointwiseExecutor::new(&index, config)
        .run(&[5], &LocalMle::new())
        .unwrap();
    let knn = PointwiseExecutor::new(&index, knn_config(12, 1))
        .run(&[5], &LocalMle::new())
        .unwrap();
    assert_relative_eq!(radius.dimensions[0], knn.dimensions[0]);
}

// ============================================================================
// Failure Policy Tests
// ============================================================================

#[test]
fn test_small_neighborhoods_become_nan() {
    let data = hyperball(50, 2, 3, 1.0, 2).unwrap();
    let cloud = PointCloud::new(&data, 3).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    let lpca = LocalPca::new().build().unwrap();

    let queries: Vec<usize> = (0..50).collect();
    let result = PointwiseExecutor::new(&index, knn_config(2, 1))
        .run(&queries, &lpca)
        .unwrap();
    assert_eq!(result.valid_count(), 0);
    assert_eq!(result.failures.len(), 50);
    assert_relative_eq!(result.failure_rate(), 1.0);
    assert!(matches!(
        result.failures[0].error,
        IdError::InsufficientData { .. }
    ));
}

#[test]
fn test_oversized_k_is_fatal() {
    let data = [0.0, 1.0, 2.0, 3.0, 4.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    let err = PointwiseExecutor::new(&index, knn_config(5, 1))
        .run(&[0, 1], &LocalMle::new())
        .unwrap_err();
    assert_eq!(
        err,
        IdError::IndexQuery {
            requested: 5,
            available: 4
        }
    );
}

#[test]
fn test_invalid_query_row_is_fatal() {
    let data = [0.0, 1.0, 2.0, 3.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    assert_eq!(
        PointwiseExecutor::new(&index, knn_config(2, 1))
            .run(&[1, 4], &LocalMle::new())
            .unwrap_err(),
        IdError::InvalidIndex { index: 4, len: 4 }
    );
}

// ============================================================================
// Parallelism Tests
// ============================================================================

#[test]
fn test_parallel_matches_sequential() {
    let data = hyperball(500, 3, 5, 1.0, 17).unwrap();
    let cloud = PointCloud::new(&data, 5).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Euclidean).unwrap();
    let queries: Vec<usize> = (0..500).rev().collect();

    let sequential = PointwiseExecutor::new(&index, knn_config(20, 1))
        .run(&queries, &LocalMle::new())
        .unwrap();

    for (n_jobs, chunk_size) in [(4, None), (3, Some(7)), (0, Some(1000))] {
        let config = PointwiseConfig {
            chunk_size,
            ..knn_config(20, n_jobs)
        };
        let parallel = PointwiseExecutor::new(&index, config)
            .run(&queries, &LocalMle::new())
            .unwrap();
        assert!(same(&sequential.dimensions, &parallel.dimensions));
        assert_eq!(sequential.indices, parallel.indices);
    }
}
