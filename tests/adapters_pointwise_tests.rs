#![cfg(feature = "dev")]
//! Tests for the pointwise adapter.
//!
//! ## Test Organization
//!
//! 1. **Builder** - Defaults, duplicates, invalid values
//! 2. **Fitting** - Lengths, subsets, self-inclusive neighborhoods
//! 3. **Failure Policy** - NaN sentinels and fatal errors
//! 4. **Output** - Reductions and display

use approx::assert_relative_eq;
use intdim_rs::datasets::hyperball;
use intdim_rs::internals::adapters::pointwise::Pointwise;
use intdim_rs::internals::algorithms::global::twonn::TwoNn;
use intdim_rs::internals::algorithms::local::mle::LocalMle;
use intdim_rs::internals::algorithms::local::mom::Mom;
use intdim_rs::internals::engine::output::NeighborhoodKind;
use intdim_rs::internals::evaluation::aggregate::Reducer;
use intdim_rs::internals::math::distance::DistanceMetric;
use intdim_rs::internals::math::index::NeighborIndex;
use intdim_rs::internals::primitives::cloud::PointCloud;
use intdim_rs::internals::primitives::errors::IdError;

/// A random 2-D cloud followed by three copies of one far-away point.
fn cloud_with_duplicates() -> Vec<f64> {
    let mut data = hyperball(30, 2, 2, 1.0, 3).unwrap();
    for _ in 0..3 {
        data.extend_from_slice(&[10.0, 10.0]);
    }
    data
}

// ============================================================================
// Builder Tests
// ============================================================================

#[test]
fn test_builder_defaults() {
    let pw = Pointwise::<f64>::new().build().unwrap();
    let config = pw.config();
    assert_eq!(config.neighborhood, NeighborhoodKind::Knn(100));
    assert_eq!(config.n_jobs, 1);
    assert!(!config.self_inclusive);
    assert_eq!(config.chunk_size, None);
}

#[test]
fn test_builder_duplicates() {
    assert_eq!(
        Pointwise::<f64>::new()
            .n_neighbors(5)
            .n_neighbors(6)
            .build()
            .unwrap_err(),
        IdError::DuplicateParameter {
            parameter: "n_neighbors"
        }
    );
    assert!(matches!(
        Pointwise::<f64>::new().n_jobs(1).n_jobs(2).build(),
        Err(IdError::DuplicateParameter { parameter: "n_jobs" })
    ));
}

#[test]
fn test_builder_invalid_values() {
    assert!(Pointwise::<f64>::new().n_neighbors(0).build().is_err());
    assert!(Pointwise::<f64>::new().radius(0.0).build().is_err());
    assert!(Pointwise::<f64>::new().radius(f64::NAN).build().is_err());
    assert!(Pointwise::<f64>::new().chunk_size(0).build().is_err());
}

#[test]
fn test_builder_radius_mode() {
    let pw = Pointwise::<f64>::new()
        .radius(0.5)
        .n_neighbors(30)
        .build()
        .unwrap();
    assert_eq!(
        pw.config().neighborhood,
        NeighborhoodKind::Radius {
            radius: 0.5,
            max_neighbors: 30
        }
    );
}

// ============================================================================
// Fitting Tests
// ============================================================================

#[test]
fn test_fit_all_points() {
    let data = hyperball(300, 2, 5, 1.0, 7).unwrap();
    let result = Pointwise::new()
        .n_neighbors(20)
        .build()
        .unwrap()
        .fit(&data, 5, &LocalMle::new())
        .unwrap();

    assert_eq!(result.len(), 300);
    assert_eq!(result.indices, (0..300).collect::<Vec<_>>());
    assert_eq!(result.estimator, "local_mle");
    assert!(result.failures.is_empty());
    let median = result.reduce(Reducer::Median).unwrap();
    assert!(median > 1.0 && median < 3.5);
}

#[test]
fn test_subset_order_is_preserved() {
    let data = hyperball(100, 2, 3, 1.0, 5).unwrap();
    let full = Pointwise::new()
        .n_neighbors(10)
        .build()
        .unwrap()
        .fit(&data, 3, &Mom::new())
        .unwrap();

    let subset = vec![42, 5, 99, 0];
    let partial = Pointwise::new()
        .n_neighbors(10)
        .subset(subset.clone())
        .build()
        .unwrap()
        .fit(&data, 3, &Mom::new())
        .unwrap();

    assert_eq!(partial.indices, subset);
    for (pos, &row) in subset.iter().enumerate() {
        assert_eq!(partial.dimensions[pos], full.dimensions[row]);
    }
}

#[test]
fn test_self_inclusive_matches_exclusive_for_local() {
    // Local estimators drop the reference distance, so k + 1 inclusive
    // neighbors carry the same information as k exclusive ones.
    let data = hyperball(80, 2, 2, 1.0, 9).unwrap();
    let exclusive = Pointwise::new()
        .n_neighbors(10)
        .build()
        .unwrap()
        .fit(&data, 2, &LocalMle::new())
        .unwrap();
    let inclusive = Pointwise::new()
        .n_neighbors(11)
        .self_inclusive(true)
        .build()
        .unwrap()
        .fit(&data, 2, &LocalMle::new())
        .unwrap();
    assert!(inclusive.self_inclusive);
    for (a, b) in exclusive.dimensions.iter().zip(&inclusive.dimensions) {
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn test_global_estimator_pointwise() {
    let data = hyperball(200, 2, 3, 1.0, 14).unwrap();
    let twonn = TwoNn::new().build().unwrap();
    let result = Pointwise::new()
        .n_neighbors(30)
        .build()
        .unwrap()
        .fit(&data, 3, &twonn)
        .unwrap();
    assert_eq!(result.len(), 200);
    assert!(result.valid_count() > 0);
}

#[test]
fn test_fit_with_prebuilt_index() {
    let data = hyperball(60, 2, 2, 1.0, 10).unwrap();
    let cloud = PointCloud::new(&data, 2).unwrap();
    let index = NeighborIndex::new(cloud, DistanceMetric::Chebyshev).unwrap();
    let pw = Pointwise::new().n_neighbors(8).build().unwrap();

    let a = pw.fit_with_index(&index, &LocalMle::new()).unwrap();
    let b = pw.fit_with_index(&index, &LocalMle::new()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_parallel_fit_matches_sequential() {
    let data = hyperball(400, 3, 4, 1.0, 31).unwrap();
    let sequential = Pointwise::new()
        .n_neighbors(15)
        .build()
        .unwrap()
        .fit(&data, 4, &LocalMle::new())
        .unwrap();
    let parallel = Pointwise::new()
        .n_neighbors(15)
        .n_jobs(4)
        .chunk_size(25)
        .build()
        .unwrap()
        .fit(&data, 4, &LocalMle::new())
        .unwrap();
    assert_eq!(sequential.dimensions, parallel.dimensions);
}

// ============================================================================
// Failure Policy Tests
// ============================================================================

#[test]
fn test_duplicates_become_nan_sentinels() {
    let _ = env_logger::builder().is_test(true).try_init();
    let data = cloud_with_duplicates();
    let result = Pointwise::new()
        .n_neighbors(2)
        .build()
        .unwrap()
        .fit(&data, 2, &LocalMle::new())
        .unwrap();

    assert_eq!(result.len(), 33);
    assert_eq!(result.valid_count(), 30);
    assert!(result.dimensions[30..].iter().all(|d| d.is_nan()));
    let failed: Vec<usize> = result.failures.iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![30, 31, 32]);
    assert!(
        result
            .failures
            .iter()
            .all(|f| matches!(f.error, IdError::NumericDegeneracy(_)))
    );

    // Reductions skip the missing values.
    let mean = result.reduce(Reducer::Mean).unwrap();
    assert!(mean.is_finite());
    assert!(result.reduce(Reducer::TrimmedMean(0.7)).is_err());
    assert_eq!(result.summary().missing, 3);
}

#[test]
fn test_too_many_neighbors_is_fatal() {
    let data = hyperball(10, 2, 2, 1.0, 1).unwrap();
    let err = Pointwise::new()
        .n_neighbors(10)
        .build()
        .unwrap()
        .fit(&data, 2, &LocalMle::new())
        .unwrap_err();
    assert_eq!(
        err,
        IdError::IndexQuery {
            requested: 10,
            available: 9
        }
    );

    // Inclusive neighborhoods may use every point.
    assert!(
        Pointwise::new()
            .n_neighbors(10)
            .self_inclusive(true)
            .build()
            .unwrap()
            .fit(&data, 2, &LocalMle::new())
            .is_ok()
    );
}

#[test]
fn test_invalid_subset_is_fatal() {
    let data = hyperball(10, 2, 2, 1.0, 1).unwrap();
    let err = Pointwise::new()
        .n_neighbors(3)
        .subset(vec![0, 10])
        .build()
        .unwrap()
        .fit(&data, 2, &LocalMle::new())
        .unwrap_err();
    assert_eq!(err, IdError::InvalidIndex { index: 10, len: 10 });
}

#[test]
fn test_bad_input_is_rejected() {
    let pw = Pointwise::<f64>::new().n_neighbors(1).build().unwrap();
    assert_eq!(
        pw.fit(&[], 2, &LocalMle::new()).unwrap_err(),
        IdError::EmptyInput
    );
    assert!(matches!(
        pw.fit(&[0.0, 1.0, 2.0], 2, &LocalMle::new()),
        Err(IdError::MismatchedDimensions { .. })
    ));
    assert!(matches!(
        pw.fit(&[0.0, f64::NAN], 1, &LocalMle::new()),
        Err(IdError::InvalidNumericValue(_))
    ));
}

// ============================================================================
// Output Tests
// ============================================================================

#[test]
fn test_display() {
    let data = cloud_with_duplicates();
    let result = Pointwise::new()
        .n_neighbors(2)
        .build()
        .unwrap()
        .fit(&data, 2, &LocalMle::new())
        .unwrap();
    let text = result.to_string();
    assert!(text.contains("Estimator: local_mle"));
    assert!(text.contains("Neighbors: 2 nearest"));
    assert!(text.contains("(23 more rows)"));
    assert!(text.contains("Failures: 3"));
}
