#![cfg(feature = "dev")]
//! Tests for global intrinsic dimension estimators.
//!
//! ## Test Organization
//!
//! 1. **Accuracy** - Known-dimension benchmark clouds
//! 2. **Estimator Details** - Regression output, averaging, subsampling
//! 3. **Degenerate Input** - Duplicates and tiny clouds
//! 4. **Builders** - Defaults, duplicates and invalid parameters

use approx::assert_relative_eq;
use intdim_rs::datasets::{hyperball, hypersphere};
use intdim_rs::internals::algorithms::estimator::{Estimator, Scope};
use intdim_rs::internals::algorithms::global::corr_int::CorrInt;
use intdim_rs::internals::algorithms::global::mle::{Averaging, Mle};
use intdim_rs::internals::algorithms::global::pca::Pca;
use intdim_rs::internals::algorithms::global::twonn::TwoNn;
use intdim_rs::internals::math::distance::DistanceMetric;
use intdim_rs::internals::math::spectrum::SpectralRule;
use intdim_rs::internals::primitives::cloud::PointCloud;
use intdim_rs::internals::primitives::errors::IdError;

fn ball_5d() -> Vec<f64> {
    hyperball(1000, 5, 10, 1.0, 0).unwrap()
}

fn assert_near(estimate: f64, truth: f64, tolerance: f64) {
    assert!(
        (estimate - truth).abs() <= tolerance,
        "estimate {} not within {} of {}",
        estimate,
        tolerance,
        truth
    );
}

// ============================================================================
// Accuracy Tests
// ============================================================================

#[test]
fn test_twonn_on_ball() {
    let data = ball_5d();
    let cloud = PointCloud::new(&data, 10).unwrap();
    let d = TwoNn::new().build().unwrap().estimate(&cloud).unwrap();
    assert_near(d, 5.0, 1.5);
}

#[test]
fn test_mle_on_ball() {
    let data = ball_5d();
    let cloud = PointCloud::new(&data, 10).unwrap();
    let d = Mle::new().build().unwrap().estimate(&cloud).unwrap();
    assert_near(d, 5.0, 1.5);
}

#[test]
fn test_corr_int_on_ball() {
    let data = ball_5d();
    let cloud = PointCloud::new(&data, 10).unwrap();
    let d = CorrInt::new().build().unwrap().estimate(&cloud).unwrap();
    assert_near(d, 5.0, 1.5);
}

#[test]
fn test_pca_on_ball() {
    let data = ball_5d();
    let cloud = PointCloud::new(&data, 10).unwrap();
    let pr = Pca::new().build().unwrap().estimate(&cloud).unwrap();
    assert_near(pr, 5.0, 1.5);

    let fo = Pca::new()
        .rule(SpectralRule::FukunagaOlsen { alpha: 0.05 })
        .build()
        .unwrap()
        .estimate(&cloud)
        .unwrap();
    assert_relative_eq!(fo, 5.0);
}

#[test]
fn test_twonn_on_circle() {
    let data = hypersphere(500, 1, 3, 2.0, 8).unwrap();
    let cloud = PointCloud::new(&data, 3).unwrap();
    let d = TwoNn::new().build().unwrap().estimate(&cloud).unwrap();
    assert_near(d, 1.0, 0.3);
}

#[test]
fn test_estimates_are_deterministic() {
    let data = ball_5d();
    let cloud = PointCloud::new(&data, 10).unwrap();

    let twonn = TwoNn::new().build().unwrap();
    assert_eq!(
        twonn.estimate(&cloud).unwrap(),
        twonn.estimate(&cloud).unwrap()
    );

    let corr = CorrInt::new()
        .max_points(400)
        .random_state(3)
        .build()
        .unwrap();
    assert_eq!(corr.estimate(&cloud).unwrap(), corr.estimate(&cloud).unwrap());
}

// ============================================================================
// Estimator Detail Tests
// ============================================================================

#[test]
fn test_twonn_regression_output() {
    let data = hyperball(200, 3, 4, 1.0, 2).unwrap();
    let cloud = PointCloud::new(&data, 4).unwrap();
    let twonn = TwoNn::new().discard_fraction(0.25).build().unwrap();
    let fit = twonn.fit_regression(&cloud).unwrap();

    // floor(200 · 0.75)
    assert_eq!(fit.log_mu.len(), 150);
    assert_eq!(fit.neg_log_survival.len(), 150);
    assert!(fit.log_mu.windows(2).all(|w| w[0] <= w[1]));
    assert!(fit.log_mu.iter().all(|&x| x >= 0.0));
    assert_relative_eq!(fit.neg_log_survival[0], 0.0);

    let sxy: f64 = fit
        .log_mu
        .iter()
        .zip(&fit.neg_log_survival)
        .map(|(x, y)| x * y)
        .sum();
    let sxx: f64 = fit.log_mu.iter().map(|x| x * x).sum();
    assert_relative_eq!(fit.dimension, sxy / sxx, epsilon = 1e-12);
}

#[test]
fn test_mle_pointwise_and_averaging() {
    let data = hyperball(300, 2, 3, 1.0, 5).unwrap();
    let cloud = PointCloud::new(&data, 3).unwrap();

    let mean = Mle::new().k(10).build().unwrap();
    let values = mean.pointwise(&cloud).unwrap();
    assert_eq!(values.len(), 300);
    assert!(values.iter().all(|v| v.is_finite()));

    let expected = values.iter().sum::<f64>() / values.len() as f64;
    assert_relative_eq!(mean.estimate(&cloud).unwrap(), expected, epsilon = 1e-12);

    let inverse = Mle::new()
        .k(10)
        .averaging(Averaging::Inverse)
        .build()
        .unwrap();
    let harmonic = values.len() as f64 / values.iter().map(|v| 1.0 / v).sum::<f64>();
    assert_relative_eq!(inverse.estimate(&cloud).unwrap(), harmonic, epsilon = 1e-12);
    // Harmonic mean never exceeds the arithmetic mean.
    assert!(harmonic <= expected);
}

#[test]
fn test_corr_int_subsample_changes_with_seed_only() {
    let data = ball_5d();
    let cloud = PointCloud::new(&data, 10).unwrap();
    let a = CorrInt::new().max_points(300).random_state(1).build().unwrap();
    let b = CorrInt::new().max_points(300).random_state(1).build().unwrap();
    assert_eq!(a.estimate(&cloud).unwrap(), b.estimate(&cloud).unwrap());
    assert_eq!(a.max_points(), Some(300));
    assert_eq!(a.scales(), (10, 20));
}

#[test]
fn test_corr_int_unseeded_subsample_is_reproducible() {
    let data = hyperball(600, 3, 3, 1.0, 21).unwrap();
    let cloud = PointCloud::new(&data, 3).unwrap();
    let corr = CorrInt::new().max_points(100).build().unwrap();
    let first = corr.estimate(&cloud).unwrap();
    assert_eq!(first, corr.estimate(&cloud).unwrap());

    // No seed behaves like the default seed
    let seeded = CorrInt::new().max_points(100).random_state(0).build().unwrap();
    assert_eq!(first, seeded.estimate(&cloud).unwrap());
}

#[test]
fn test_pca_spectrum() {
    let data = hyperball(200, 2, 4, 1.0, 6).unwrap();
    let cloud = PointCloud::new(&data, 4).unwrap();
    let pca = Pca::new().build().unwrap();
    assert_eq!(pca.rule(), SpectralRule::ParticipationRatio);
    let spectrum = pca.spectrum(&cloud).unwrap();
    assert_eq!(spectrum.values.len(), 4);
    assert_relative_eq!(spectrum.values[2], 0.0, epsilon = 1e-12);
}

#[test]
fn test_metrics_are_configurable() {
    let data = hyperball(400, 3, 3, 1.0, 12).unwrap();
    let cloud = PointCloud::new(&data, 3).unwrap();
    let d = TwoNn::new()
        .metric(DistanceMetric::Manhattan)
        .build()
        .unwrap()
        .estimate(&cloud)
        .unwrap();
    assert!(d.is_finite() && d > 1.0);
}

#[test]
fn test_scopes_and_names() {
    let twonn = TwoNn::<f64>::new().build().unwrap();
    assert_eq!(Estimator::<f64>::name(&twonn), "twonn");
    assert_eq!(Estimator::<f64>::scope(&twonn), Scope::Global);
    assert_eq!(Estimator::<f64>::min_points(&twonn), 3);

    let mle = Mle::<f64>::new().k(7).build().unwrap();
    assert_eq!(Estimator::<f64>::name(&mle), "mle");
    assert_eq!(Estimator::<f64>::min_points(&mle), 8);

    let pca = Pca::new().build().unwrap();
    assert_eq!(Estimator::<f64>::name(&pca), "pca");
    assert_eq!(Estimator::<f64>::scope(&pca), Scope::Global);
}

// ============================================================================
// Degenerate Input Tests
// ============================================================================

#[test]
fn test_twonn_duplicates_are_degenerate() {
    let data = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 0.0, 2.0, 0.0];
    let cloud = PointCloud::new(&data, 2).unwrap();
    let err = TwoNn::new().build().unwrap().estimate(&cloud).unwrap_err();
    assert!(matches!(err, IdError::NumericDegeneracy(_)));
}

#[test]
fn test_twonn_requires_two_features() {
    let data = [0.0, 1.0, 3.0, 7.0];
    let cloud = PointCloud::new(&data, 1).unwrap();
    assert!(matches!(
        TwoNn::new().build().unwrap().estimate(&cloud),
        Err(IdError::InsufficientData { what: "features", .. })
    ));
}

#[test]
fn test_too_few_points() {
    let data = hyperball(10, 2, 2, 1.0, 0).unwrap();
    let cloud = PointCloud::new(&data, 2).unwrap();
    assert!(matches!(
        Mle::new().k(20).build().unwrap().estimate(&cloud),
        Err(IdError::InsufficientData { .. })
    ));
    assert!(matches!(
        CorrInt::new().build().unwrap().estimate(&cloud),
        Err(IdError::InsufficientData { .. })
    ));
}

#[test]
fn test_mle_all_duplicates_is_degenerate() {
    let data = vec![1.0; 2 * 30];
    let cloud = PointCloud::new(&data, 2).unwrap();
    assert!(matches!(
        Mle::new().k(5).build().unwrap().estimate(&cloud),
        Err(IdError::NumericDegeneracy(_))
    ));
}

#[test]
fn test_pca_constant_cloud_is_degenerate() {
    let data = vec![3.0; 3 * 10];
    let cloud = PointCloud::new(&data, 3).unwrap();
    assert!(matches!(
        Pca::new().build().unwrap().estimate(&cloud),
        Err(IdError::NumericDegeneracy(_))
    ));
}

// ============================================================================
// Builder Tests
// ============================================================================

#[test]
fn test_builder_defaults() {
    let twonn = TwoNn::<f64>::new().build().unwrap();
    assert_relative_eq!(twonn.discard_fraction(), 0.1);
    let mle = Mle::<f64>::new().build().unwrap();
    assert_eq!(mle.k(), 20);
    assert_eq!(mle.averaging(), Averaging::Mean);
}

#[test]
fn test_builder_duplicates() {
    assert_eq!(
        TwoNn::<f64>::new()
            .discard_fraction(0.1)
            .discard_fraction(0.2)
            .build()
            .unwrap_err(),
        IdError::DuplicateParameter {
            parameter: "discard_fraction"
        }
    );
    assert!(matches!(
        Mle::<f64>::new().k(5).k(6).build(),
        Err(IdError::DuplicateParameter { parameter: "k" })
    ));
    assert!(matches!(
        CorrInt::<f64>::new().k2(30).k2(40).build(),
        Err(IdError::DuplicateParameter { parameter: "k2" })
    ));
    assert!(matches!(
        Pca::new()
            .rule(SpectralRule::Kaiser)
            .rule(SpectralRule::MaxGap)
            .build(),
        Err(IdError::DuplicateParameter { parameter: "rule" })
    ));
}

#[test]
fn test_builder_invalid_parameters() {
    assert!(TwoNn::<f64>::new().discard_fraction(1.0).build().is_err());
    assert!(TwoNn::<f64>::new().discard_fraction(-0.1).build().is_err());
    assert!(Mle::<f64>::new().k(1).build().is_err());
    assert!(CorrInt::<f64>::new().k1(20).k2(10).build().is_err());
    assert!(CorrInt::<f64>::new().k1(0).build().is_err());
    assert!(CorrInt::<f64>::new().max_points(15).build().is_err());
    assert!(
        Pca::new()
            .rule(SpectralRule::Ratio { alpha: 1.5 })
            .build()
            .is_err()
    );
}
