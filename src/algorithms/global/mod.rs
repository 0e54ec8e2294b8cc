//! Global estimators: one dimension estimate for a whole cloud.
//!
//! ## Purpose
//!
//! This module collects the estimators that summarize an entire point cloud.
//! Run through the pointwise driver, they are applied to each neighborhood's
//! rows as if it were a cloud of its own.
//!
//! * [`twonn::TwoNn`]: ratio of the two nearest neighbor distances.
//! * [`mle::Mle`]: averaged Levina-Bickel likelihood.
//! * [`corr_int::CorrInt`]: correlation dimension between two scales.
//! * [`pca::Pca`]: covariance spectrum with a spectral rule.

/// TWO-NN estimator.
pub mod twonn;

/// Maximum likelihood estimator.
pub mod mle;

/// Correlation dimension estimator.
pub mod corr_int;

/// Global PCA estimator.
pub mod pca;
