//! Local estimators: one dimension estimate per neighborhood.
//!
//! ## Purpose
//!
//! This module collects the estimators that characterize the neighborhood of
//! a single reference point. Distance-based estimators read the sorted
//! distances of a [`LocalView`](crate::algorithms::estimator::LocalView);
//! spectral ones read its rows.
//!
//! * [`lpca::LocalPca`]: covariance spectrum of the neighborhood.
//! * [`mle::LocalMle`]: Levina-Bickel likelihood at the reference point.
//! * [`mom::Mom`]: method of moments on neighbor distances.
//! * [`mada::Mada`]: manifold-adaptive doubling ratio.
//! * [`fisher_s::FisherS`]: Fisher separability analysis.

/// Local PCA.
pub mod lpca;

/// Local maximum likelihood.
pub mod mle;

/// Method of moments.
pub mod mom;

/// Manifold-adaptive estimator.
pub mod mada;

/// Fisher separability.
pub mod fisher_s;
