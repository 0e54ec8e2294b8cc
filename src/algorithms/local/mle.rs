//! Levina-Bickel maximum likelihood estimator at one point.
//!
//! ## Purpose
//!
//! This module implements the pointwise maximum likelihood estimate of
//! Levina & Bickel (2004). Given the sorted distances `T₁ ≤ … ≤ T_k` from a
//! reference point to its `k` nearest neighbors,
//!
//! ```text
//! m = (k - 1) / Σ_{j<k} ln(T_k / T_j)
//! ```
//!
//! The same formula drives the global [`Mle`](crate::algorithms::global::mle::Mle)
//! estimator, which averages it over every point.
//!
//! ## Invariants
//!
//! * Requires at least 2 neighbors.
//! * Zero distances and fully tied distances are numeric degeneracies.

use crate::algorithms::estimator::{
    Estimator, LocalView, Scope, centroid_distances, param, require, require_positive_distances,
};
use crate::math::linalg::FloatLinalg;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;

/// Levina-Bickel estimate from ascending neighbor distances.
pub fn levina_bickel<T: FloatLinalg>(distances: &[T]) -> Result<T, IdError> {
    let k = distances.len();
    require("neighbors", k, 2)?;
    require_positive_distances(distances)?;

    let t_k = distances[k - 1];
    let sum = distances[..k - 1]
        .iter()
        .fold(T::zero(), |acc, &t| acc + (t_k / t).ln());
    if !(sum > T::zero()) {
        return Err(IdError::degenerate("all neighbor distances are equal"));
    }
    Ok(param::<T>((k - 1) as f64) / sum)
}

/// Local maximum likelihood estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalMle;

impl LocalMle {
    /// Create the estimator (it has no parameters).
    pub fn new() -> Self {
        Self
    }
}

impl<T: FloatLinalg> Estimator<T> for LocalMle {
    fn name(&self) -> &'static str {
        "local_mle"
    }

    fn scope(&self) -> Scope {
        Scope::Local
    }

    fn min_points(&self) -> usize {
        2
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        levina_bickel(&centroid_distances(cloud))
    }

    fn estimate_local(&self, view: &LocalView<'_, T>) -> Result<T, IdError> {
        levina_bickel(view.neighbor_distances())
    }
}
