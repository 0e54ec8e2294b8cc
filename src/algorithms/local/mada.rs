//! Manifold-adaptive dimension estimator (Farahmand et al., 2007).
//!
//! Compares the distance to the `k`-th neighbor with the distance to the
//! `⌈k/2⌉`-th: `ln 2 / ln(T_k / T_⌈k/2⌉)`.

use crate::algorithms::estimator::{
    Estimator, LocalView, Scope, centroid_distances, param, require, require_positive_distances,
};
use crate::math::linalg::FloatLinalg;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;

/// MADA estimate from ascending neighbor distances.
pub fn mada<T: FloatLinalg>(distances: &[T]) -> Result<T, IdError> {
    let k = distances.len();
    require("neighbors", k, 2)?;
    require_positive_distances(distances)?;

    let t_k = distances[k - 1];
    let t_half = distances[k.div_ceil(2) - 1];
    let log_ratio = (t_k / t_half).ln();
    if !(log_ratio > T::zero()) {
        return Err(IdError::degenerate(
            "distances to the k-th and k/2-th neighbors coincide",
        ));
    }
    Ok(param::<T>(core::f64::consts::LN_2) / log_ratio)
}

/// MADA estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mada;

impl Mada {
    /// Create the estimator (it has no parameters).
    pub fn new() -> Self {
        Self
    }
}

impl<T: FloatLinalg> Estimator<T> for Mada {
    fn name(&self) -> &'static str {
        "mada"
    }

    fn scope(&self) -> Scope {
        Scope::Local
    }

    fn min_points(&self) -> usize {
        2
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        mada(&centroid_distances(cloud))
    }

    fn estimate_local(&self, view: &LocalView<'_, T>) -> Result<T, IdError> {
        mada(view.neighbor_distances())
    }
}
