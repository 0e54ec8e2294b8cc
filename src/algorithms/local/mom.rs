//! Method of moments local estimator (Amsaleg et al., 2018).
//!
//! With `m₁` the mean of the `k` neighbor distances and `T_k` the largest,
//! the estimate is `-m₁ / (m₁ - T_k)`.

use crate::algorithms::estimator::{
    Estimator, LocalView, Scope, centroid_distances, param, require, require_positive_distances,
};
use crate::math::linalg::FloatLinalg;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;

/// Method of moments estimate from ascending neighbor distances.
pub fn moments<T: FloatLinalg>(distances: &[T]) -> Result<T, IdError> {
    let k = distances.len();
    require("neighbors", k, 2)?;
    require_positive_distances(distances)?;

    let t_k = distances[k - 1];
    let m1 = distances.iter().fold(T::zero(), |acc, &t| acc + t) / param::<T>(k as f64);
    let gap = m1 - t_k;
    if !(gap < T::zero()) {
        return Err(IdError::degenerate("all neighbor distances are equal"));
    }
    Ok(-m1 / gap)
}

/// Method of moments estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mom;

impl Mom {
    /// Create the estimator (it has no parameters).
    pub fn new() -> Self {
        Self
    }
}

impl<T: FloatLinalg> Estimator<T> for Mom {
    fn name(&self) -> &'static str {
        "mom"
    }

    fn scope(&self) -> Scope {
        Scope::Local
    }

    fn min_points(&self) -> usize {
        2
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        moments(&centroid_distances(cloud))
    }

    fn estimate_local(&self, view: &LocalView<'_, T>) -> Result<T, IdError> {
        moments(view.neighbor_distances())
    }
}
