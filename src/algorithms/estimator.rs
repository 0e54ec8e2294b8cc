//! The contract every intrinsic dimension estimator implements.
//!
//! ## Purpose
//!
//! This module defines [`Estimator`], the single seam between the numerical
//! procedures and the execution adapters. Adapters (standalone fit, pointwise
//! driver, ensembles) depend only on this trait.
//!
//! ## Design notes
//!
//! * **Stateless**: `estimate` takes `&self`; configuration is fixed when the
//!   estimator is built and fitted results live in the adapters. This is what
//!   lets one estimator instance serve every worker of a parallel run.
//! * **Two entry points**: `estimate` runs on a whole cloud, `estimate_local`
//!   on the neighborhood of one reference point. Global estimators keep the
//!   default `estimate_local`, which forwards the neighbor rows.
//!
//! ## Key concepts
//!
//! * **Scope**: Global estimators summarize a whole cloud; local estimators
//!   characterize one neighborhood around its reference point.
//! * **Minimum size**: [`Estimator::min_points`] is the smallest cloud (or
//!   neighborhood, for local estimators) the procedure accepts.
//!
//! ## Invariants
//!
//! * Results are pure functions of data, configuration and seed.

use core::fmt::Debug;

use crate::math::linalg::FloatLinalg;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;

pub use crate::primitives::cloud::LocalView;

/// Whether an estimator summarizes whole clouds or single neighborhoods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One estimate for a whole cloud.
    Global,
    /// One estimate per neighborhood, relative to its reference point.
    Local,
}

/// An intrinsic dimension estimator.
pub trait Estimator<T: FloatLinalg>: Debug + Send + Sync {
    /// Short identifier used in logs and summaries.
    fn name(&self) -> &'static str;

    /// Global or local.
    fn scope(&self) -> Scope;

    /// Minimum number of points (or neighbors) accepted.
    fn min_points(&self) -> usize;

    /// Run the procedure on a whole cloud.
    ///
    /// Local estimators treat the cloud as the neighborhood of its centroid,
    /// with Euclidean distances and no self-match.
    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError>;

    /// Run the procedure on the neighborhood of one reference point.
    fn estimate_local(&self, view: &LocalView<'_, T>) -> Result<T, IdError> {
        self.estimate(&view.neighbors())
    }
}

impl<T: FloatLinalg, E: Estimator<T> + ?Sized> Estimator<T> for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn scope(&self) -> Scope {
        (**self).scope()
    }

    fn min_points(&self) -> usize {
        (**self).min_points()
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        (**self).estimate(cloud)
    }

    fn estimate_local(&self, view: &LocalView<'_, T>) -> Result<T, IdError> {
        (**self).estimate_local(view)
    }
}

impl<T: FloatLinalg, E: Estimator<T> + ?Sized> Estimator<T> for &E {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn scope(&self) -> Scope {
        (**self).scope()
    }

    fn min_points(&self) -> usize {
        (**self).min_points()
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        (**self).estimate(cloud)
    }

    fn estimate_local(&self, view: &LocalView<'_, T>) -> Result<T, IdError> {
        (**self).estimate_local(view)
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Ascending Euclidean distances from the centroid of `cloud` to each point.
pub fn centroid_distances<T: FloatLinalg>(cloud: &PointCloud<'_, T>) -> Vec<T> {
    let center = cloud.centroid();
    let mut distances: Vec<T> = cloud
        .rows()
        .map(|row| T::squared_euclidean(row, &center).sqrt())
        .collect();
    crate::math::order_stats::sort_floats(&mut distances);
    distances
}

/// Fail with [`IdError::InsufficientData`] when fewer than `min` items are present.
#[inline]
pub(crate) fn require(what: &'static str, got: usize, min: usize) -> Result<(), IdError> {
    if got < min {
        return Err(IdError::InsufficientData { what, got, min });
    }
    Ok(())
}

/// Fail with [`IdError::NumericDegeneracy`] when any neighbor distance is zero.
#[inline]
pub(crate) fn require_positive_distances<T: FloatLinalg>(distances: &[T]) -> Result<(), IdError> {
    if distances.first().is_some_and(|&d| !(d > T::zero())) {
        return Err(IdError::degenerate(
            "zero distance to a neighbor (duplicate points)",
        ));
    }
    Ok(())
}

/// Convert a configuration scalar to the working float type.
#[inline]
pub(crate) fn param<T: FloatLinalg>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}
