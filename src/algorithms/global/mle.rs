//! Levina-Bickel maximum likelihood global estimator.
//!
//! ## Purpose
//!
//! This module averages the pointwise Levina-Bickel estimate
//! ([`levina_bickel`]) over every point of a cloud, using each point's `k`
//! nearest neighbors (the point itself excluded).
//!
//! ## Design notes
//!
//! * **Averaging**: `Mean` is the arithmetic mean of the pointwise estimates
//!   (Levina & Bickel). `Inverse` averages their reciprocals and inverts the
//!   result (MacKay & Ghahramani), which is less sensitive to a few large
//!   pointwise values.
//! * **Degenerate points**: Points whose neighborhood contains duplicates are
//!   skipped. The estimate fails only when no point is usable.
//!
//! ## Invariants
//!
//! * `k >= 2` and the cloud has at least `k + 1` points.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithms::estimator::{Estimator, Scope, param};
use crate::algorithms::local::mle::levina_bickel;
use crate::math::distance::DistanceMetric;
use crate::math::index::{NeighborIndex, Query, SearchBuffer};
use crate::math::linalg::FloatLinalg;
use crate::primitives::buffer::NeighborBuffer;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

const DEFAULT_K: usize = 20;

/// How pointwise estimates are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Averaging {
    /// Arithmetic mean of the pointwise estimates.
    #[default]
    Mean,
    /// Reciprocal of the mean reciprocal.
    Inverse,
}

/// Global maximum likelihood estimator.
#[derive(Debug, Clone)]
pub struct Mle<T: FloatLinalg> {
    k: usize,
    averaging: Averaging,
    metric: DistanceMetric<T>,
}

impl<T: FloatLinalg> Mle<T> {
    /// Start configuring an MLE estimator.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> MleBuilder<T> {
        MleBuilder::new()
    }

    /// Neighbors used per point.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Averaging scheme.
    pub fn averaging(&self) -> Averaging {
        self.averaging
    }

    /// Pointwise estimates for every point, NaN where the neighborhood is degenerate.
    pub fn pointwise(&self, cloud: &PointCloud<'_, T>) -> Result<Vec<T>, IdError> {
        Validator::validate_min_points(cloud.n_points(), self.k + 1)?;

        let index = NeighborIndex::new(*cloud, self.metric.clone())?;
        let mut search = SearchBuffer::new(self.k);
        let mut out = NeighborBuffer::new(self.k, 0);

        let mut estimates = Vec::with_capacity(cloud.n_points());
        for i in 0..cloud.n_points() {
            index.query_into(Query::Index(i), self.k, false, &mut search, &mut out)?;
            match levina_bickel(&out.distances) {
                Ok(m) => estimates.push(m),
                Err(e) if e.is_recoverable() => {
                    debug!("mle: skipping point {}: {}", i, e);
                    estimates.push(T::nan());
                }
                Err(e) => return Err(e.at_point(i)),
            }
        }
        Ok(estimates)
    }
}

impl<T: FloatLinalg> Estimator<T> for Mle<T> {
    fn name(&self) -> &'static str {
        "mle"
    }

    fn scope(&self) -> Scope {
        Scope::Global
    }

    fn min_points(&self) -> usize {
        self.k + 1
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        let pointwise = self.pointwise(cloud)?;

        let (sum, count) = pointwise
            .iter()
            .filter(|m| m.is_finite())
            .fold((T::zero(), 0usize), |(sum, count), &m| match self.averaging {
                Averaging::Mean => (sum + m, count + 1),
                Averaging::Inverse => (sum + m.recip(), count + 1),
            });
        if count == 0 {
            return Err(IdError::degenerate(
                "every neighborhood has zero or tied distances",
            ));
        }

        let mean = sum / param::<T>(count as f64);
        Ok(match self.averaging {
            Averaging::Mean => mean,
            Averaging::Inverse => mean.recip(),
        })
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Mle`].
#[derive(Debug, Clone)]
pub struct MleBuilder<T> {
    k: Option<usize>,
    averaging: Option<Averaging>,
    metric: Option<DistanceMetric<T>>,
    duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg> Default for MleBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg> MleBuilder<T> {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            k: None,
            averaging: None,
            metric: None,
            duplicate_param: None,
        }
    }

    /// Neighbors per point (default 20, at least 2).
    pub fn k(mut self, k: usize) -> Self {
        if self.k.is_some() {
            self.duplicate_param = Some("k");
        }
        self.k = Some(k);
        self
    }

    /// Averaging scheme (default [`Averaging::Mean`]).
    pub fn averaging(mut self, averaging: Averaging) -> Self {
        if self.averaging.is_some() {
            self.duplicate_param = Some("averaging");
        }
        self.averaging = Some(averaging);
        self
    }

    /// Distance metric for the neighbor search (default Euclidean).
    pub fn metric(mut self, metric: DistanceMetric<T>) -> Self {
        if self.metric.is_some() {
            self.duplicate_param = Some("metric");
        }
        self.metric = Some(metric);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Mle<T>, IdError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let k = self.k.unwrap_or(DEFAULT_K);
        Validator::validate_neighbor_count("k", k, 2)?;

        Ok(Mle {
            k,
            averaging: self.averaging.unwrap_or_default(),
            metric: self.metric.unwrap_or_default(),
        })
    }
}
