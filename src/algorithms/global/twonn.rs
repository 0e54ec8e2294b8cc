//! TWO-NN global estimator.
//!
//! ## Purpose
//!
//! This module implements the two-nearest-neighbor estimator of Facco et al.
//! (2017). For every point the ratio `μ = r₂ / r₁` of its second to first
//! neighbor distance follows a Pareto law whose exponent is the intrinsic
//! dimension.
//!
//! ## Design notes
//!
//! * **Regression through the origin**: After discarding the largest
//!   `discard_fraction` of ratios, the slope of `-ln(1 - F)` on `ln μ` is
//!   `Σxy / Σx²`, with the empirical CDF `F(i) = i / N` over sorted ratios.
//! * **Index reuse**: Nearest neighbors come from a
//!   [`NeighborIndex`](crate::math::index::NeighborIndex) built with the
//!   configured metric.
//!
//! ## Invariants
//!
//! * Requires at least 3 points and at least 2 coordinates.
//! * Duplicate points (`r₁ = 0`) are a numeric degeneracy, never an infinite ratio.

use crate::algorithms::estimator::{Estimator, Scope, param, require};
use crate::math::distance::DistanceMetric;
use crate::math::index::{NeighborIndex, Query, SearchBuffer};
use crate::math::linalg::FloatLinalg;
use crate::math::order_stats::sort_floats;
use crate::primitives::buffer::NeighborBuffer;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

const DEFAULT_DISCARD_FRACTION: f64 = 0.1;

/// The TWO-NN estimator.
#[derive(Debug, Clone)]
pub struct TwoNn<T: FloatLinalg> {
    discard_fraction: f64,
    metric: DistanceMetric<T>,
}

/// The regression behind a TWO-NN estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoNnFit<T> {
    /// Estimated intrinsic dimension (the fitted slope).
    pub dimension: T,
    /// Regressor values `ln μ`, ascending.
    pub log_mu: Vec<T>,
    /// Response values `-ln(1 - F)`.
    pub neg_log_survival: Vec<T>,
}

impl<T: FloatLinalg> TwoNn<T> {
    /// Start configuring a TWO-NN estimator.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> TwoNnBuilder<T> {
        TwoNnBuilder::new()
    }

    /// Fraction of the largest ratios discarded before the fit.
    pub fn discard_fraction(&self) -> f64 {
        self.discard_fraction
    }

    /// Metric used for the nearest neighbor search.
    pub fn metric(&self) -> &DistanceMetric<T> {
        &self.metric
    }

    /// Fit and return the full regression, not just the slope.
    pub fn fit_regression(&self, cloud: &PointCloud<'_, T>) -> Result<TwoNnFit<T>, IdError> {
        let n = cloud.n_points();
        require("points", n, 3)?;
        require("features", cloud.dims(), 2)?;

        let index = NeighborIndex::new(*cloud, self.metric.clone())?;
        let mut search = SearchBuffer::new(2);
        let mut out = NeighborBuffer::new(2, 0);

        let mut mu = Vec::with_capacity(n);
        for i in 0..n {
            index.query_into(Query::Index(i), 2, false, &mut search, &mut out)?;
            let (r1, r2) = (out.distances[0], out.distances[1]);
            if !(r1 > T::zero()) {
                return Err(IdError::degenerate(format!(
                    "point {} has a zero first-neighbor distance (duplicate points)",
                    i
                )));
            }
            mu.push(r2 / r1);
        }
        sort_floats(&mut mu);

        let kept = ((n as f64) * (1.0 - self.discard_fraction)).floor() as usize;
        mu.truncate(kept);

        let n_t: T = param(n as f64);
        let log_mu: Vec<T> = mu.iter().map(|m| m.ln()).collect();
        let neg_log_survival: Vec<T> = (0..log_mu.len())
            .map(|i| -(T::one() - param::<T>(i as f64) / n_t).ln())
            .collect();

        let (sxy, sxx) = log_mu
            .iter()
            .zip(&neg_log_survival)
            .fold((T::zero(), T::zero()), |(sxy, sxx), (&x, &y)| {
                (sxy + x * y, sxx + x * x)
            });
        if !(sxx > T::zero()) {
            return Err(IdError::degenerate("ln(mu) has zero spread"));
        }

        Ok(TwoNnFit {
            dimension: sxy / sxx,
            log_mu,
            neg_log_survival,
        })
    }
}

impl<T: FloatLinalg> Estimator<T> for TwoNn<T> {
    fn name(&self) -> &'static str {
        "twonn"
    }

    fn scope(&self) -> Scope {
        Scope::Global
    }

    fn min_points(&self) -> usize {
        3
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        self.fit_regression(cloud).map(|fit| fit.dimension)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`TwoNn`].
#[derive(Debug, Clone)]
pub struct TwoNnBuilder<T> {
    discard_fraction: Option<f64>,
    metric: Option<DistanceMetric<T>>,
    duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg> Default for TwoNnBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg> TwoNnBuilder<T> {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            discard_fraction: None,
            metric: None,
            duplicate_param: None,
        }
    }

    /// Fraction of the largest ratios to discard, in `[0, 1)` (default 0.1).
    pub fn discard_fraction(mut self, fraction: f64) -> Self {
        if self.discard_fraction.is_some() {
            self.duplicate_param = Some("discard_fraction");
        }
        self.discard_fraction = Some(fraction);
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
    pub fn build(self) -> Result<TwoNn<T>, IdError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let discard_fraction = self.discard_fraction.unwrap_or(DEFAULT_DISCARD_FRACTION);
        Validator::validate_fraction("discard_fraction", discard_fraction, 0.0, 1.0)?;

        Ok(TwoNn {
            discard_fraction,
            metric: self.metric.unwrap_or_default(),
        })
    }
}
