//! Standalone adapter: fit one estimator, read one estimate.
//!
//! ## Purpose
//!
//! This module provides the configure, fit, read-result workflow for a single
//! estimator on a whole cloud, a subset of it, or one explicit neighborhood.
//!
//! ## Design notes
//!
//! * **Owned result**: The estimator stays stateless; the fitted dimension
//!   lives in the adapter.
//! * **Clear first**: Every fit discards the previous result before running,
//!   so a failed re-fit leaves the adapter unfitted instead of stale.
//! * **Errors surface**: Unlike the pointwise driver, numerical failures are
//!   returned to the caller.
//!
//! ## Invariants
//!
//! * A stored dimension is always finite.

use core::cmp::Ordering::Equal;
use log::debug;

use crate::algorithms::estimator::{Estimator, LocalView};
use crate::math::linalg::FloatLinalg;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

/// A single estimator together with its last fitted result.
#[derive(Debug, Clone)]
pub struct Standalone<T, E> {
    estimator: E,
    dimension: Option<T>,
}

impl<T: FloatLinalg, E: Estimator<T>> Standalone<T, E> {
    /// Wrap a configured estimator.
    pub fn new(estimator: E) -> Self {
        Self {
            estimator,
            dimension: None,
        }
    }

    /// The wrapped estimator.
    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Unwrap the estimator.
    pub fn into_estimator(self) -> E {
        self.estimator
    }

    /// Whether a fit has succeeded since the last reset.
    pub fn is_fitted(&self) -> bool {
        self.dimension.is_some()
    }

    /// The fitted dimension, or [`IdError::NotFitted`].
    pub fn dimension(&self) -> Result<T, IdError> {
        self.dimension.ok_or(IdError::NotFitted)
    }

    /// Fit on a row-major buffer of `dims` coordinates per point.
    pub fn fit(&mut self, data: &[T], dims: usize) -> Result<&mut Self, IdError> {
        self.dimension = None;
        let cloud = Validator::validate_inputs(data, dims)?;
        self.fit_cloud(&cloud)
    }

    /// Fit on the listed rows only.
    pub fn fit_subset(
        &mut self,
        data: &[T],
        dims: usize,
        subset: &[usize],
    ) -> Result<&mut Self, IdError> {
        self.dimension = None;
        let cloud = Validator::validate_inputs(data, dims)?;
        Validator::validate_subset(subset, cloud.n_points())?;

        let mut rows = Vec::new();
        cloud.gather_into(subset, &mut rows);
        let sub = PointCloud::new(&rows, dims)?;
        self.fit_cloud(&sub)
    }

    /// Fit on the neighborhood of `center` given by `neighbors` (row-major).
    ///
    /// The reference point must not be among the neighbors. Distances are
    /// Euclidean.
    pub fn fit_neighborhood(
        &mut self,
        center: &[T],
        neighbors: &[T],
        dims: usize,
    ) -> Result<&mut Self, IdError> {
        self.dimension = None;
        let cloud = Validator::validate_inputs(neighbors, dims)?;
        if center.len() != dims {
            return Err(IdError::MismatchedDimensions {
                len: center.len(),
                dims,
            });
        }
        if center.iter().any(|v| !v.is_finite()) {
            return Err(IdError::InvalidNumericValue(
                "reference point has non-finite coordinates".into(),
            ));
        }
        Validator::validate_min_points(cloud.n_points(), self.estimator.min_points())?;

        let mut order: Vec<(T, usize)> = cloud
            .rows()
            .enumerate()
            .map(|(i, row)| (T::squared_euclidean(row, center).sqrt(), i))
            .collect();
        order.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Equal));

        let indices: Vec<usize> = order.iter().map(|&(_, i)| i).collect();
        let distances: Vec<T> = order.iter().map(|&(d, _)| d).collect();
        let mut rows = Vec::new();
        cloud.gather_into(&indices, &mut rows);

        let view = LocalView::new(center, PointCloud::new(&rows, dims)?, &distances, false)?;
        let d = self.estimator.estimate_local(&view)?;
        self.store(d)
    }

    fn fit_cloud(&mut self, cloud: &PointCloud<'_, T>) -> Result<&mut Self, IdError> {
        Validator::validate_min_points(cloud.n_points(), self.estimator.min_points())?;
        let d = self.estimator.estimate(cloud)?;
        self.store(d)
    }

    fn store(&mut self, d: T) -> Result<&mut Self, IdError> {
        if !d.is_finite() {
            return Err(IdError::degenerate(format!(
                "{} produced a non-finite estimate",
                self.estimator.name()
            )));
        }
        debug!("{}: fitted dimension {:?}", self.estimator.name(), d);
        self.dimension = Some(d);
        Ok(self)
    }
}
