//! Pointwise adapter: one estimate per point from its neighborhood.
//!
//! ## Purpose
//!
//! This module provides the pointwise execution adapter. It builds a neighbor
//! index once, then applies any [`Estimator`] to the neighborhood of every
//! requested point, in parallel when configured.
//!
//! ## Design notes
//!
//! * **Processing**: Validates input, builds the index and delegates the
//!   per-point loop to the execution engine.
//! * **Reuse**: [`Pointwise::fit_with_index`] accepts a pre-built index so
//!   several estimators can share one tree.
//! * **Generics**: Accepts any estimator, including `Box<dyn Estimator<T>>`.
//!
//! ## Key concepts
//!
//! * **Neighborhoods**: `k` nearest neighbors by default; with a radius, all
//!   neighbors within it, capped at `n_neighbors`.
//! * **Sentinel**: Points whose neighborhood defeats the estimator yield NaN
//!   and a failure record instead of aborting the run.
//!
//! ## Invariants
//!
//! * Output order matches the input (or subset) order.
//! * All coordinates must be finite.
//!
//! ## Non-goals
//!
//! * This adapter does not cache indices between calls.

use crate::algorithms::estimator::Estimator;
use crate::engine::executor::{PointwiseConfig, PointwiseExecutor};
use crate::engine::output::{NeighborhoodKind, PointwiseResult};
use crate::math::distance::DistanceMetric;
use crate::math::index::NeighborIndex;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

const DEFAULT_N_NEIGHBORS: usize = 100;
const DEFAULT_N_JOBS: usize = 1;

// ============================================================================
// Pointwise Builder
// ============================================================================

/// Builder for the pointwise processor.
#[derive(Debug, Clone)]
pub struct PointwiseBuilder<T> {
    /// Neighborhood size (or cap, in radius mode).
    pub n_neighbors: Option<usize>,

    /// Search radius; switches to radius neighborhoods when set.
    pub radius: Option<T>,

    /// Worker count (`0` = all cores).
    pub n_jobs: Option<usize>,

    /// Distance metric for the neighbor index.
    pub metric: Option<DistanceMetric<T>>,

    /// Whether a point is part of its own neighborhood.
    pub self_inclusive: Option<bool>,

    /// Rows to estimate at, in output order.
    pub subset: Option<Vec<usize>>,

    /// Queries per work chunk.
    pub chunk_size: Option<usize>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg> Default for PointwiseBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg> PointwiseBuilder<T> {
    /// Create a new builder with default parameters.
    pub fn new() -> Self {
        Self {
            n_neighbors: None,
            radius: None,
            n_jobs: None,
            metric: None,
            self_inclusive: None,
            subset: None,
            chunk_size: None,
            duplicate_param: None,
        }
    }

    fn mark(&mut self, already_set: bool, name: &'static str) {
        if already_set {
            self.duplicate_param = Some(name);
        }
    }

    /// Set the neighborhood size (default 100).
    pub fn n_neighbors(mut self, k: usize) -> Self {
        self.mark(self.n_neighbors.is_some(), "n_neighbors");
        self.n_neighbors = Some(k);
        self
    }

    /// Use all neighbors within `radius` (capped at `n_neighbors`).
    pub fn radius(mut self, radius: T) -> Self {
        self.mark(self.radius.is_some(), "radius");
        self.radius = Some(radius);
        self
    }

    /// Set the worker count (default 1, `0` = all available cores).
    pub fn n_jobs(mut self, n_jobs: usize) -> Self {
        self.mark(self.n_jobs.is_some(), "n_jobs");
        self.n_jobs = Some(n_jobs);
        self
    }

    /// Set the distance metric (default Euclidean).
    pub fn metric(mut self, metric: DistanceMetric<T>) -> Self {
        self.mark(self.metric.is_some(), "metric");
        self.metric = Some(metric);
        self
    }

    /// Include each point in its own neighborhood (default false).
    pub fn self_inclusive(mut self, enabled: bool) -> Self {
        self.mark(self.self_inclusive.is_some(), "self_inclusive");
        self.self_inclusive = Some(enabled);
        self
    }

    /// Only estimate at these rows, in this order.
    pub fn subset(mut self, rows: Vec<usize>) -> Self {
        self.mark(self.subset.is_some(), "subset");
        self.subset = Some(rows);
        self
    }

    /// Set the number of queries per work chunk.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.mark(self.chunk_size.is_some(), "chunk_size");
        self.chunk_size = Some(chunk_size);
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the pointwise processor.
    pub fn build(self) -> Result<Pointwise<T>, IdError> {
        // Check for duplicate parameter configuration
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let n_neighbors = self.n_neighbors.unwrap_or(DEFAULT_N_NEIGHBORS);
        Validator::validate_neighbor_count("n_neighbors", n_neighbors, 1)?;

        let neighborhood = match self.radius {
            None => NeighborhoodKind::Knn(n_neighbors),
            Some(radius) => {
                let r = radius.to_f64().unwrap_or(f64::NAN);
                Validator::validate_positive("radius", r)?;
                NeighborhoodKind::Radius {
                    radius,
                    max_neighbors: n_neighbors,
                }
            }
        };

        if let Some(c) = self.chunk_size {
            Validator::validate_chunk_size(c)?;
        }

        Ok(Pointwise {
            config: PointwiseConfig {
                neighborhood,
                n_jobs: self.n_jobs.unwrap_or(DEFAULT_N_JOBS),
                self_inclusive: self.self_inclusive.unwrap_or(false),
                chunk_size: self.chunk_size,
            },
            metric: self.metric.unwrap_or_default(),
            subset: self.subset,
        })
    }
}

// ============================================================================
// Pointwise Processor
// ============================================================================

/// Pointwise processor.
#[derive(Debug, Clone)]
pub struct Pointwise<T: FloatLinalg> {
    config: PointwiseConfig<T>,
    metric: DistanceMetric<T>,
    subset: Option<Vec<usize>>,
}

impl<T: FloatLinalg> Pointwise<T> {
    /// Start configuring a pointwise run.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> PointwiseBuilder<T> {
        PointwiseBuilder::new()
    }

    /// The resolved run configuration.
    pub fn config(&self) -> &PointwiseConfig<T> {
        &self.config
    }

    /// Estimate at every point (or subset row) of a row-major buffer.
    pub fn fit<E>(&self, data: &[T], dims: usize, estimator: &E) -> Result<PointwiseResult<T>, IdError>
    where
        E: Estimator<T> + ?Sized,
    {
        let cloud = Validator::validate_inputs(data, dims)?;
        let index = NeighborIndex::new(cloud, self.metric.clone())?;
        self.fit_with_index(&index, estimator)
    }

    /// Estimate using a pre-built index (its metric overrides the configured one).
    pub fn fit_with_index<E>(
        &self,
        index: &NeighborIndex<'_, T>,
        estimator: &E,
    ) -> Result<PointwiseResult<T>, IdError>
    where
        E: Estimator<T> + ?Sized,
    {
        let queries: Vec<usize> = match &self.subset {
            Some(rows) => rows.clone(),
            None => (0..index.n_points()).collect(),
        };
        PointwiseExecutor::new(index, self.config.clone()).run(&queries, estimator)
    }
}
