//! Execution engine for pointwise estimation.
//!
//! ## Purpose
//!
//! This module provides the engine that applies one estimator to the
//! neighborhood of every query point. It extracts neighborhoods from a shared
//! [`NeighborIndex`], hands them to the estimator according to its scope and
//! assembles the per-point estimates, downgrading per-point numerical
//! failures to the NaN sentinel.
//!
//! ## Design notes
//!
//! * **Fatal first**: Whole-run problems (invalid subset rows, `k` larger
//!   than the index can provide) are detected before any work starts.
//! * **Chunked**: The query list is split into contiguous chunks
//!   ([`WorkPartition`]). Each chunk owns a [`PointwiseWorkspace`], so no
//!   scratch buffer is shared between threads.
//! * **Bounded pool**: With the `parallel` feature and more than one job,
//!   chunks run on a dedicated rayon pool of exactly `n_jobs` threads. Results
//!   are collected in chunk order, so output order never depends on timing.
//! * **Scope dispatch**: Global estimators see the neighbor rows as a cloud;
//!   local estimators see a [`LocalView`] anchored at the query point.
//!
//! ## Key concepts
//!
//! * **Recoverable failure**: `NumericDegeneracy`, `InsufficientData` or a
//!   non-finite estimate. Recorded as a [`PointFailure`] next to NaN.
//! * **Fatal failure**: Any other error. Aborts the run as [`IdError::AtPoint`].
//!
//! ## Invariants
//!
//! * One output value per query, in query order.
//! * The estimator is only borrowed immutably.
//!
//! ## Non-goals
//!
//! * This module does not validate raw input buffers (handled by the adapters).
//! * This module does not cancel or time out running work.

use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::algorithms::estimator::{Estimator, LocalView, Scope};
use crate::engine::output::{NeighborhoodKind, PointFailure, PointwiseResult};
use crate::engine::workspace::PointwiseWorkspace;
use crate::math::index::{NeighborIndex, Query};
use crate::math::linalg::FloatLinalg;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;
use crate::primitives::partition::{WorkPartition, resolve_n_jobs};
use crate::primitives::validator::Validator;

// ============================================================================
// Configuration
// ============================================================================

/// Resolved configuration of a pointwise run.
#[derive(Debug, Clone, PartialEq)]
pub struct PointwiseConfig<T> {
    /// How neighborhoods are formed.
    pub neighborhood: NeighborhoodKind<T>,
    /// Requested worker count (`0` = all cores).
    pub n_jobs: usize,
    /// Whether the query point belongs to its own neighborhood.
    pub self_inclusive: bool,
    /// Queries per chunk (`None` = derived from the worker count).
    pub chunk_size: Option<usize>,
}

/// Estimates and failures of one chunk.
struct ChunkOutput<T> {
    dimensions: Vec<T>,
    failures: Vec<PointFailure>,
}

// ============================================================================
// Executor
// ============================================================================

/// Applies an estimator to every query point of a shared index.
pub struct PointwiseExecutor<'i, 'a, T: FloatLinalg> {
    index: &'i NeighborIndex<'a, T>,
    config: PointwiseConfig<T>,
}

impl<'i, 'a, T: FloatLinalg> PointwiseExecutor<'i, 'a, T> {
    /// Create an executor over a built index.
    pub fn new(index: &'i NeighborIndex<'a, T>, config: PointwiseConfig<T>) -> Self {
        Self { index, config }
    }

    /// Run `estimator` on the neighborhood of each row in `queries`.
    pub fn run<E>(&self, queries: &[usize], estimator: &E) -> Result<PointwiseResult<T>, IdError>
    where
        E: Estimator<T> + ?Sized,
    {
        self.check_run(queries)?;

        let workers = resolve_n_jobs(self.config.n_jobs);
        let partition = WorkPartition::new(queries.len(), workers, self.config.chunk_size);
        if self.capacity() < estimator.min_points() {
            warn!(
                "{}: neighborhoods of at most {} points are below its minimum of {}",
                estimator.name(),
                self.capacity(),
                estimator.min_points()
            );
        }

        let chunks = self.dispatch(queries, estimator, &partition, workers)?;

        let mut dimensions = Vec::with_capacity(queries.len());
        let mut failures = Vec::new();
        for chunk in chunks {
            dimensions.extend(chunk.dimensions);
            failures.extend(chunk.failures);
        }

        info!(
            "{}: {} pointwise estimates, {} fell back to NaN",
            estimator.name(),
            dimensions.len(),
            failures.len()
        );

        Ok(PointwiseResult {
            dimensions,
            indices: queries.to_vec(),
            failures,
            estimator: estimator.name(),
            neighborhood: self.config.neighborhood,
            self_inclusive: self.config.self_inclusive,
        })
    }

    /// Reject problems that would fail every point.
    fn check_run(&self, queries: &[usize]) -> Result<(), IdError> {
        Validator::validate_subset(queries, self.index.n_points())?;
        if let NeighborhoodKind::Knn(k) = self.config.neighborhood {
            let available = self
                .index
                .available(&Query::Index(0), self.config.self_inclusive);
            if k > available {
                return Err(IdError::IndexQuery {
                    requested: k,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Largest neighborhood a query can produce.
    fn capacity(&self) -> usize {
        match self.config.neighborhood {
            NeighborhoodKind::Knn(k) => k,
            NeighborhoodKind::Radius { max_neighbors, .. } => max_neighbors,
        }
    }

    #[cfg(feature = "parallel")]
    fn dispatch<E>(
        &self,
        queries: &[usize],
        estimator: &E,
        partition: &WorkPartition,
        workers: usize,
    ) -> Result<Vec<ChunkOutput<T>>, IdError>
    where
        E: Estimator<T> + ?Sized,
    {
        if workers <= 1 || partition.n_chunks() <= 1 {
            return self.run_sequential(queries, estimator, partition);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| IdError::WorkerPool(e.to_string()))?;
        debug!(
            "pointwise: {} queries in {} chunks on {} workers",
            partition.n_queries(),
            partition.n_chunks(),
            workers
        );

        pool.install(|| {
            (0..partition.n_chunks())
                .into_par_iter()
                .map(|c| self.run_chunk(&queries[partition.chunk(c)], estimator))
                .collect()
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn dispatch<E>(
        &self,
        queries: &[usize],
        estimator: &E,
        partition: &WorkPartition,
        workers: usize,
    ) -> Result<Vec<ChunkOutput<T>>, IdError>
    where
        E: Estimator<T> + ?Sized,
    {
        if workers > 1 {
            warn!(
                "n_jobs = {} requested but the `parallel` feature is disabled; running sequentially",
                workers
            );
        }
        self.run_sequential(queries, estimator, partition)
    }

    fn run_sequential<E>(
        &self,
        queries: &[usize],
        estimator: &E,
        partition: &WorkPartition,
    ) -> Result<Vec<ChunkOutput<T>>, IdError>
    where
        E: Estimator<T> + ?Sized,
    {
        partition
            .chunks()
            .map(|range| self.run_chunk(&queries[range], estimator))
            .collect()
    }

    /// Process one contiguous slice of queries with a private workspace.
    fn run_chunk<E>(&self, queries: &[usize], estimator: &E) -> Result<ChunkOutput<T>, IdError>
    where
        E: Estimator<T> + ?Sized,
    {
        let mut workspace = PointwiseWorkspace::new(self.capacity(), self.index.dims());
        let mut out = ChunkOutput {
            dimensions: Vec::with_capacity(queries.len()),
            failures: Vec::new(),
        };

        for &i in queries {
            let outcome = self
                .estimate_point(i, estimator, &mut workspace)
                .and_then(|d| {
                    if d.is_finite() {
                        Ok(d)
                    } else {
                        Err(IdError::degenerate("non-finite estimate"))
                    }
                });

            match outcome {
                Ok(d) => out.dimensions.push(d),
                Err(e) if e.is_recoverable() => {
                    debug!("{}: point {} set to NaN: {}", estimator.name(), i, e);
                    out.dimensions.push(T::nan());
                    out.failures.push(PointFailure { index: i, error: e });
                }
                Err(e) => return Err(e.at_point(i)),
            }
        }
        Ok(out)
    }

    /// Extract the neighborhood of row `i` and run the estimator on it.
    fn estimate_point<E>(
        &self,
        i: usize,
        estimator: &E,
        workspace: &mut PointwiseWorkspace<T>,
    ) -> Result<T, IdError>
    where
        E: Estimator<T> + ?Sized,
    {
        workspace.clear();
        let self_inclusive = self.config.self_inclusive;
        let PointwiseWorkspace { search, neighbors } = workspace;

        match self.config.neighborhood {
            NeighborhoodKind::Knn(k) => {
                self.index
                    .query_into(Query::Index(i), k, self_inclusive, search, neighbors)?;
            }
            NeighborhoodKind::Radius {
                radius,
                max_neighbors,
            } => {
                self.index
                    .query_radius_into(Query::Index(i), radius, self_inclusive, search, neighbors)?;
                neighbors.indices.truncate(max_neighbors);
                neighbors.distances.truncate(max_neighbors);
            }
        }
        self.index.gather(neighbors);

        let rows = PointCloud::new(&neighbors.coords, self.index.dims())?;
        match estimator.scope() {
            Scope::Global => estimator.estimate(&rows),
            Scope::Local => {
                let center = self.index.cloud().point(i);
                let view = LocalView::new(center, rows, &neighbors.distances, self_inclusive)?;
                estimator.estimate_local(&view)
            }
        }
    }
}
