//! Output types for pointwise runs.
//!
//! ## Purpose
//!
//! This module defines [`PointwiseResult`], the container returned by the
//! pointwise driver: one estimate per query point in input order, the record
//! of points that fell back to the NaN sentinel, and the run configuration
//! needed to interpret them.
//!
//! ## Invariants
//!
//! * `dimensions.len() == indices.len()`.
//! * Every failure position holds NaN in `dimensions`.

use core::fmt;
use num_traits::Float;

use crate::evaluation::aggregate::{Reducer, Summary, summarize};
use crate::primitives::errors::IdError;

/// A query point whose estimate was replaced by NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFailure {
    /// Row index of the point in the input cloud.
    pub index: usize,
    /// Why the estimate is missing.
    pub error: IdError,
}

/// How neighborhoods were formed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeighborhoodKind<T> {
    /// The `k` nearest neighbors.
    Knn(usize),
    /// All neighbors within `radius`, at most `max_neighbors` of them.
    Radius {
        /// Search radius.
        radius: T,
        /// Cap on the neighborhood size.
        max_neighbors: usize,
    },
}

/// Per-point estimates produced by the pointwise driver.
#[derive(Debug, Clone, PartialEq)]
pub struct PointwiseResult<T> {
    /// One estimate per query, NaN where unavailable.
    pub dimensions: Vec<T>,
    /// Row index of each query, aligned with `dimensions`.
    pub indices: Vec<usize>,
    /// Points that fell back to NaN, in query order.
    pub failures: Vec<PointFailure>,
    /// Name of the estimator that produced the values.
    pub estimator: &'static str,
    /// Neighborhood definition used for every query.
    pub neighborhood: NeighborhoodKind<T>,
    /// Whether the query point was part of its own neighborhood.
    pub self_inclusive: bool,
}

impl<T: Float> PointwiseResult<T> {
    /// Number of queries.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns true if there were no queries.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Number of non-NaN estimates.
    pub fn valid_count(&self) -> usize {
        self.dimensions.iter().filter(|v| !v.is_nan()).count()
    }

    /// Share of queries that fell back to NaN (0 for an empty run).
    pub fn failure_rate(&self) -> f64 {
        if self.dimensions.is_empty() {
            return 0.0;
        }
        (self.len() - self.valid_count()) as f64 / self.len() as f64
    }

    /// Combine the estimates, ignoring NaN.
    pub fn reduce(&self, reducer: Reducer) -> Result<T, IdError> {
        reducer.reduce(&self.dimensions)
    }

    /// Distribution summary of the estimates.
    pub fn summary(&self) -> Summary<T> {
        summarize(&self.dimensions)
    }
}

/// Rows of the estimate table shown before eliding.
const DISPLAY_ROWS: usize = 10;

impl<T: Float + fmt::Display> fmt::Display for PointwiseResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Estimator: {}", self.estimator)?;
        match self.neighborhood {
            NeighborhoodKind::Knn(k) => writeln!(f, "  Neighbors: {} nearest", k)?,
            NeighborhoodKind::Radius {
                radius,
                max_neighbors,
            } => writeln!(f, "  Neighbors: radius {} (max {})", radius, max_neighbors)?,
        }
        writeln!(f, "  Queries:   {}", self.len())?;
        write!(f, "{}", self.summary())?;
        writeln!(f)?;

        writeln!(f, "{:>8} {:>12}", "Index", "Dimension")?;
        writeln!(f, "{}", "-".repeat(21))?;
        for (&i, &d) in self.indices.iter().zip(&self.dimensions).take(DISPLAY_ROWS) {
            writeln!(f, "{:>8} {:>12.4}", i, d)?;
        }
        if self.len() > DISPLAY_ROWS {
            writeln!(f, "{:>8} {:>12}", "...", "...")?;
            writeln!(f, "({} more rows)", self.len() - DISPLAY_ROWS)?;
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failures: {}", self.failures.len())?;
            for failure in self.failures.iter().take(DISPLAY_ROWS) {
                writeln!(f, "  point {}: {}", failure.index, failure.error)?;
            }
        }
        Ok(())
    }
}
