//! Error types for intrinsic dimension estimation.
//!
//! ## Purpose
//!
//! This module defines the single error type shared by every layer of the
//! crate. Variants are grouped by the stage that raises them: construction
//! (configuration), input validation, numerical estimation, neighbor queries
//! and batch execution.
//!
//! ## Design notes
//!
//! * **Cloneable**: Errors are `Clone + PartialEq` so pointwise runs can keep a
//!   copy of each per-point failure next to the NaN sentinel.
//! * **Recoverability**: [`IdError::is_recoverable`] is the one place that
//!   decides which failures the pointwise driver downgrades to a sentinel.
//! * **Located**: Failures raised inside batch operations are wrapped in
//!   [`IdError::AtPoint`] so the message names the offending point.
//!
//! ## Non-goals
//!
//! * This module does not log; callers decide the log level.

use thiserror::Error;

/// Errors raised while configuring, fitting or querying estimators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IdError {
    /// Malformed or unrecognized configuration document.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A parameter value is outside its documented domain.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human readable constraint that was violated.
        reason: String,
    },

    /// A builder parameter was set more than once.
    #[error(
        "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
    )]
    DuplicateParameter {
        /// Name of the duplicated parameter.
        parameter: &'static str,
    },

    /// No data was supplied.
    #[error("Input data is empty")]
    EmptyInput,

    /// Flat buffer length does not match the declared dimensionality.
    #[error("Length mismatch: {len} values cannot be split into rows of {dims} coordinates")]
    MismatchedDimensions {
        /// Length of the flat buffer.
        len: usize,
        /// Declared number of coordinates per point.
        dims: usize,
    },

    /// Input contains NaN or infinite values.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// A row index is out of bounds.
    #[error("Invalid point index: {index} (cloud has {len} points)")]
    InvalidIndex {
        /// Requested row.
        index: usize,
        /// Number of rows available.
        len: usize,
    },

    /// Fewer points (or coordinates) than the procedure requires.
    #[error("Insufficient data: got {got} {what}, need at least {min}")]
    InsufficientData {
        /// What was counted ("points", "neighbors", "features").
        what: &'static str,
        /// Number supplied.
        got: usize,
        /// Documented minimum.
        min: usize,
    },

    /// The numerical procedure cannot produce a valid estimate for this input.
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// More neighbors were requested than the index can provide.
    #[error("Neighbor query failed: requested {requested} neighbors, only {available} available")]
    IndexQuery {
        /// Requested neighbor count.
        requested: usize,
        /// Points available after self-exclusion.
        available: usize,
    },

    /// The estimate was read before any successful fit.
    #[error("Estimator has not been fitted")]
    NotFitted,

    /// The worker pool could not be created.
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// A failure raised while processing one point of a batch.
    #[error("Point {index}: {source}")]
    AtPoint {
        /// Index of the point in the input cloud.
        index: usize,
        /// Underlying failure.
        #[source]
        source: Box<IdError>,
    },
}

impl IdError {
    /// Whether the pointwise driver may replace this failure with the NaN sentinel.
    ///
    /// Only failures of the numerical procedure on one neighborhood qualify;
    /// configuration and input problems always abort the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            IdError::NumericDegeneracy(_) | IdError::InsufficientData { .. } => true,
            IdError::AtPoint { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    /// Attach the index of the point being processed.
    pub fn at_point(self, index: usize) -> Self {
        IdError::AtPoint {
            index,
            source: Box::new(self),
        }
    }

    /// Shorthand for [`IdError::InvalidParameter`].
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        IdError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`IdError::NumericDegeneracy`].
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        IdError::NumericDegeneracy(reason.into())
    }
}

impl From<serde_json::Error> for IdError {
    fn from(err: serde_json::Error) -> Self {
        IdError::Configuration(err.to_string())
    }
}
