//! Input validation for estimator configuration and data.
//!
//! ## Purpose
//!
//! This module provides the validation functions shared by every builder and
//! entry point: input shape and finiteness, parameter bounds, and duplicate
//! builder calls.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Named**: Every parameter error carries the parameter name.
//!
//! ## Invariants
//!
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not sort, transform, or filter input data.
//! * This module does not provide automatic correction of invalid inputs.

use num_traits::Float;

use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for estimator configuration and input data.
///
/// Provides static methods that return `Result<_, IdError>` and fail fast
/// upon identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Core Input Validation
    // ========================================================================

    /// Validate a row-major buffer and wrap it as a cloud.
    pub fn validate_inputs<T: Float>(data: &[T], dims: usize) -> Result<PointCloud<'_, T>, IdError> {
        // Check 1: Non-empty
        if data.is_empty() {
            return Err(IdError::EmptyInput);
        }

        // Check 2: Shape
        let cloud = PointCloud::new(data, dims)?;

        // Check 3: All values finite
        cloud.ensure_finite()?;

        Ok(cloud)
    }

    /// Validate that a cloud holds at least `min` points.
    pub fn validate_min_points(n_points: usize, min: usize) -> Result<(), IdError> {
        if n_points < min {
            return Err(IdError::InsufficientData {
                what: "points",
                got: n_points,
                min,
            });
        }
        Ok(())
    }

    /// Validate a subset of row indices against the cloud size.
    pub fn validate_subset(subset: &[usize], n_points: usize) -> Result<(), IdError> {
        match subset.iter().find(|&&i| i >= n_points) {
            Some(&index) => Err(IdError::InvalidIndex {
                index,
                len: n_points,
            }),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate a neighbor count against its lower bound.
    pub fn validate_neighbor_count(
        parameter: &'static str,
        k: usize,
        min: usize,
    ) -> Result<(), IdError> {
        if k < min {
            return Err(IdError::invalid(
                parameter,
                format!("must be at least {}, got {}", min, k),
            ));
        }
        Ok(())
    }

    /// Validate a pair of neighbor ranks `k1 < k2`.
    pub fn validate_scale_pair(k1: usize, k2: usize) -> Result<(), IdError> {
        Self::validate_neighbor_count("k1", k1, 1)?;
        if k2 <= k1 {
            return Err(IdError::invalid(
                "k2",
                format!("must be greater than k1 ({}), got {}", k1, k2),
            ));
        }
        Ok(())
    }

    /// Validate a fraction in the half-open interval `[lo, hi)`.
    pub fn validate_fraction(
        parameter: &'static str,
        value: f64,
        lo: f64,
        hi: f64,
    ) -> Result<(), IdError> {
        if !value.is_finite() || value < lo || value >= hi {
            return Err(IdError::invalid(
                parameter,
                format!("must be in [{}, {}), got {}", lo, hi, value),
            ));
        }
        Ok(())
    }

    /// Validate a strictly positive, finite scalar.
    pub fn validate_positive(parameter: &'static str, value: f64) -> Result<(), IdError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(IdError::invalid(
                parameter,
                format!("must be finite and positive, got {}", value),
            ));
        }
        Ok(())
    }

    /// Validate a margin grid: non-empty, inside (0, 1), strictly increasing.
    pub fn validate_alphas(alphas: &[f64]) -> Result<(), IdError> {
        if alphas.is_empty() {
            return Err(IdError::invalid("alphas", "must not be empty"));
        }
        if let Some(&a) = alphas.iter().find(|&&a| !(a > 0.0 && a < 1.0)) {
            return Err(IdError::invalid(
                "alphas",
                format!("values must lie in (0, 1), got {}", a),
            ));
        }
        if alphas.windows(2).any(|w| w[1] <= w[0]) {
            return Err(IdError::invalid("alphas", "values must be strictly increasing"));
        }
        Ok(())
    }

    // ========================================================================
    // Driver Validation
    // ========================================================================

    /// Validate the chunk size for chunked pointwise processing.
    pub fn validate_chunk_size(chunk_size: usize) -> Result<(), IdError> {
        if chunk_size == 0 {
            return Err(IdError::invalid("chunk_size", "must be at least 1"));
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), IdError> {
        if let Some(param) = duplicate_param {
            return Err(IdError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
