//! Reducers and summaries over estimates with missing values.
//!
//! ## Purpose
//!
//! This module combines many dimension estimates (one per point, or one per
//! estimator) into a single value, and summarizes their distribution.
//!
//! ## Design notes
//!
//! * **Missing values**: NaN is the "not available" sentinel and is excluded
//!   everywhere. A reduction with no valid entry is NaN, not an error; an
//!   out-of-range trim fraction is.
//! * **Trimming**: `TrimmedMean(f)` drops `⌊f·n⌋` valid values from each end
//!   of the sorted estimates before averaging.
//!
//! ## Invariants
//!
//! * `valid + missing` equals the input length.
//! * The trim fraction lies in `[0, 0.5)`.

use core::fmt;
use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::math::order_stats::{median_inplace, quantile_sorted, sort_floats};
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

// ============================================================================
// Reducer
// ============================================================================

/// How a set of estimates is combined into one value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Median.
    Median,
    /// Mean after dropping the given fraction of values at each end.
    TrimmedMean(f64),
}

impl Reducer {
    /// Check the trim fraction.
    pub fn validate(&self) -> Result<(), IdError> {
        if let Reducer::TrimmedMean(f) = *self {
            Validator::validate_fraction("trim", f, 0.0, 0.5)?;
        }
        Ok(())
    }

    /// Reduce `values`, ignoring NaN entries.
    pub fn reduce<T: Float>(&self, values: &[T]) -> Result<T, IdError> {
        self.validate()?;

        let mut valid = present_values(values);
        if valid.is_empty() {
            return Ok(T::nan());
        }
        Ok(match *self {
            Reducer::Mean => mean(&valid),
            Reducer::Median => median_inplace(&mut valid),
            Reducer::TrimmedMean(f) => {
                sort_floats(&mut valid);
                let cut = ((valid.len() as f64) * f).floor() as usize;
                mean(&valid[cut..valid.len() - cut])
            }
        })
    }
}

fn present_values<T: Float>(values: &[T]) -> Vec<T> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

fn mean<T: Float>(values: &[T]) -> T {
    if values.is_empty() {
        return T::nan();
    }
    let n = T::from(values.len()).unwrap_or_else(T::nan);
    values.iter().fold(T::zero(), |acc, &v| acc + v) / n
}

// ============================================================================
// Summary
// ============================================================================

/// Distribution summary of a set of estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary<T> {
    /// Number of non-NaN estimates.
    pub valid: usize,
    /// Number of NaN estimates.
    pub missing: usize,
    /// Mean of valid estimates.
    pub mean: T,
    /// Median of valid estimates.
    pub median: T,
    /// First quartile of valid estimates.
    pub q1: T,
    /// Third quartile of valid estimates.
    pub q3: T,
    /// Smallest valid estimate.
    pub min: T,
    /// Largest valid estimate.
    pub max: T,
    /// Sample standard deviation (NaN with fewer than two valid estimates).
    pub std: T,
}

/// Summarize `values`, ignoring NaN entries.
pub fn summarize<T: Float>(values: &[T]) -> Summary<T> {
    let mut valid = present_values(values);
    let n = valid.len();
    let missing = values.len() - n;

    let mu = mean(&valid);
    let std = if n < 2 {
        T::nan()
    } else {
        let ss = valid
            .iter()
            .fold(T::zero(), |acc, &v| acc + (v - mu) * (v - mu));
        (ss / T::from(n - 1).unwrap_or_else(T::nan)).sqrt()
    };
    sort_floats(&mut valid);
    let quartile = |q: f64| quantile_sorted(&valid, T::from(q).unwrap_or_else(T::nan));
    let (min, max) = match (valid.first(), valid.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => (T::nan(), T::nan()),
    };

    Summary {
        valid: n,
        missing,
        mean: mu,
        median: quartile(0.5),
        q1: quartile(0.25),
        q3: quartile(0.75),
        min,
        max,
        std,
    }
}

impl<T: Float + fmt::Display> fmt::Display for Summary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Valid:   {} ({} missing)", self.valid, self.missing)?;
        writeln!(f, "  Mean:    {:.4}", self.mean)?;
        writeln!(f, "  Median:  {:.4}", self.median)?;
        writeln!(f, "  IQR:     [{:.4}, {:.4}]", self.q1, self.q3)?;
        writeln!(f, "  Range:   [{:.4}, {:.4}]", self.min, self.max)?;
        writeln!(f, "  Std:     {:.4}", self.std)
    }
}
