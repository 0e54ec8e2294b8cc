//! Order statistics for reducers and scale selection.
//!
//! ## Purpose
//!
//! This module provides medians and quantiles over float slices, used by the
//! correlation-integral scale selection and the aggregate reducers.
//!
//! ## Design notes
//!
//! * **Algorithm**: Uses Quickselect for O(n) median finding.
//! * **Memory**: In-place variants reorder the caller's buffer instead of
//!   allocating.
//!
//! ## Invariants
//!
//! * Handles even and odd population sizes correctly (even sizes average the
//!   two middle values).
//!
//! ## Non-goals
//!
//! * This module does not filter non-finite values; callers exclude NaN first.

use core::cmp::Ordering::Equal;
use num_traits::Float;

/// Median of `vals`, reordering the slice in place. Empty input yields NaN.
#[inline]
pub fn median_inplace<T: Float>(vals: &mut [T]) -> T {
    let n = vals.len();
    if n == 0 {
        return T::nan();
    }

    let mid = n / 2;
    vals.select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap_or(Equal));
    let upper = vals[mid];

    if n % 2 == 0 {
        // Largest value of the lower half
        let lower = vals[..mid].iter().copied().fold(T::neg_infinity(), T::max);
        (lower + upper) / (T::one() + T::one())
    } else {
        upper
    }
}

/// Linear-interpolated quantile `q ∈ [0, 1]` of an ascending slice.
pub fn quantile_sorted<T: Float>(sorted: &[T], q: T) -> T {
    let n = sorted.len();
    if n == 0 {
        return T::nan();
    }
    let pos = q.max(T::zero()).min(T::one()) * T::from(n - 1).unwrap_or_else(T::zero);
    let lo = pos.floor().to_usize().unwrap_or(0).min(n - 1);
    let hi = (lo + 1).min(n - 1);
    let frac = pos - pos.floor();
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Sort a float slice ascending; NaN compares equal to everything.
#[inline]
pub fn sort_floats<T: Float>(vals: &mut [T]) {
    vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Equal));
}
