//! Distance metrics for neighbor search and distance-based estimators.
//!
//! ## Purpose
//!
//! This module provides the metrics a [`NeighborIndex`](crate::math::index::NeighborIndex)
//! can be built with, and the SIMD kernels behind the default Euclidean metric.
//!
//! ## Design notes
//!
//! * **Reduced space**: Search compares *reduced* distances (squared Euclidean,
//!   un-rooted Minkowski sums) and only finalizes the survivors, avoiding a
//!   root per candidate.
//! * **Plane bounds**: Every built-in metric supplies a per-axis lower bound so
//!   the KD-tree can prune. `Custom` metrics have no bound and are searched
//!   exhaustively.
//! * **SIMD**: Squared Euclidean distance and dot products dispatch through
//!   [`DistanceLinalg`], implemented with `wide` lanes for `f64` and `f32`.
//!
//! ## Invariants
//!
//! * Distance is always non-negative.
//! * `finalize(reduced(a, b)) == distance(a, b)` and `to_reduced` inverts
//!   `finalize` on non-negative inputs.
//!
//! ## Non-goals
//!
//! * This module does not normalize or rescale input coordinates.

use core::fmt::{self, Debug};
use num_traits::Float;
use wide::{f32x4, f64x2};

use crate::math::neighborhood::PointDistance;
use crate::primitives::errors::IdError;

// ============================================================================
// SIMD Kernels
// ============================================================================

/// Vectorized kernels used on the hot path of neighbor search and estimators.
pub trait DistanceLinalg: Float + Debug + Send + Sync + 'static {
    /// Squared Euclidean distance `Σ(aᵢ - bᵢ)²`.
    fn squared_euclidean(a: &[Self], b: &[Self]) -> Self;

    /// Inner product `Σ aᵢ bᵢ`.
    fn dot(a: &[Self], b: &[Self]) -> Self;
}

impl DistanceLinalg for f64 {
    #[inline]
    fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let ca = a.chunks_exact(2);
        let cb = b.chunks_exact(2);
        let (ra, rb) = (ca.remainder(), cb.remainder());

        let mut acc = f64x2::splat(0.0);
        for (x, y) in ca.zip(cb) {
            let d = f64x2::new([x[0], x[1]]) - f64x2::new([y[0], y[1]]);
            acc += d * d;
        }

        let mut sum = acc.reduce_add();
        for (&x, &y) in ra.iter().zip(rb) {
            let d = x - y;
            sum += d * d;
        }
        sum
    }

    #[inline]
    fn dot(a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let ca = a.chunks_exact(2);
        let cb = b.chunks_exact(2);
        let (ra, rb) = (ca.remainder(), cb.remainder());

        let mut acc = f64x2::splat(0.0);
        for (x, y) in ca.zip(cb) {
            acc += f64x2::new([x[0], x[1]]) * f64x2::new([y[0], y[1]]);
        }

        let mut sum = acc.reduce_add();
        for (&x, &y) in ra.iter().zip(rb) {
            sum += x * y;
        }
        sum
    }
}

impl DistanceLinalg for f32 {
    #[inline]
    fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        let ca = a.chunks_exact(4);
        let cb = b.chunks_exact(4);
        let (ra, rb) = (ca.remainder(), cb.remainder());

        let mut acc = f32x4::splat(0.0);
        for (x, y) in ca.zip(cb) {
            let d = f32x4::new([x[0], x[1], x[2], x[3]]) - f32x4::new([y[0], y[1], y[2], y[3]]);
            acc += d * d;
        }

        let mut sum = acc.reduce_add();
        for (&x, &y) in ra.iter().zip(rb) {
            let d = x - y;
            sum += d * d;
        }
        sum
    }

    #[inline]
    fn dot(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        let ca = a.chunks_exact(4);
        let cb = b.chunks_exact(4);
        let (ra, rb) = (ca.remainder(), cb.remainder());

        let mut acc = f32x4::splat(0.0);
        for (x, y) in ca.zip(cb) {
            acc += f32x4::new([x[0], x[1], x[2], x[3]]) * f32x4::new([y[0], y[1], y[2], y[3]]);
        }

        let mut sum = acc.reduce_add();
        for (&x, &y) in ra.iter().zip(rb) {
            sum += x * y;
        }
        sum
    }
}

// ============================================================================
// Distance Metric Enum
// ============================================================================

/// User-supplied distance function.
pub type CustomDistance<T> = fn(&[T], &[T]) -> T;

/// Distance metric used for neighbor search.
#[derive(Clone)]
pub enum DistanceMetric<T> {
    /// Standard Euclidean distance: √(Σ(xᵢ - yᵢ)²)
    Euclidean,

    /// Manhattan distance (L1 norm): Σ|xᵢ - yᵢ|
    Manhattan,

    /// Chebyshev distance (L∞ norm): max|xᵢ - yᵢ|
    Chebyshev,

    /// Minkowski distance (Lp norm): (Σ|xᵢ - yᵢ|^p)^(1/p), p >= 1.
    Minkowski(T),

    /// Weighted Euclidean distance: √(Σ wᵢ(xᵢ - yᵢ)²), wᵢ >= 0.
    Weighted(Vec<T>),

    /// Arbitrary metric. Searched exhaustively (no plane pruning).
    Custom(CustomDistance<T>),
}

impl<T> Default for DistanceMetric<T> {
    fn default() -> Self {
        DistanceMetric::Euclidean
    }
}

impl<T: Debug> Debug for DistanceMetric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Euclidean => f.write_str("Euclidean"),
            DistanceMetric::Manhattan => f.write_str("Manhattan"),
            DistanceMetric::Chebyshev => f.write_str("Chebyshev"),
            DistanceMetric::Minkowski(p) => f.debug_tuple("Minkowski").field(p).finish(),
            DistanceMetric::Weighted(w) => f.debug_tuple("Weighted").field(w).finish(),
            DistanceMetric::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl<T: DistanceLinalg> DistanceMetric<T> {
    /// Short lowercase name, used in logs and result summaries.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Chebyshev => "chebyshev",
            DistanceMetric::Minkowski(_) => "minkowski",
            DistanceMetric::Weighted(_) => "weighted",
            DistanceMetric::Custom(_) => "custom",
        }
    }

    /// Check the metric parameters against the data dimensionality.
    pub fn validate(&self, dims: usize) -> Result<(), IdError> {
        match self {
            DistanceMetric::Minkowski(p) => {
                if !p.is_finite() || *p < T::one() {
                    return Err(IdError::invalid(
                        "metric",
                        format!("Minkowski exponent must be finite and >= 1, got {:?}", p),
                    ));
                }
            }
            DistanceMetric::Weighted(w) => {
                if w.len() != dims {
                    return Err(IdError::invalid(
                        "metric",
                        format!("expected {} weights, got {}", dims, w.len()),
                    ));
                }
                if w.iter().any(|&wi| !wi.is_finite() || wi < T::zero()) {
                    return Err(IdError::invalid(
                        "metric",
                        "weights must be finite and non-negative",
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Distance between two points.
    #[inline]
    pub fn distance(&self, a: &[T], b: &[T]) -> T {
        self.finalize(self.reduced(a, b))
    }

    /// Distance in the comparison space used by the search.
    #[inline]
    pub fn reduced(&self, a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len(), "Points must have same dimension");
        match self {
            DistanceMetric::Euclidean => T::squared_euclidean(a, b),
            DistanceMetric::Manhattan => a
                .iter()
                .zip(b)
                .map(|(&ai, &bi)| (ai - bi).abs())
                .fold(T::zero(), |acc, x| acc + x),
            DistanceMetric::Chebyshev => a
                .iter()
                .zip(b)
                .map(|(&ai, &bi)| (ai - bi).abs())
                .fold(T::zero(), T::max),
            DistanceMetric::Minkowski(p) => a
                .iter()
                .zip(b)
                .map(|(&ai, &bi)| (ai - bi).abs().powf(*p))
                .fold(T::zero(), |acc, x| acc + x),
            DistanceMetric::Weighted(w) => a
                .iter()
                .zip(b)
                .zip(w)
                .map(|((&ai, &bi), &wi)| {
                    let diff = ai - bi;
                    wi * diff * diff
                })
                .fold(T::zero(), |acc, x| acc + x),
            DistanceMetric::Custom(f) => f(a, b),
        }
    }

    /// Convert a reduced distance back to the metric space.
    #[inline]
    pub fn finalize(&self, reduced: T) -> T {
        match self {
            DistanceMetric::Euclidean | DistanceMetric::Weighted(_) => reduced.sqrt(),
            DistanceMetric::Minkowski(p) => reduced.powf(T::one() / *p),
            _ => reduced,
        }
    }

    /// Convert a metric-space distance (e.g. a search radius) to reduced space.
    #[inline]
    pub fn to_reduced(&self, distance: T) -> T {
        match self {
            DistanceMetric::Euclidean | DistanceMetric::Weighted(_) => distance * distance,
            DistanceMetric::Minkowski(p) => distance.powf(*p),
            _ => distance,
        }
    }

    /// Whether per-axis plane bounds are available for pruning.
    #[inline]
    pub fn supports_pruning(&self) -> bool {
        !matches!(self, DistanceMetric::Custom(_))
    }
}

impl<T: DistanceLinalg> PointDistance<T> for DistanceMetric<T> {
    #[inline]
    fn distance_reduced(&self, a: &[T], b: &[T]) -> T {
        self.reduced(a, b)
    }

    #[inline]
    fn split_distance_reduced(&self, dim: usize, split_val: T, query_val: T) -> T {
        let diff = (query_val - split_val).abs();
        match self {
            DistanceMetric::Euclidean => diff * diff,
            DistanceMetric::Manhattan | DistanceMetric::Chebyshev => diff,
            DistanceMetric::Minkowski(p) => diff.powf(*p),
            DistanceMetric::Weighted(w) => w[dim] * diff * diff,
            DistanceMetric::Custom(_) => T::zero(),
        }
    }

    #[inline]
    fn post_process_distance(&self, d: T) -> T {
        self.finalize(d)
    }

    #[inline]
    fn pre_process_distance(&self, d: T) -> T {
        self.to_reduced(d)
    }
}
