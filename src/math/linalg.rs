//! Linear algebra backend abstraction.
//!
//! ## Purpose
//!
//! This module provides a trait-based abstraction over the dense linear
//! algebra the spectral estimators need, standardizing on the nalgebra
//! backend.
//!
//! ## Design notes
//!
//! * Symmetric eigen-decomposition is the only factorization required, since
//!   covariance and Gram matrices are symmetric positive semi-definite.
//! * Eigenpairs are returned sorted by decreasing eigenvalue.
//! * Generic over `FloatLinalg` types (f32 and f64) which delegate to nalgebra.

use core::cmp::Ordering::Equal;

use crate::math::distance::DistanceLinalg;

/// Iteration cap handed to the eigen solver.
const MAX_EIGEN_ITERATIONS: usize = 10_000;

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Eigenvalues (descending) and matching unit eigenvectors.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenPairs<T> {
    /// Eigenvalues sorted in decreasing order.
    pub values: Vec<T>,
    /// Column-major `n × n` matrix; column `j` belongs to `values[j]`.
    pub vectors: Vec<T>,
}

impl<T: Copy> EigenPairs<T> {
    /// Eigenvector `j` as a slice.
    #[inline]
    pub fn vector(&self, j: usize) -> &[T] {
        let n = self.values.len();
        &self.vectors[j * n..(j + 1) * n]
    }
}

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: DistanceLinalg {
    /// Eigen-decomposition of a symmetric `n × n` matrix given column-major.
    ///
    /// Returns `None` if the solver does not converge.
    fn symmetric_eigen(a: &[Self], n: usize) -> Option<EigenPairs<Self>>;
}

impl FloatLinalg for f64 {
    #[inline]
    fn symmetric_eigen(a: &[Self], n: usize) -> Option<EigenPairs<Self>> {
        nalgebra_backend::symmetric_eigen(a, n, f64::EPSILON)
    }
}

impl FloatLinalg for f32 {
    #[inline]
    fn symmetric_eigen(a: &[Self], n: usize) -> Option<EigenPairs<Self>> {
        nalgebra_backend::symmetric_eigen(a, n, f32::EPSILON)
    }
}

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

/// Nalgebra-based linear algebra operations.
pub mod nalgebra_backend {
    use super::*;
    use nalgebra::{DMatrix, RealField};

    /// Symmetric eigen-decomposition with eigenpairs sorted by decreasing value.
    pub fn symmetric_eigen<R: RealField + Copy>(
        a: &[R],
        n: usize,
        eps: R,
    ) -> Option<EigenPairs<R>> {
        if n == 0 {
            return Some(EigenPairs {
                values: Vec::new(),
                vectors: Vec::new(),
            });
        }

        let matrix = DMatrix::from_column_slice(n, n, a);
        let eigen = matrix.try_symmetric_eigen(eps, MAX_EIGEN_ITERATIONS)?;

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| {
            eigen.eigenvalues[j]
                .partial_cmp(&eigen.eigenvalues[i])
                .unwrap_or(Equal)
        });

        let values = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
        let mut vectors = Vec::with_capacity(n * n);
        for &i in &order {
            vectors.extend(eigen.eigenvectors.column(i).iter().copied());
        }

        Some(EigenPairs { values, vectors })
    }
}
