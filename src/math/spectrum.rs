//! Covariance spectra and eigenvalue-based dimension rules.
//!
//! ## Purpose
//!
//! This module computes the eigenvalue spectrum (and optionally principal
//! component scores) of a centered point cloud, and turns a spectrum into a
//! dimension estimate through a [`SpectralRule`].
//!
//! ## Design notes
//!
//! * **Dual form**: With fewer points than coordinates the `n × n` Gram matrix
//!   is decomposed instead of the `D × D` covariance. Both share their nonzero
//!   eigenvalues; the spectrum is zero-padded to length `D`.
//! * **Sample covariance**: Eigenvalues are scaled by `1 / (n - 1)`.
//! * **Clamped**: Round-off negatives are clamped to zero.
//!
//! ## Key concepts
//!
//! * **Explained ratio**: `λᵢ / Σλ`.
//! * **Scores**: Projections of the centered points on the eigenvectors.
//!
//! ## Invariants
//!
//! * `values` is sorted in decreasing order, non-negative and has length `D`.
//! * Score column `j` has sample variance `values[j]`.

use serde::{Deserialize, Serialize};

use crate::math::linalg::FloatLinalg;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;

// ============================================================================
// Spectrum
// ============================================================================

/// Eigenvalue spectrum of a centered cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum<T> {
    /// Covariance eigenvalues, descending, length `D`.
    pub values: Vec<T>,
    /// Row-major `n × n_components` principal component scores (empty unless requested).
    pub scores: Vec<T>,
    /// Number of computed components (`min(n, D)`).
    pub n_components: usize,
}

impl<T: FloatLinalg> Spectrum<T> {
    /// Sum of all eigenvalues (total variance).
    pub fn total(&self) -> T {
        self.values.iter().fold(T::zero(), |acc, &v| acc + v)
    }

    /// Largest eigenvalue.
    pub fn max(&self) -> T {
        self.values.first().copied().unwrap_or_else(T::zero)
    }
}

/// Compute the covariance spectrum of `cloud`, optionally with PC scores.
pub fn covariance_spectrum<T: FloatLinalg>(
    cloud: &PointCloud<'_, T>,
    with_scores: bool,
) -> Result<Spectrum<T>, IdError> {
    let n = cloud.n_points();
    let d = cloud.dims();
    if n < 2 {
        return Err(IdError::InsufficientData {
            what: "points",
            got: n,
            min: 2,
        });
    }

    let mean = cloud.centroid();
    let mut centered = Vec::with_capacity(n * d);
    for row in cloud.rows() {
        centered.extend(row.iter().zip(&mean).map(|(&x, &m)| x - m));
    }
    let scale = T::one() / T::from(n - 1).unwrap_or_else(T::one);

    if n >= d {
        primal(&centered, n, d, scale, with_scores)
    } else {
        dual(&centered, n, d, scale, with_scores)
    }
}

/// Decompose the `d × d` covariance.
fn primal<T: FloatLinalg>(
    centered: &[T],
    n: usize,
    d: usize,
    scale: T,
    with_scores: bool,
) -> Result<Spectrum<T>, IdError> {
    let mut cov = vec![T::zero(); d * d];
    for row in centered.chunks_exact(d) {
        for a in 0..d {
            let ra = row[a];
            for b in a..d {
                cov[a * d + b] = cov[a * d + b] + ra * row[b];
            }
        }
    }
    for a in 0..d {
        for b in a..d {
            let v = cov[a * d + b] * scale;
            cov[a * d + b] = v;
            cov[b * d + a] = v;
        }
    }

    let eigen = T::symmetric_eigen(&cov, d)
        .ok_or_else(|| IdError::degenerate("covariance eigen-decomposition did not converge"))?;

    let mut scores = Vec::new();
    if with_scores {
        scores.reserve(n * d);
        for row in centered.chunks_exact(d) {
            for j in 0..d {
                scores.push(T::dot(row, eigen.vector(j)));
            }
        }
    }

    Ok(Spectrum {
        values: eigen.values.iter().map(|&v| v.max(T::zero())).collect(),
        scores,
        n_components: d,
    })
}

/// Decompose the `n × n` Gram matrix and zero-pad the spectrum to `d`.
fn dual<T: FloatLinalg>(
    centered: &[T],
    n: usize,
    d: usize,
    scale: T,
    with_scores: bool,
) -> Result<Spectrum<T>, IdError> {
    let rows: Vec<&[T]> = centered.chunks_exact(d).collect();
    let mut gram = vec![T::zero(); n * n];
    for i in 0..n {
        for j in i..n {
            let v = T::dot(rows[i], rows[j]) * scale;
            gram[i * n + j] = v;
            gram[j * n + i] = v;
        }
    }

    let eigen = T::symmetric_eigen(&gram, n)
        .ok_or_else(|| IdError::degenerate("Gram eigen-decomposition did not converge"))?;

    let mut values: Vec<T> = eigen.values.iter().map(|&v| v.max(T::zero())).collect();

    let mut scores = Vec::new();
    if with_scores {
        // Score column j is u_j * sqrt((n - 1) λ_j).
        let factors: Vec<T> = values.iter().map(|&v| (v / scale).sqrt()).collect();
        scores.reserve(n * n);
        for i in 0..n {
            for (j, &f) in factors.iter().enumerate() {
                scores.push(eigen.vector(j)[i] * f);
            }
        }
    }

    values.resize(d, T::zero());
    Ok(Spectrum {
        values,
        scores,
        n_components: n,
    })
}

// ============================================================================
// Spectral Rules
// ============================================================================

/// Rule turning a covariance spectrum into a dimension estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectralRule {
    /// Count of eigenvalues above `alpha · λ_max` (Fukunaga & Olsen).
    FukunagaOlsen {
        /// Relative threshold in (0, 1).
        alpha: f64,
    },

    /// Smallest count whose cumulative explained variance exceeds `alpha`.
    Ratio {
        /// Cumulative variance target in (0, 1).
        alpha: f64,
    },

    /// Count of eigenvalues above the mean eigenvalue (Kaiser criterion).
    Kaiser,

    /// Leading components whose explained ratio beats the broken-stick expectation.
    BrokenStick,

    /// Position of the largest ratio between consecutive eigenvalues.
    MaxGap,

    /// Continuous participation ratio `(Σλ)² / Σλ²`.
    #[default]
    ParticipationRatio,
}

impl SpectralRule {
    /// Check rule parameters.
    pub fn validate(&self) -> Result<(), IdError> {
        match *self {
            SpectralRule::FukunagaOlsen { alpha } | SpectralRule::Ratio { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(IdError::invalid(
                        "rule",
                        format!("alpha must be in (0, 1), got {}", alpha),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Whether the rule produces integer counts.
    pub fn is_integer_valued(&self) -> bool {
        !matches!(self, SpectralRule::ParticipationRatio)
    }

    /// Apply the rule to a descending, non-negative spectrum.
    pub fn evaluate<T: FloatLinalg>(&self, values: &[T]) -> Result<T, IdError> {
        let total = values.iter().fold(T::zero(), |acc, &v| acc + v);
        let lambda_max = values.first().copied().unwrap_or_else(T::zero);
        if values.is_empty() || !(lambda_max > T::zero()) || !total.is_finite() {
            return Err(IdError::degenerate("all covariance eigenvalues are zero"));
        }
        let count = |c: usize| T::from(c).unwrap_or_else(T::nan);
        let lit = |v: f64| T::from(v).unwrap_or_else(T::nan);

        let estimate = match *self {
            SpectralRule::FukunagaOlsen { alpha } => {
                let threshold = lit(alpha) * lambda_max;
                count(values.iter().filter(|&&v| v > threshold).count())
            }
            SpectralRule::Ratio { alpha } => {
                let target = lit(alpha) * total;
                let mut cumulative = T::zero();
                let mut d = values.len();
                for (i, &v) in values.iter().enumerate() {
                    cumulative = cumulative + v;
                    if cumulative > target {
                        d = i + 1;
                        break;
                    }
                }
                count(d)
            }
            SpectralRule::Kaiser => {
                let mean = total / count(values.len());
                count(values.iter().filter(|&&v| v > mean).count())
            }
            SpectralRule::BrokenStick => {
                let p = values.len();
                // b_i = (1/p) Σ_{k=i}^{p} 1/k, computed from the tail.
                let mut stick = vec![T::zero(); p];
                let mut acc = T::zero();
                for i in (0..p).rev() {
                    acc = acc + T::one() / count(i + 1);
                    stick[i] = acc / count(p);
                }
                let d = values
                    .iter()
                    .zip(&stick)
                    .take_while(|&(&v, &b)| v / total > b)
                    .count();
                count(d.max(1))
            }
            SpectralRule::MaxGap => {
                let mut best = 0;
                let mut best_gap = T::neg_infinity();
                for i in 0..values.len().saturating_sub(1) {
                    let gap = if values[i + 1] > T::zero() {
                        values[i] / values[i + 1]
                    } else if values[i] > T::zero() {
                        T::infinity()
                    } else {
                        break;
                    };
                    if gap > best_gap {
                        best_gap = gap;
                        best = i;
                    }
                }
                count(best + 1)
            }
            SpectralRule::ParticipationRatio => {
                let sum_sq = values.iter().fold(T::zero(), |acc, &v| acc + v * v);
                total * total / sum_sq
            }
        };
        Ok(estimate)
    }
}
