//! Fisher separability estimator.
//!
//! ## Purpose
//!
//! This module estimates dimension from how often points of a cloud are
//! *linearly separable* from each other by Fisher discriminants (Albergante,
//! Bac & Zinovyev, 2019). In high dimension almost every point is separable
//! from all others; the fraction of inseparable pairs at a margin `α` pins
//! down the dimension of a uniformly sampled sphere with the same behavior.
//!
//! ## Design notes
//!
//! * **Preprocessing**: The cloud is centered and projected on its leading
//!   principal components (eigenvalues above `λ_max / conditional_number`).
//!   Each retained component is whitened to unit sample variance and rows are
//!   optionally projected on the unit sphere.
//! * **Inseparability**: For margin `α`, point `x` is inseparable from `y`
//!   when `⟨x, y⟩ / ⟨x, x⟩ >= α`. `p_α(i)` is the share (over all `N` points)
//!   of points inseparable from point `i`.
//! * **Sphere inversion**: The mean inseparability `p̄` at margin `α` maps to
//!   `n(α) = W₀(-w / (2π p̄² α² (1 - α²))) / (-w)` with `w = ln(1 - α²)`.
//! * **Selection**: The single estimate is `n` at the finite-profile margin
//!   closest to `0.9 · α_max`, where `α_max` is the largest margin with a
//!   finite `n(α)`.
//!
//! ## Key concepts
//!
//! * **Separable fraction**: Share of points with `p_α(i) = 0`.
//! * **Pointwise dimension**: The same inversion applied to each `p_α(i)`,
//!   see [`SeparabilityAnalysis::pointwise_dimension`].
//!
//! ## Invariants
//!
//! * Margins are strictly increasing inside `(0, 1)`.
//! * A cloud separable at every margin is a numeric degeneracy.

use core::f64::consts::PI;

use crate::algorithms::estimator::{Estimator, Scope, param, require};
use crate::math::linalg::FloatLinalg;
use crate::math::special::lambert_w0;
use crate::math::spectrum::covariance_spectrum;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

const DEFAULT_CONDITIONAL_NUMBER: f64 = 10.0;
const ALPHA_REFERENCE_RATIO: f64 = 0.9;

/// Default margin grid `0.60, 0.62, …, 0.98`.
pub fn default_alphas() -> Vec<f64> {
    (0..20).map(|i| f64::from(60 + 2 * i) / 100.0).collect()
}

/// The FisherS estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct FisherS {
    conditional_number: f64,
    project_on_sphere: bool,
    alphas: Vec<f64>,
    limit_maxdim: bool,
}

/// Which margin [`SeparabilityAnalysis::pointwise_dimension`] evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaSelection {
    /// Largest margin at which every point has a nonzero inseparability.
    AllInseparable,
    /// The margin selected for the single estimate.
    Selected,
    /// A margin by position in the grid.
    Index(usize),
}

/// Full output of a separability analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparabilityAnalysis<T> {
    /// Margin grid.
    pub alphas: Vec<T>,
    /// Dimension profile `n(α)`, NaN where undefined.
    pub n_alpha: Vec<T>,
    /// Inseparability probabilities, row-major `alphas × points`.
    pub p_alpha: Vec<T>,
    /// Number of analyzed points.
    pub n_points: usize,
    /// Share of fully separable points per margin.
    pub separable_fraction: Vec<T>,
    /// Mean inseparability per margin.
    pub py_mean: Vec<T>,
    /// Principal components kept by preprocessing.
    pub retained_components: usize,
    /// Position of the selected margin.
    pub selected_index: usize,
    /// Single dimension estimate (capped when `limit_maxdim` is set).
    pub dimension: T,
}

impl FisherS {
    /// Start configuring a FisherS estimator.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> FisherSBuilder {
        FisherSBuilder::new()
    }

    /// Eigenvalue ratio bound used to select principal components.
    pub fn conditional_number(&self) -> f64 {
        self.conditional_number
    }

    /// Margin grid.
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// Run the full analysis on `cloud`.
    pub fn analyze<T: FloatLinalg>(
        &self,
        cloud: &PointCloud<'_, T>,
    ) -> Result<SeparabilityAnalysis<T>, IdError> {
        let n = cloud.n_points();
        require("points", n, 3)?;

        let (data, k) = self.preprocess(cloud)?;
        let alphas: Vec<T> = self.alphas.iter().map(|&a| param(a)).collect();
        let p_alpha = inseparability(&data, n, k, &alphas)?;

        let n_t: T = param(n as f64);
        let m = alphas.len();
        let mut py_mean = Vec::with_capacity(m);
        let mut separable_fraction = Vec::with_capacity(m);
        for row in p_alpha.chunks_exact(n) {
            py_mean.push(row.iter().fold(T::zero(), |acc, &p| acc + p) / n_t);
            let separable = row.iter().filter(|&&p| p == T::zero()).count();
            separable_fraction.push(param::<T>(separable as f64) / n_t);
        }

        let n_alpha: Vec<T> = alphas
            .iter()
            .zip(&py_mean)
            .map(|(&a, &p)| sphere_dimension(p, a))
            .collect();

        let selected_index = select_alpha(&alphas, &n_alpha).ok_or_else(|| {
            IdError::degenerate("all points are fully separable at every margin")
        })?;

        let mut dimension = n_alpha[selected_index];
        if self.limit_maxdim {
            dimension = dimension.min(param(cloud.dims() as f64));
        }

        Ok(SeparabilityAnalysis {
            alphas,
            n_alpha,
            p_alpha,
            n_points: n,
            separable_fraction,
            py_mean,
            retained_components: k,
            selected_index,
            dimension,
        })
    }

    /// Center, reduce, whiten and optionally normalize. Returns rows and their width.
    fn preprocess<T: FloatLinalg>(
        &self,
        cloud: &PointCloud<'_, T>,
    ) -> Result<(Vec<T>, usize), IdError> {
        let n = cloud.n_points();
        let spectrum = covariance_spectrum(cloud, true)?;
        let lambda_max = spectrum.max();
        if !(lambda_max > T::zero()) {
            return Err(IdError::degenerate("all points coincide"));
        }

        let bound = T::one() / param::<T>(self.conditional_number);
        let retained: Vec<usize> = (0..spectrum.n_components)
            .filter(|&j| spectrum.values[j] / lambda_max > bound)
            .collect();
        let k = retained.len();
        if k == 0 {
            return Err(IdError::degenerate(
                "no principal component passes the conditional number bound",
            ));
        }
        let scale: Vec<T> = retained
            .iter()
            .map(|&j| spectrum.values[j].sqrt().recip())
            .collect();

        let nc = spectrum.n_components;
        let mut data = Vec::with_capacity(n * k);
        for i in 0..n {
            let scores = &spectrum.scores[i * nc..(i + 1) * nc];
            data.extend(retained.iter().zip(&scale).map(|(&j, &s)| scores[j] * s));
        }

        if self.project_on_sphere {
            for (i, row) in data.chunks_exact_mut(k).enumerate() {
                let norm = T::dot(row, row).sqrt();
                if !(norm > T::zero()) {
                    return Err(IdError::degenerate(format!(
                        "point {} sits at the centroid and cannot be projected on the sphere",
                        i
                    )));
                }
                row.iter_mut().for_each(|v| *v = *v / norm);
            }
        }
        Ok((data, k))
    }
}

impl<T: FloatLinalg> Estimator<T> for FisherS {
    fn name(&self) -> &'static str {
        "fisher_s"
    }

    fn scope(&self) -> Scope {
        Scope::Local
    }

    fn min_points(&self) -> usize {
        3
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        self.analyze(cloud).map(|analysis| analysis.dimension)
    }
}

// ============================================================================
// Analysis
// ============================================================================

impl<T: FloatLinalg> SeparabilityAnalysis<T> {
    /// Inseparability probabilities of every point at margin `a`.
    pub fn p_alpha_row(&self, a: usize) -> &[T] {
        &self.p_alpha[a * self.n_points..(a + 1) * self.n_points]
    }

    /// The selected margin.
    pub fn selected_alpha(&self) -> T {
        self.alphas[self.selected_index]
    }

    /// Per-point dimensions from per-point inseparability probabilities.
    ///
    /// Points with zero inseparability get NaN unless `force_definite_dim`
    /// is set, in which case they take the smallest detectable probability
    /// `1 / N` (the largest detectable dimension).
    pub fn pointwise_dimension(
        &self,
        selection: AlphaSelection,
        force_definite_dim: bool,
    ) -> Result<Vec<T>, IdError> {
        let m = self.alphas.len();
        let a = match selection {
            AlphaSelection::Selected => self.selected_index,
            AlphaSelection::Index(i) if i < m => i,
            AlphaSelection::Index(i) => return Err(IdError::InvalidIndex { index: i, len: m }),
            AlphaSelection::AllInseparable => (0..m)
                .rev()
                .find(|&a| self.p_alpha_row(a).iter().all(|&p| p != T::zero()))
                .ok_or_else(|| {
                    IdError::degenerate("no margin leaves every point inseparable")
                })?,
        };

        let alpha = self.alphas[a];
        let floor = T::one() / param::<T>(self.n_points as f64);
        Ok(self
            .p_alpha_row(a)
            .iter()
            .map(|&p| {
                let p = if force_definite_dim && p == T::zero() {
                    floor
                } else {
                    p
                };
                sphere_dimension(p, alpha)
            })
            .collect())
    }
}

/// Row-major `alphas × points` inseparability probabilities.
fn inseparability<T: FloatLinalg>(
    data: &[T],
    n: usize,
    k: usize,
    alphas: &[T],
) -> Result<Vec<T>, IdError> {
    let m = alphas.len();
    let n_t: T = param(n as f64);
    let mut p_alpha = vec![T::zero(); m * n];
    let mut bins = vec![0usize; m];

    for i in 0..n {
        let xi = &data[i * k..(i + 1) * k];
        let len = T::dot(xi, xi);
        if !(len > T::zero()) {
            return Err(IdError::degenerate(format!(
                "point {} has zero norm after preprocessing",
                i
            )));
        }

        bins.iter_mut().for_each(|b| *b = 0);
        for j in (0..n).filter(|&j| j != i) {
            let ratio = T::dot(xi, &data[j * k..(j + 1) * k]) / len;
            // Highest margin the ratio reaches.
            let reached = alphas.partition_point(|&a| a <= ratio);
            if reached > 0 {
                bins[reached - 1] += 1;
            }
        }

        let mut cumulative = 0usize;
        for a in (0..m).rev() {
            cumulative += bins[a];
            p_alpha[a * n + i] = param::<T>(cumulative as f64) / n_t;
        }
    }
    Ok(p_alpha)
}

/// Dimension of a uniform sphere with mean inseparability `p` at margin `alpha`.
fn sphere_dimension<T: FloatLinalg>(p: T, alpha: T) -> T {
    if !(p > T::zero()) {
        return T::nan();
    }
    let a2 = alpha * alpha;
    let w = (T::one() - a2).ln();
    let two_pi: T = param(2.0 * PI);
    let n = lambert_w0(-(w / (two_pi * p * p * a2 * (T::one() - a2)))) / (-w);
    if n.is_finite() { n } else { T::nan() }
}

/// Margin with finite `n(α)` closest to `0.9 · α_max`; ties go to the smaller margin.
fn select_alpha<T: FloatLinalg>(alphas: &[T], n_alpha: &[T]) -> Option<usize> {
    let finite = move || (0..alphas.len()).filter(move |&i| n_alpha[i].is_finite());
    let alpha_max = finite().map(|i| alphas[i]).fold(T::neg_infinity(), T::max);
    let reference = alpha_max * param(ALPHA_REFERENCE_RATIO);

    finite().fold(None, |best: Option<usize>, i| match best {
        Some(b) if (alphas[b] - reference).abs() <= (alphas[i] - reference).abs() => Some(b),
        _ => Some(i),
    })
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`FisherS`].
#[derive(Debug, Clone, Default)]
pub struct FisherSBuilder {
    conditional_number: Option<f64>,
    project_on_sphere: Option<bool>,
    alphas: Option<Vec<f64>>,
    limit_maxdim: Option<bool>,
    duplicate_param: Option<&'static str>,
}

impl FisherSBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep components with eigenvalue above `λ_max / c` (default 10).
    pub fn conditional_number(mut self, c: f64) -> Self {
        if self.conditional_number.is_some() {
            self.duplicate_param = Some("conditional_number");
        }
        self.conditional_number = Some(c);
        self
    }

    /// Project whitened rows on the unit sphere (default true).
    pub fn project_on_sphere(mut self, enabled: bool) -> Self {
        if self.project_on_sphere.is_some() {
            self.duplicate_param = Some("project_on_sphere");
        }
        self.project_on_sphere = Some(enabled);
        self
    }

    /// Margin grid, strictly increasing in (0, 1) (default 0.60 to 0.98 by 0.02).
    pub fn alphas(mut self, alphas: Vec<f64>) -> Self {
        if self.alphas.is_some() {
            self.duplicate_param = Some("alphas");
        }
        self.alphas = Some(alphas);
        self
    }

    /// Cap the single estimate at the ambient dimension (default false).
    pub fn limit_maxdim(mut self, enabled: bool) -> Self {
        if self.limit_maxdim.is_some() {
            self.duplicate_param = Some("limit_maxdim");
        }
        self.limit_maxdim = Some(enabled);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<FisherS, IdError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let conditional_number = self
            .conditional_number
            .unwrap_or(DEFAULT_CONDITIONAL_NUMBER);
        Validator::validate_positive("conditional_number", conditional_number)?;

        let alphas = self.alphas.unwrap_or_else(default_alphas);
        Validator::validate_alphas(&alphas)?;

        Ok(FisherS {
            conditional_number,
            project_on_sphere: self.project_on_sphere.unwrap_or(true),
            alphas,
            limit_maxdim: self.limit_maxdim.unwrap_or(false),
        })
    }
}
