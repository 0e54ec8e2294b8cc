//! High-level API for intrinsic dimension estimation.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry points: re-exports of every
//! estimator and adapter, the functional [`as_pointwise`] shortcut, and
//! [`EstimatorConfig`], a serializable description of any estimator that can
//! be built at runtime.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Builders with sensible defaults for every estimator.
//! * **Dynamic**: Configuration documents name the estimator in `method` and
//!   its parameters in `params`. Unknown keys are rejected.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ### Configuration Flow
//!
//! 1. Parse an [`EstimatorConfig`] with [`EstimatorConfig::from_json`].
//! 2. Call [`EstimatorConfig::build`] to validate it and get a boxed estimator.
//! 3. Fit it through [`Standalone`], [`Pointwise`] or [`Ensemble`].

use serde::{Deserialize, Serialize};

use crate::math::linalg::FloatLinalg;

// Publicly re-exported types
pub use crate::adapters::ensemble::{Ensemble, EnsembleBuilder, EnsembleResult};
pub use crate::adapters::pointwise::{Pointwise, PointwiseBuilder};
pub use crate::adapters::standalone::Standalone;
pub use crate::algorithms::estimator::{Estimator, LocalView, Scope};
pub use crate::algorithms::global::corr_int::{CorrInt, CorrIntBuilder};
pub use crate::algorithms::global::mle::{Averaging, Mle, MleBuilder};
pub use crate::algorithms::global::pca::{Pca, PcaBuilder};
pub use crate::algorithms::global::twonn::{TwoNn, TwoNnBuilder, TwoNnFit};
pub use crate::algorithms::local::fisher_s::{
    AlphaSelection, FisherS, FisherSBuilder, SeparabilityAnalysis,
};
pub use crate::algorithms::local::lpca::{LocalPca, LocalPcaBuilder};
pub use crate::algorithms::local::mada::Mada;
pub use crate::algorithms::local::mle::LocalMle;
pub use crate::algorithms::local::mom::Mom;
pub use crate::engine::output::{NeighborhoodKind, PointFailure, PointwiseResult};
pub use crate::evaluation::aggregate::{Reducer, Summary, summarize};
pub use crate::math::distance::DistanceMetric;
pub use crate::math::index::{NeighborIndex, Neighbors, Query};
pub use crate::math::spectrum::SpectralRule;
pub use crate::primitives::cloud::PointCloud;
pub use crate::primitives::errors::IdError;

// ============================================================================
// Functional Entry Point
// ============================================================================

/// Estimate at every point (or `subset` row) from its `n_neighbors` nearest neighbors.
///
/// Shorthand for a [`Pointwise`] run with Euclidean distances and
/// self-exclusive neighborhoods.
pub fn as_pointwise<T, E>(
    data: &[T],
    dims: usize,
    estimator: &E,
    n_neighbors: usize,
    n_jobs: usize,
    subset: Option<Vec<usize>>,
) -> Result<PointwiseResult<T>, IdError>
where
    T: FloatLinalg,
    E: Estimator<T> + ?Sized,
{
    let mut builder = Pointwise::new().n_neighbors(n_neighbors).n_jobs(n_jobs);
    if let Some(rows) = subset {
        builder = builder.subset(rows);
    }
    builder.build()?.fit(data, dims, estimator)
}

// ============================================================================
// Configuration Documents
// ============================================================================

/// Serializable distance metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricConfig {
    /// Euclidean distance.
    #[default]
    Euclidean,
    /// Manhattan distance.
    Manhattan,
    /// Chebyshev distance.
    Chebyshev,
    /// Minkowski distance with exponent `p`.
    Minkowski {
        /// Exponent, at least 1.
        p: f64,
    },
}

impl MetricConfig {
    /// Convert to a metric over `T`.
    pub fn to_metric<T: FloatLinalg>(self) -> DistanceMetric<T> {
        match self {
            MetricConfig::Euclidean => DistanceMetric::Euclidean,
            MetricConfig::Manhattan => DistanceMetric::Manhattan,
            MetricConfig::Chebyshev => DistanceMetric::Chebyshev,
            MetricConfig::Minkowski { p } => {
                DistanceMetric::Minkowski(T::from(p).unwrap_or_else(T::nan))
            }
        }
    }
}

/// Parameters of [`TwoNn`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TwoNnParams {
    /// Fraction of the largest ratios discarded.
    pub discard_fraction: f64,
    /// Neighbor search metric.
    pub metric: MetricConfig,
}

impl Default for TwoNnParams {
    fn default() -> Self {
        Self {
            discard_fraction: 0.1,
            metric: MetricConfig::default(),
        }
    }
}

/// Parameters of [`Mle`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MleParams {
    /// Neighbors per point.
    pub k: usize,
    /// Averaging scheme.
    pub averaging: Averaging,
    /// Neighbor search metric.
    pub metric: MetricConfig,
}

impl Default for MleParams {
    fn default() -> Self {
        Self {
            k: 20,
            averaging: Averaging::default(),
            metric: MetricConfig::default(),
        }
    }
}

/// Parameters of [`CorrInt`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorrIntParams {
    /// Neighbor rank of the lower scale.
    pub k1: usize,
    /// Neighbor rank of the upper scale.
    pub k2: usize,
    /// Neighbor search metric.
    pub metric: MetricConfig,
    /// Subsample size limit.
    pub max_points: Option<usize>,
    /// Subsample seed.
    pub random_state: Option<u64>,
}

impl Default for CorrIntParams {
    fn default() -> Self {
        Self {
            k1: 10,
            k2: 20,
            metric: MetricConfig::default(),
            max_points: None,
            random_state: None,
        }
    }
}

/// Parameters of [`Pca`] and [`LocalPca`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpectralParams {
    /// Spectral rule; the estimator's default when absent.
    pub rule: Option<SpectralRule>,
}

/// Parameters of [`FisherS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FisherSParams {
    /// Eigenvalue ratio bound for component selection.
    pub conditional_number: f64,
    /// Project whitened rows on the unit sphere.
    pub project_on_sphere: bool,
    /// Margin grid.
    pub alphas: Vec<f64>,
    /// Cap the estimate at the ambient dimension.
    pub limit_maxdim: bool,
}

impl Default for FisherSParams {
    fn default() -> Self {
        Self {
            conditional_number: 10.0,
            project_on_sphere: true,
            alphas: crate::algorithms::local::fisher_s::default_alphas(),
            limit_maxdim: false,
        }
    }
}

/// Serializable description of any estimator.
///
/// ```
/// use intdim_rs::prelude::*;
///
/// let config = EstimatorConfig::from_json(
///     r#"{"method": "twonn", "params": {"discard_fraction": 0.2}}"#,
/// )?;
/// let estimator = config.build::<f64>()?;
/// assert_eq!(estimator.name(), "twonn");
/// # Result::<(), IdError>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "method",
    content = "params",
    rename_all = "snake_case",
    deny_unknown_fields
)]
pub enum EstimatorConfig {
    /// TWO-NN.
    #[serde(rename = "twonn")]
    TwoNn(TwoNnParams),
    /// Global maximum likelihood.
    Mle(MleParams),
    /// Correlation dimension.
    CorrInt(CorrIntParams),
    /// Global PCA.
    Pca(SpectralParams),
    /// Local PCA.
    #[serde(rename = "lpca")]
    LocalPca(SpectralParams),
    /// Local maximum likelihood.
    LocalMle,
    /// Method of moments.
    Mom,
    /// Manifold-adaptive estimator.
    Mada,
    /// Fisher separability.
    FisherS(FisherSParams),
}

impl EstimatorConfig {
    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self, IdError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a JSON document.
    pub fn to_json(&self) -> Result<String, IdError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validate the parameters and build the estimator.
    pub fn build<T: FloatLinalg>(&self) -> Result<Box<dyn Estimator<T>>, IdError> {
        let estimator: Box<dyn Estimator<T>> = match self {
            EstimatorConfig::TwoNn(p) => Box::new(
                TwoNn::new()
                    .discard_fraction(p.discard_fraction)
                    .metric(p.metric.to_metric())
                    .build()?,
            ),
            EstimatorConfig::Mle(p) => Box::new(
                Mle::new()
                    .k(p.k)
                    .averaging(p.averaging)
                    .metric(p.metric.to_metric())
                    .build()?,
            ),
            EstimatorConfig::CorrInt(p) => {
                let mut builder = CorrInt::new().k1(p.k1).k2(p.k2).metric(p.metric.to_metric());
                if let Some(m) = p.max_points {
                    builder = builder.max_points(m);
                }
                if let Some(seed) = p.random_state {
                    builder = builder.random_state(seed);
                }
                Box::new(builder.build()?)
            }
            EstimatorConfig::Pca(p) => {
                let mut builder = Pca::new();
                if let Some(rule) = p.rule {
                    builder = builder.rule(rule);
                }
                Box::new(builder.build()?)
            }
            EstimatorConfig::LocalPca(p) => {
                let mut builder = LocalPca::new();
                if let Some(rule) = p.rule {
                    builder = builder.rule(rule);
                }
                Box::new(builder.build()?)
            }
            EstimatorConfig::LocalMle => Box::new(LocalMle::new()),
            EstimatorConfig::Mom => Box::new(Mom::new()),
            EstimatorConfig::Mada => Box::new(Mada::new()),
            EstimatorConfig::FisherS(p) => Box::new(
                FisherS::new()
                    .conditional_number(p.conditional_number)
                    .project_on_sphere(p.project_on_sphere)
                    .alphas(p.alphas.clone())
                    .limit_maxdim(p.limit_maxdim)
                    .build()?,
            ),
        };
        Ok(estimator)
    }
}
