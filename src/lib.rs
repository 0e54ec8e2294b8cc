//! # intdim — Intrinsic Dimension Estimation for Rust
//!
//! Statistical estimators for the intrinsic dimension of point-cloud data:
//! given `N` points in a `D`-dimensional ambient space, estimate the
//! dimensionality of the manifold (or local neighborhood structure) the data
//! actually occupies.
//!
//! ## What is intrinsic dimension?
//!
//! A cloud sampled from a 2-sphere embedded in 100 coordinates has ambient
//! dimension 100 but intrinsic dimension 2: locally, two numbers suffice to
//! describe where a point lies. Intrinsic dimension estimators recover that
//! number from the geometry of the sample alone, either once for the whole
//! cloud (*global*) or around every point (*local*, *pointwise*).
//!
//! **Common applications:**
//! - Choosing the target dimension of a dimensionality reduction
//! - Detecting heterogeneous structure (regions of different dimension)
//! - Characterizing learned representations and embeddings
//!
//! ## Quick Start
//!
//! ### Global estimate
//!
//! ```rust
//! use intdim_rs::prelude::*;
//! use intdim_rs::datasets::hyperball;
//!
//! // 500 points uniform in a 3-ball embedded in 6 coordinates
//! let data = hyperball(500, 3, 6, 1.0, 42)?;
//!
//! let mut model = Standalone::new(TwoNn::new().build()?);
//! let d = model.fit(&data, 6)?.dimension()?;
//! assert!(d > 2.0 && d < 4.0);
//! # Result::<(), IdError>::Ok(())
//! ```
//!
//! ### Pointwise estimates
//!
//! ```rust
//! use intdim_rs::prelude::*;
//! use intdim_rs::datasets::hyperball;
//!
//! let data = hyperball(300, 2, 5, 1.0, 7)?;
//!
//! let result = Pointwise::new()
//!     .n_neighbors(20)
//!     .build()?
//!     .fit(&data, 5, &LocalMle::new())?;
//!
//! assert_eq!(result.len(), 300);
//! let median = result.reduce(Reducer::Median)?;
//! assert!(median > 1.0 && median < 3.5);
//! # Result::<(), IdError>::Ok(())
//! ```
//!
//! ### Result and Error Handling
//!
//! Builders validate eagerly and return [`IdError`](prelude::IdError).
//! Standalone fits surface numerical failures as errors; the pointwise driver
//! records them per point and stores NaN instead:
//!
//! ```rust
//! use intdim_rs::prelude::*;
//!
//! // Every point duplicated: TWO-NN cannot form its distance ratios.
//! let data = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 0.0, 2.0, 0.0];
//! let mut model = Standalone::new(TwoNn::<f64>::new().build()?);
//! assert!(matches!(model.fit(&data, 2), Err(IdError::NumericDegeneracy(_))));
//! assert!(matches!(model.dimension(), Err(IdError::NotFitted)));
//! # Result::<(), IdError>::Ok(())
//! ```
//!
//! ## Estimators
//!
//! | Estimator    | Scope  | Technique                                         |
//! |--------------|--------|---------------------------------------------------|
//! | `TwoNn`      | global | ratio of the two nearest neighbor distances       |
//! | `Mle`        | global | averaged Levina-Bickel likelihood                 |
//! | `CorrInt`    | global | correlation dimension between two scales          |
//! | `Pca`        | global | covariance spectrum with a spectral rule          |
//! | `LocalPca`   | local  | neighborhood covariance spectrum                  |
//! | `LocalMle`   | local  | Levina-Bickel likelihood at one point             |
//! | `Mom`        | local  | method of moments on neighbor distances           |
//! | `Mada`       | local  | manifold-adaptive doubling ratio                  |
//! | `FisherS`    | local  | Fisher separability analysis                      |
//!
//! Global estimators run through the pointwise driver treat each
//! neighborhood as a cloud of its own.
//!
//! ## Parallelism
//!
//! With the default `parallel` feature, `Pointwise::n_jobs(n)` runs chunks of
//! queries on a dedicated rayon pool of `n` threads (`0` = all cores).
//! Results are always returned in query order.
//!
//! ## Logging
//!
//! The crate logs through the `log` facade: per-point fallbacks at `debug`,
//! run summaries at `info`, configuration fallbacks at `warn`. Install any
//! logger (e.g. `env_logger`) to see them.
//!
//! ## References
//!
//! - Facco, E. et al. (2017). "Estimating the intrinsic dimension of datasets by a minimal neighborhood information"
//! - Levina, E. & Bickel, P. (2004). "Maximum Likelihood Estimation of Intrinsic Dimension"
//! - Grassberger, P. & Procaccia, I. (1983). "Measuring the strangeness of strange attractors"
//! - Amsaleg, L. et al. (2018). "Extreme-value-theoretic estimation of local intrinsic dimensionality"
//! - Farahmand, A. M. et al. (2007). "Manifold-adaptive dimension estimation"
//! - Albergante, L., Bac, J. & Zinovyev, A. (2019). "Estimating the effective dimension of large biological datasets using Fisher separability analysis"
//!
//! ## License
//!
//! See the repository for license information and contribution guidelines.

#![deny(missing_docs)]

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the error type, borrowed point clouds, reusable buffers,
// input validation and work partitioning.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains distance metrics, the KD-tree and neighbor index, eigen
// decomposition, covariance spectra, order statistics and Lambert W.
mod math;

// Layer 3: Algorithms - intrinsic dimension estimators.
//
// Contains the `Estimator` contract and the global and local families.
mod algorithms;

// Layer 4: Evaluation - post-processing.
//
// Contains reducers and summaries over estimates with missing values.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
//
// Contains the pointwise executor, per-worker workspaces and result assembly.
mod engine;

// Layer 6: Adapters - execution mode adapters.
//
// Contains execution adapters for different use cases:
// standalone (one fit), pointwise (per point), ensemble (combined).
mod adapters;

// High-level API.
//
// Provides re-exports, `as_pointwise` and serializable configurations.
mod api;

/// Synthetic point clouds with known intrinsic dimension.
pub mod datasets;

// ============================================================================
// Prelude
// ============================================================================

/// Standard prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use intdim_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        AlphaSelection, Averaging, CorrInt, DistanceMetric, Ensemble, Estimator,
        EstimatorConfig, FisherS, IdError, LocalMle, LocalPca, Mada, Mle, Mom, NeighborIndex,
        Pca, PointCloud, Pointwise, PointwiseResult, Query, Reducer, Scope, SpectralRule,
        Standalone, TwoNn, as_pointwise,
    };
}

// ============================================================================
// Public API
// ============================================================================

pub use api::*;

// ============================================================================
// Internal API
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal estimators.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal evaluation.
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    /// Internal adapters.
    pub mod adapters {
        pub use crate::adapters::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
