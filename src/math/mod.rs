//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides the mathematical building blocks shared by the
//! estimators:
//! - Distance metrics and SIMD distance kernels
//! - KD-tree search and the neighbor index built on it
//! - Dense symmetric eigen-decomposition (nalgebra)
//! - Covariance spectra and spectral dimension rules
//! - Order statistics and special functions
//!
//! These are reusable building blocks with no estimator-specific logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Distance metrics.
pub mod distance;

/// KD-tree nearest neighbor search.
pub mod neighborhood;

/// Neighbor index over a point cloud.
pub mod index;

/// Linear algebra bridge to nalgebra.
pub mod linalg;

/// Covariance spectra and spectral rules.
pub mod spectrum;

/// Medians and quantiles.
pub mod order_stats;

/// Lambert W.
pub mod special;
