//! Layer 6: Adapters
//!
//! # Purpose
//!
//! This layer provides the execution modes:
//! - Standalone: fit one estimator on a cloud, subset or neighborhood
//! - Pointwise: one estimate per point from its neighborhood
//! - Ensemble: several estimators combined by a reducer
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters ← You are here
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Single-estimator fit.
pub mod standalone;

/// Pointwise driver.
pub mod pointwise;

/// Estimator ensembles.
pub mod ensemble;
