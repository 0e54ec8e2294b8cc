//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer implements the intrinsic dimension estimators:
//! - The `Estimator` contract shared by every procedure
//! - Global estimators (one estimate per cloud)
//! - Local estimators (one estimate per neighborhood)
//!
//! Estimators are stateless once built; fitted results live in the adapters.
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
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// The estimator contract.
pub mod estimator;

/// Global estimators.
pub mod global;

/// Local estimators.
pub mod local;
