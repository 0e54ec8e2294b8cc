//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer post-processes estimates:
//! - Reducers combining pointwise or ensemble estimates into one value
//! - Summary statistics over estimates with missing (NaN) entries
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
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Reducers and summaries.
pub mod aggregate;
