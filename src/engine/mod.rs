//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer orchestrates pointwise estimation:
//! - The executor extracting neighborhoods and dispatching them to workers
//! - Per-worker workspaces of reusable buffers
//! - The pointwise result container
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Pointwise execution engine.
pub mod executor;

/// Pointwise output types.
pub mod output;

/// Per-worker scratch buffers.
pub mod workspace;
