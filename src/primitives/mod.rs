//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data shapes and infrastructure shared by every
//! other layer:
//! - The crate-wide error type
//! - Borrowed point clouds and neighborhood views
//! - Reusable scratch buffers
//! - Work partitioning for chunked execution
//! - Input and parameter validation
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error types.
pub mod errors;

/// Point clouds and local views.
pub mod cloud;

/// Reusable buffers.
pub mod buffer;

/// Chunked work partitioning.
pub mod partition;

/// Input and parameter validation.
pub mod validator;
