//! Memory management and buffer recycling for repeated neighborhood work.
//!
//! ## Purpose
//!
//! This module provides reusable scratch space so the pointwise driver can
//! extract thousands of neighborhoods without allocating per point. Each
//! worker owns one set of buffers and recycles it across every query in its
//! chunk.
//!
//! ## Design notes
//!
//! * **Lazy Expansion**: Buffers grow on demand via `ensure_capacity` and are
//!   never shrunk, stabilizing at the largest neighborhood seen.
//! * **Explicit Ownership**: Buffers are passed by `&mut`, never cached inside
//!   the index, so queries stay independent of call order.
//!
//! ## Key concepts
//!
//! * **Slot**: A `Vec` wrapper with grow-only capacity management.
//! * **NeighborhoodSearchBuffer**: Candidate heap and traversal stack for the
//!   KD-tree.
//! * **NeighborBuffer**: Indices, distances and gathered coordinates of one
//!   extracted neighborhood.
//!
//! ## Invariants
//!
//! * Buffers are only logically cleared between queries.
//!
//! ## Non-goals
//!
//! * Thread-local automatic caching.

use std::collections::BinaryHeap;
use std::ops::{Deref, DerefMut};

// ============================================================================
// Slot - Unified Vector Abstraction
// ============================================================================

/// A reusable vector slot with automatic capacity management.
#[derive(Debug, Clone)]
pub struct Slot<T>(Vec<T>);

impl<T> Slot<T> {
    /// Create a new slot with the given initial capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Grow the underlying vector to at least `capacity`; never shrinks.
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if self.0.capacity() < capacity {
            self.0.reserve(capacity - self.0.len());
        }
    }

    /// Consume the slot and return the underlying vector.
    #[inline]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Deref for Slot<T> {
    type Target = Vec<T>;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Slot<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> From<Vec<T>> for Slot<T> {
    fn from(v: Vec<T>) -> Self {
        Self(v)
    }
}

// ============================================================================
// Search Buffers
// ============================================================================

/// Persistent buffers for KD-tree search to avoid allocations.
#[derive(Debug)]
pub struct NeighborhoodSearchBuffer<N> {
    pub(crate) heap: BinaryHeap<N>,
    pub(crate) stack: Vec<usize>,
    pub(crate) found: Vec<N>,
}

impl<N: Ord> NeighborhoodSearchBuffer<N> {
    /// Create a new search buffer sized for `k` candidates.
    pub fn new(k: usize) -> Self {
        // Stack depth is bounded by tree height.
        Self {
            heap: BinaryHeap::with_capacity(k),
            stack: Vec::with_capacity(64),
            found: Vec::with_capacity(k),
        }
    }

    /// Clear all internal buffers for reuse.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.stack.clear();
        self.found.clear();
    }
}

impl<N: Ord> Default for NeighborhoodSearchBuffer<N> {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Indices, distances and coordinates of one extracted neighborhood.
#[derive(Debug, Clone)]
pub struct NeighborBuffer<T> {
    /// Row indices into the indexed cloud, in (distance, index) order.
    pub indices: Slot<usize>,
    /// Distances aligned with `indices`.
    pub distances: Slot<T>,
    /// Row-major coordinates of the neighbors, aligned with `indices`.
    pub coords: Slot<T>,
}

impl<T> NeighborBuffer<T> {
    /// Create a buffer sized for `k` neighbors of `dims` coordinates.
    pub fn new(k: usize, dims: usize) -> Self {
        Self {
            indices: Slot::new(k),
            distances: Slot::new(k),
            coords: Slot::new(k * dims),
        }
    }

    /// Ensure room for `k` neighbors of `dims` coordinates.
    pub fn ensure_capacity(&mut self, k: usize, dims: usize) {
        self.indices.ensure_capacity(k);
        self.distances.ensure_capacity(k);
        self.coords.ensure_capacity(k * dims);
    }

    /// Clear all slots.
    pub fn clear(&mut self) {
        self.indices.clear();
        self.distances.clear();
        self.coords.clear();
    }

    /// Number of neighbors currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no neighbors are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl<T> Default for NeighborBuffer<T> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
