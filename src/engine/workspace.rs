//! Workspace for reusable pointwise buffers.
//!
//! This module provides a pre-allocated workspace to minimize dynamic memory
//! allocations while extracting neighborhoods for consecutive query points.

use crate::math::distance::DistanceLinalg;
use crate::math::index::SearchBuffer;
use crate::primitives::buffer::NeighborBuffer;

/// A workspace containing pre-allocated buffers for one pointwise worker.
///
/// Each chunk of queries gets its own workspace, so no buffer is ever shared
/// between threads.
pub struct PointwiseWorkspace<T: DistanceLinalg> {
    /// Buffer for KD-tree search state.
    pub search: SearchBuffer<T>,
    /// Buffer for neighbor indices, distances and gathered coordinates.
    pub neighbors: NeighborBuffer<T>,
}

impl<T: DistanceLinalg> PointwiseWorkspace<T> {
    /// Create a new workspace sized for `k` neighbors of `dims` coordinates.
    pub fn new(k: usize, dims: usize) -> Self {
        Self {
            search: SearchBuffer::new(k),
            neighbors: NeighborBuffer::new(k, dims),
        }
    }

    /// Reset logical lengths for the next query point.
    ///
    /// Note: Does not deallocate.
    pub fn clear(&mut self) {
        self.search.clear();
        self.neighbors.clear();
    }
}
