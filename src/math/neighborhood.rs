//! KD-Tree for exact k-nearest and radius neighbor search in nD space.
//!
//! ## Purpose
//!
//! This module implements the spatial index behind
//! [`NeighborIndex`](crate::math::index::NeighborIndex). Organizing points in
//! a spatial hierarchy reduces the search from O(n) to roughly O(log n) per
//! query in low and moderate dimensions.
//!
//! ## Design notes
//!
//! * **Static Construction**: The tree is built once and then only queried.
//! * **Eytzinger Layout**: Nodes are stored in a left-complete binary tree
//!   (array) layout, and the points are permuted to match, for cache locality.
//! * **Implicit Axis**: The split axis of a node is its depth modulo the
//!   dimensionality, recovered from the node index, so nodes store only the
//!   original row index.
//! * **Trait-based Distance**: The search is generic over [`PointDistance`].
//!
//! ## Key concepts
//!
//! * **Implicit Navigation**: Children are at `2i + 1` and `2i + 2`.
//! * **Pruning**: A far branch is skipped when its splitting plane is farther
//!   than the current worst candidate.
//! * **Total Order**: Candidates compare by `(distance, index)`, so ties at
//!   equal distance resolve to the lower row index.
//!
//! ## Invariants
//!
//! * Queries always return the exact nearest neighbors (no approximation).
//! * Results are sorted ascending by `(distance, index)`.
//!
//! ## Non-goals
//!
//! * This module does not support dynamic insertions or deletions.
//! * This module does not support approximate nearest neighbor search.

use core::cmp::Ordering::{self, Equal};
use num_traits::Float;

use crate::primitives::buffer::{NeighborBuffer, NeighborhoodSearchBuffer};

// ============================================================================
// Helper Types
// ============================================================================

/// Candidate in the KD-tree search heap: `(row index, reduced distance)`.
///
/// Orders by distance, then by index.
#[derive(Debug, Clone, Copy)]
pub struct NodeDistance<T>(pub usize, pub T);

impl<T: PartialOrd> PartialEq for NodeDistance<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Equal
    }
}
impl<T: PartialOrd> Eq for NodeDistance<T> {}

impl<T: PartialOrd> PartialOrd for NodeDistance<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: PartialOrd> Ord for NodeDistance<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.1
            .partial_cmp(&other.1)
            .unwrap_or(Equal)
            .then(self.0.cmp(&other.0))
    }
}

/// Trait for distance calculations used in KD-tree search.
pub trait PointDistance<T: Float> {
    /// Distance in the comparison space (e.g. squared for Euclidean).
    fn distance_reduced(&self, a: &[T], b: &[T]) -> T;

    /// Lower bound, in comparison space, on the distance from a query to any
    /// point on the far side of the splitting plane.
    fn split_distance_reduced(&self, dim: usize, split_val: T, query_val: T) -> T;

    /// Convert a comparison-space distance to the metric space.
    fn post_process_distance(&self, d: T) -> T;

    /// Convert a metric-space distance to the comparison space.
    fn pre_process_distance(&self, d: T) -> T;
}

// ============================================================================
// KD-Tree Implementation
// ============================================================================

/// Compressed node structure for Eytzinger layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct KDNode {
    /// Index of the point in the original flattened data array.
    pub index: usize,
}

/// KD-tree for spatial indexing of nD points.
#[derive(Debug, Clone)]
pub struct KDTree<T: Float> {
    /// The implicit Eytzinger tree nodes.
    nodes: Vec<KDNode>,
    /// Permuted points aligned with the nodes for cache locality.
    points: Vec<T>,
    /// Dimensionality of the data.
    dimensions: usize,
}

impl<T: Float> KDTree<T> {
    // ------------------------------------------------------------------------
    // Public API
    // ------------------------------------------------------------------------

    /// Build a KD-tree from a flattened data array.
    pub fn new(points: &[T], dimensions: usize) -> Self {
        let n = points.len() / dimensions;
        let mut indices: Vec<usize> = (0..n).collect();

        // Eytzinger layout requires the vector to be full size to allow access during build.
        let mut nodes = vec![KDNode::default(); n];
        let mut permuted_points = vec![T::zero(); n * dimensions];

        Self::build_recursive(
            points,
            dimensions,
            &mut indices,
            0,
            &mut nodes,
            &mut permuted_points,
            0,
        );

        Self {
            nodes,
            points: permuted_points,
            dimensions,
        }
    }

    /// Number of indexed points.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dimensionality of the indexed points.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Search for the `k` nearest neighbors of `query`.
    ///
    /// Writes indices and metric-space distances into `out`, sorted ascending
    /// by `(distance, index)`. Fewer than `k` results are returned only when
    /// the tree holds fewer eligible points.
    pub fn find_k_nearest<D: PointDistance<T>>(
        &self,
        query: &[T],
        k: usize,
        dist_calc: &D,
        exclude_self: Option<usize>,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
        out: &mut NeighborBuffer<T>,
    ) {
        buffer.clear();
        out.indices.clear();
        out.distances.clear();
        if k == 0 || self.nodes.is_empty() {
            return;
        }

        self.search_k_nearest(query, k, dist_calc, exclude_self, buffer);
        buffer.found.extend(buffer.heap.drain());
        Self::emit_sorted(dist_calc, buffer, out);
    }

    /// Search for every point within `radius` (inclusive) of `query`.
    ///
    /// Output ordering follows [`KDTree::find_k_nearest`].
    pub fn find_within_radius<D: PointDistance<T>>(
        &self,
        query: &[T],
        radius: T,
        dist_calc: &D,
        exclude_self: Option<usize>,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
        out: &mut NeighborBuffer<T>,
    ) {
        buffer.clear();
        out.indices.clear();
        out.distances.clear();
        if self.nodes.is_empty() {
            return;
        }

        let limit = dist_calc.pre_process_distance(radius);
        self.search_radius(query, limit, dist_calc, exclude_self, buffer);
        Self::emit_sorted(dist_calc, buffer, out);
    }

    // ------------------------------------------------------------------------
    // Private Helpers & Algorithms
    // ------------------------------------------------------------------------

    /// Recursively builds the tree in Eytzinger layout.
    fn build_recursive(
        points: &[T],
        dims: usize,
        indices: &mut [usize],
        depth: usize,
        nodes: &mut [KDNode],
        permuted_points: &mut [T],
        curr_idx: usize,
    ) {
        if indices.is_empty() {
            return;
        }

        let axis = depth % dims;

        // Pivot rank for a left-complete tree keeps the Eytzinger property.
        let median_idx = Self::calculate_left_subtree_size(indices.len());
        indices.select_nth_unstable_by(median_idx, |&a, &b| {
            points[a * dims + axis]
                .partial_cmp(&points[b * dims + axis])
                .unwrap_or(Equal)
        });

        let point_idx = indices[median_idx];
        nodes[curr_idx] = KDNode { index: point_idx };

        let src_start = point_idx * dims;
        let dest_start = curr_idx * dims;
        permuted_points[dest_start..dest_start + dims]
            .copy_from_slice(&points[src_start..src_start + dims]);

        let (left_part, right_part_with_median) = indices.split_at_mut(median_idx);
        let right_part = &mut right_part_with_median[1..];

        Self::build_recursive(
            points,
            dims,
            left_part,
            depth + 1,
            nodes,
            permuted_points,
            2 * curr_idx + 1,
        );
        Self::build_recursive(
            points,
            dims,
            right_part,
            depth + 1,
            nodes,
            permuted_points,
            2 * curr_idx + 2,
        );
    }

    /// Split axis of a node, derived from its depth in the implicit tree.
    #[inline]
    fn axis_of(&self, node_idx: usize) -> usize {
        let depth = (usize::BITS - (node_idx + 1).leading_zeros() - 1) as usize;
        depth % self.dimensions
    }

    /// Coordinates of the point stored at `node_idx`.
    #[inline]
    fn node_point(&self, node_idx: usize) -> &[T] {
        let offset = node_idx * self.dimensions;
        &self.points[offset..offset + self.dimensions]
    }

    /// Bounded max-heap search using an explicit stack.
    fn search_k_nearest<D: PointDistance<T>>(
        &self,
        query: &[T],
        k: usize,
        dist_calc: &D,
        exclude_self: Option<usize>,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
    ) {
        let heap = &mut buffer.heap;
        let stack = &mut buffer.stack;
        let nodes_len = self.nodes.len();

        let mut max_dist = T::infinity();
        stack.push(0);

        while let Some(node_idx) = stack.pop() {
            let node = self.nodes[node_idx];
            let node_point = self.node_point(node_idx);

            if exclude_self != Some(node.index) {
                let candidate = NodeDistance(node.index, dist_calc.distance_reduced(query, node_point));
                if heap.len() < k {
                    heap.push(candidate);
                } else if let Some(mut top) = heap.peek_mut() {
                    if candidate < *top {
                        *top = candidate;
                    }
                }
                if heap.len() == k {
                    max_dist = heap.peek().map_or(T::infinity(), |nd| nd.1);
                }
            }

            let left_child = 2 * node_idx + 1;
            if left_child >= nodes_len {
                continue;
            }
            let right_child = left_child + 1;
            let has_right = right_child < nodes_len;

            let axis = self.axis_of(node_idx);
            let split_val = node_point[axis];
            let go_left = query[axis] <= split_val;

            let (near, far, near_exists, far_exists) = if go_left {
                (left_child, right_child, true, has_right)
            } else {
                (right_child, left_child, has_right, true)
            };

            // Ties on the plane may still hold a lower index, hence `<=`.
            if far_exists {
                let dist_to_plane = dist_calc.split_distance_reduced(axis, split_val, query[axis]);
                if heap.len() < k || dist_to_plane <= max_dist {
                    stack.push(far);
                }
            }
            if near_exists {
                stack.push(near);
            }
        }
    }

    /// Collect every point whose reduced distance is at most `limit`.
    fn search_radius<D: PointDistance<T>>(
        &self,
        query: &[T],
        limit: T,
        dist_calc: &D,
        exclude_self: Option<usize>,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
    ) {
        let found = &mut buffer.found;
        let stack = &mut buffer.stack;
        let nodes_len = self.nodes.len();

        stack.push(0);

        while let Some(node_idx) = stack.pop() {
            let node = self.nodes[node_idx];
            let node_point = self.node_point(node_idx);

            if exclude_self != Some(node.index) {
                let dist = dist_calc.distance_reduced(query, node_point);
                if dist <= limit {
                    found.push(NodeDistance(node.index, dist));
                }
            }

            let left_child = 2 * node_idx + 1;
            if left_child >= nodes_len {
                continue;
            }
            let right_child = left_child + 1;
            let has_right = right_child < nodes_len;

            let axis = self.axis_of(node_idx);
            let split_val = node_point[axis];
            let go_left = query[axis] <= split_val;
            let dist_to_plane = dist_calc.split_distance_reduced(axis, split_val, query[axis]);

            let (near, far, near_exists, far_exists) = if go_left {
                (left_child, right_child, true, has_right)
            } else {
                (right_child, left_child, has_right, true)
            };

            if far_exists && dist_to_plane <= limit {
                stack.push(far);
            }
            if near_exists {
                stack.push(near);
            }
        }
    }

    /// Sort collected candidates and write them out in metric space.
    fn emit_sorted<D: PointDistance<T>>(
        dist_calc: &D,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
        out: &mut NeighborBuffer<T>,
    ) {
        buffer.found.sort_unstable();
        for &NodeDistance(idx, dist) in buffer.found.iter() {
            out.indices.push(idx);
            out.distances.push(dist_calc.post_process_distance(dist));
        }
    }

    /// Calculate number of nodes in the left subtree of a left-complete binary tree of size N.
    pub fn calculate_left_subtree_size(n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        // Height: H = floor(log2(n))
        let h = (usize::BITS - n.leading_zeros() - 1) as usize;
        if h == 0 {
            return 0;
        }

        let max_leaf_capacity = 1 << h;

        // Nodes in the last level
        let r = n - (max_leaf_capacity - 1);

        // Left subtree takes the filled portion of the last level first
        let left_part_leaves = r.min(max_leaf_capacity / 2);
        (max_leaf_capacity / 2) - 1 + left_part_leaves
    }
}
