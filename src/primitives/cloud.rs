//! Borrowed point clouds and local neighborhood views.
//!
//! ## Purpose
//!
//! This module defines the two data shapes every estimator consumes: a whole
//! point cloud, and the neighborhood of one reference point.
//!
//! ## Design notes
//!
//! * **Flat layout**: Points are stored row-major in a single slice
//!   (`[x0_0, x0_1, ..., x1_0, ...]`), matching the layout used by the KD-tree.
//! * **Borrowed**: Both types borrow caller data and never copy it.
//!
//! ## Key concepts
//!
//! * **Self-inclusive view**: The reference point is the first neighbor, at
//!   distance zero. Distance-based estimators read
//!   [`LocalView::neighbor_distances`], which strips that entry.
//!
//! ## Invariants
//!
//! * `data.len() == n_points * dims` and `dims > 0`.
//! * View distances are sorted ascending and aligned with the neighbor rows.

use num_traits::Float;

use crate::primitives::errors::IdError;

// ============================================================================
// Point Cloud
// ============================================================================

/// Immutable, borrowed collection of `n` points with `dims` coordinates each.
#[derive(Debug, Clone, Copy)]
pub struct PointCloud<'a, T> {
    data: &'a [T],
    dims: usize,
}

impl<'a, T: Float> PointCloud<'a, T> {
    /// Wrap a row-major buffer.
    pub fn new(data: &'a [T], dims: usize) -> Result<Self, IdError> {
        if dims == 0 {
            return Err(IdError::invalid("dims", "must be at least 1"));
        }
        if data.len() % dims != 0 {
            return Err(IdError::MismatchedDimensions {
                len: data.len(),
                dims,
            });
        }
        Ok(Self { data, dims })
    }

    /// Number of points.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.data.len() / self.dims
    }

    /// Number of coordinates per point (ambient dimension).
    #[inline]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Returns true if the cloud holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Coordinates of point `i`.
    #[inline]
    pub fn point(&self, i: usize) -> &'a [T] {
        &self.data[i * self.dims..(i + 1) * self.dims]
    }

    /// Iterate over points in order.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + 'a {
        self.data.chunks_exact(self.dims)
    }

    /// Fail with [`IdError::InvalidNumericValue`] on the first NaN or infinite coordinate.
    pub fn ensure_finite(&self) -> Result<(), IdError> {
        match self.data.iter().position(|v| !v.is_finite()) {
            None => Ok(()),
            Some(pos) => Err(IdError::InvalidNumericValue(format!(
                "non-finite coordinate {} of point {}",
                pos % self.dims,
                pos / self.dims
            ))),
        }
    }

    /// Coordinate-wise mean of all points.
    pub fn centroid(&self) -> Vec<T> {
        let mut mean = vec![T::zero(); self.dims];
        let n = self.n_points();
        if n == 0 {
            return mean;
        }
        for row in self.rows() {
            for (m, &v) in mean.iter_mut().zip(row) {
                *m = *m + v;
            }
        }
        let n_t = T::from(n).unwrap_or_else(T::one);
        for m in mean.iter_mut() {
            *m = *m / n_t;
        }
        mean
    }

    /// Copy the selected rows into `out` (cleared first), preserving `indices` order.
    pub fn gather_into(&self, indices: &[usize], out: &mut Vec<T>) {
        out.clear();
        out.reserve(indices.len() * self.dims);
        for &i in indices {
            out.extend_from_slice(self.point(i));
        }
    }
}

// ============================================================================
// Local View
// ============================================================================

/// The neighborhood of one reference point, as handed to local estimators.
#[derive(Debug, Clone, Copy)]
pub struct LocalView<'a, T> {
    center: &'a [T],
    neighbors: PointCloud<'a, T>,
    distances: &'a [T],
    self_inclusive: bool,
}

impl<'a, T: Float> LocalView<'a, T> {
    /// Assemble a view from already extracted neighbors.
    ///
    /// `distances[i]` must be the distance from `center` to neighbor row `i`,
    /// sorted ascending.
    pub fn new(
        center: &'a [T],
        neighbors: PointCloud<'a, T>,
        distances: &'a [T],
        self_inclusive: bool,
    ) -> Result<Self, IdError> {
        if center.len() != neighbors.dims() {
            return Err(IdError::MismatchedDimensions {
                len: center.len(),
                dims: neighbors.dims(),
            });
        }
        if distances.len() != neighbors.n_points() {
            return Err(IdError::invalid(
                "distances",
                format!(
                    "expected {} distances, got {}",
                    neighbors.n_points(),
                    distances.len()
                ),
            ));
        }
        Ok(Self {
            center,
            neighbors,
            distances,
            self_inclusive,
        })
    }

    /// The reference point.
    #[inline]
    pub fn center(&self) -> &'a [T] {
        self.center
    }

    /// Neighbor rows (including the reference point if self-inclusive).
    #[inline]
    pub fn neighbors(&self) -> PointCloud<'a, T> {
        self.neighbors
    }

    /// All distances aligned with [`LocalView::neighbors`].
    #[inline]
    pub fn distances(&self) -> &'a [T] {
        self.distances
    }

    /// Whether the reference point is the first neighbor.
    #[inline]
    pub fn is_self_inclusive(&self) -> bool {
        self.self_inclusive
    }

    /// Sorted distances to neighbors other than the reference point.
    #[inline]
    pub fn neighbor_distances(&self) -> &'a [T] {
        if self.self_inclusive && !self.distances.is_empty() {
            &self.distances[1..]
        } else {
            self.distances
        }
    }

    /// Number of neighbors other than the reference point.
    #[inline]
    pub fn n_neighbors(&self) -> usize {
        self.neighbor_distances().len()
    }
}
