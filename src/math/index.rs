//! Neighbor index over a point cloud.
//!
//! ## Purpose
//!
//! This module wraps the KD-tree into the query surface used by estimators
//! and the pointwise driver: k-nearest and radius queries by row index or by
//! free-standing point, with explicit control over whether the query row is
//! part of its own neighborhood.
//!
//! ## Design notes
//!
//! * **Built once**: The tree is constructed in [`NeighborIndex::new`] and the
//!   index is read-only afterwards, so it can be shared across threads.
//! * **Known self-distance**: Index queries never rely on the search to
//!   rediscover the query row. Self-exclusive queries skip it; self-inclusive
//!   queries search for one neighbor fewer and prepend the row at distance zero.
//! * **Caller scratch**: `*_into` variants write into caller-owned buffers.
//!
//! ## Invariants
//!
//! * Results are sorted ascending by `(distance, index)`.
//! * A self-inclusive index query returns the query row first, at distance 0.

use crate::math::distance::{DistanceLinalg, DistanceMetric};
use crate::math::neighborhood::{KDTree, NodeDistance};
use crate::primitives::buffer::{NeighborBuffer, NeighborhoodSearchBuffer};
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;

/// Scratch space for index queries.
pub type SearchBuffer<T> = NeighborhoodSearchBuffer<NodeDistance<T>>;

/// What to search around.
#[derive(Debug, Clone, Copy)]
pub enum Query<'q, T> {
    /// A row of the indexed cloud.
    Index(usize),
    /// A free-standing point with the cloud's dimensionality.
    Point(&'q [T]),
}

/// Owned result of a neighbor query.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors<T> {
    /// Row indices, sorted by (distance, index).
    pub indices: Vec<usize>,
    /// Distances aligned with `indices`.
    pub distances: Vec<T>,
}

impl<T> Neighbors<T> {
    /// Number of neighbors returned.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no neighbors were returned.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Exact neighbor index over a borrowed point cloud.
#[derive(Debug, Clone)]
pub struct NeighborIndex<'a, T: DistanceLinalg> {
    cloud: PointCloud<'a, T>,
    tree: KDTree<T>,
    metric: DistanceMetric<T>,
}

impl<'a, T: DistanceLinalg> NeighborIndex<'a, T> {
    /// Build the index. Fails on empty or non-finite input and invalid metric parameters.
    pub fn new(cloud: PointCloud<'a, T>, metric: DistanceMetric<T>) -> Result<Self, IdError> {
        if cloud.is_empty() {
            return Err(IdError::EmptyInput);
        }
        cloud.ensure_finite()?;
        metric.validate(cloud.dims())?;

        if !metric.supports_pruning() {
            log::debug!(
                "custom metric: neighbor queries scan all {} points",
                cloud.n_points()
            );
        }

        let tree = KDTree::new(cloud.as_slice(), cloud.dims());
        Ok(Self {
            cloud,
            tree,
            metric,
        })
    }

    /// The indexed cloud.
    #[inline]
    pub fn cloud(&self) -> PointCloud<'a, T> {
        self.cloud
    }

    /// The metric used by every query.
    #[inline]
    pub fn metric(&self) -> &DistanceMetric<T> {
        &self.metric
    }

    /// Number of indexed points.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.cloud.n_points()
    }

    /// Ambient dimensionality.
    #[inline]
    pub fn dims(&self) -> usize {
        self.cloud.dims()
    }

    /// Maximum neighborhood size a query can return.
    pub fn available(&self, query: &Query<'_, T>, self_inclusive: bool) -> usize {
        match query {
            Query::Index(_) if !self_inclusive => self.n_points() - 1,
            _ => self.n_points(),
        }
    }

    /// The `k` nearest neighbors of `query`.
    pub fn query(
        &self,
        query: Query<'_, T>,
        k: usize,
        self_inclusive: bool,
    ) -> Result<Neighbors<T>, IdError> {
        let mut search = SearchBuffer::new(k);
        let mut out = NeighborBuffer::new(k, 0);
        self.query_into(query, k, self_inclusive, &mut search, &mut out)?;
        Ok(Neighbors {
            indices: out.indices.into_inner(),
            distances: out.distances.into_inner(),
        })
    }

    /// All points within distance `radius` (inclusive) of `query`.
    pub fn query_radius(
        &self,
        query: Query<'_, T>,
        radius: T,
        self_inclusive: bool,
    ) -> Result<Neighbors<T>, IdError> {
        let mut search = SearchBuffer::default();
        let mut out = NeighborBuffer::default();
        self.query_radius_into(query, radius, self_inclusive, &mut search, &mut out)?;
        Ok(Neighbors {
            indices: out.indices.into_inner(),
            distances: out.distances.into_inner(),
        })
    }

    /// Allocation-free form of [`NeighborIndex::query`].
    ///
    /// Fills `out.indices` and `out.distances`; `out.coords` is left untouched
    /// (see [`NeighborIndex::gather`]).
    pub fn query_into(
        &self,
        query: Query<'_, T>,
        k: usize,
        self_inclusive: bool,
        search: &mut SearchBuffer<T>,
        out: &mut NeighborBuffer<T>,
    ) -> Result<(), IdError> {
        let center = self.resolve(&query)?;
        let available = self.available(&query, self_inclusive);
        if k > available {
            return Err(IdError::IndexQuery {
                requested: k,
                available,
            });
        }

        match query {
            Query::Index(i) if self_inclusive => {
                if k == 0 {
                    out.indices.clear();
                    out.distances.clear();
                    return Ok(());
                }
                self.tree
                    .find_k_nearest(center, k - 1, &self.metric, Some(i), search, out);
                out.indices.insert(0, i);
                out.distances.insert(0, T::zero());
            }
            Query::Index(i) => {
                self.tree
                    .find_k_nearest(center, k, &self.metric, Some(i), search, out);
            }
            Query::Point(_) => {
                self.tree
                    .find_k_nearest(center, k, &self.metric, None, search, out);
            }
        }
        Ok(())
    }

    /// Allocation-free form of [`NeighborIndex::query_radius`].
    pub fn query_radius_into(
        &self,
        query: Query<'_, T>,
        radius: T,
        self_inclusive: bool,
        search: &mut SearchBuffer<T>,
        out: &mut NeighborBuffer<T>,
    ) -> Result<(), IdError> {
        if !radius.is_finite() || radius < T::zero() {
            return Err(IdError::invalid(
                "radius",
                "must be finite and non-negative",
            ));
        }
        let center = self.resolve(&query)?;

        match query {
            Query::Index(i) => {
                self.tree
                    .find_within_radius(center, radius, &self.metric, Some(i), search, out);
                if self_inclusive {
                    out.indices.insert(0, i);
                    out.distances.insert(0, T::zero());
                }
            }
            Query::Point(_) => {
                self.tree
                    .find_within_radius(center, radius, &self.metric, None, search, out);
            }
        }
        Ok(())
    }

    /// Copy the coordinates of the rows in `out.indices` into `out.coords`.
    pub fn gather(&self, out: &mut NeighborBuffer<T>) {
        self.cloud.gather_into(&out.indices, &mut out.coords);
    }

    /// Coordinates of the query.
    pub fn resolve<'q>(&self, query: &Query<'q, T>) -> Result<&'q [T], IdError>
    where
        'a: 'q,
    {
        match *query {
            Query::Index(i) => {
                if i >= self.n_points() {
                    return Err(IdError::InvalidIndex {
                        index: i,
                        len: self.n_points(),
                    });
                }
                Ok(self.cloud.point(i))
            }
            Query::Point(p) => {
                if p.len() != self.dims() {
                    return Err(IdError::MismatchedDimensions {
                        len: p.len(),
                        dims: self.dims(),
                    });
                }
                if p.iter().any(|v| !v.is_finite()) {
                    return Err(IdError::InvalidNumericValue(
                        "query point has non-finite coordinates".into(),
                    ));
                }
                Ok(p)
            }
        }
    }
}
