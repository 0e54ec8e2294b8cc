//! Correlation dimension (Grassberger-Procaccia) global estimator.
//!
//! ## Purpose
//!
//! This module estimates the correlation dimension from the growth of the
//! correlation integral `C(r)`, the fraction of point pairs closer than `r`,
//! between two scales:
//!
//! ```text
//! d = ln(C(r₂) / C(r₁)) / ln(r₂ / r₁)
//! ```
//!
//! ## Design notes
//!
//! * **Adaptive scales**: `r₁` and `r₂` are the median distances to the
//!   `k1`-th and `k2`-th nearest neighbor, so the scales follow the sampling
//!   density instead of being fixed by the caller.
//! * **Pair counts**: `C(r)` is counted with radius queries on the neighbor
//!   index (pairs at distance `<= r`), avoiding the full distance matrix.
//! * **Subsampling**: With `max_points` set, a uniform subsample drawn from a
//!   seeded `StdRng` replaces the cloud. Without `random_state` the seed is
//!   `DEFAULT_SEED`, so repeated fits agree.
//!
//! ## Invariants
//!
//! * `1 <= k1 < k2` and the (sub)sample holds at least `k2 + 1` points.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index::sample;

use crate::algorithms::estimator::{Estimator, Scope, param};
use crate::math::distance::DistanceMetric;
use crate::math::index::{NeighborIndex, Query, SearchBuffer};
use crate::math::linalg::FloatLinalg;
use crate::math::order_stats::median_inplace;
use crate::primitives::buffer::NeighborBuffer;
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

const DEFAULT_K1: usize = 10;
const DEFAULT_K2: usize = 20;
const DEFAULT_SEED: u64 = 0;

/// The correlation dimension estimator.
#[derive(Debug, Clone)]
pub struct CorrInt<T: FloatLinalg> {
    k1: usize,
    k2: usize,
    metric: DistanceMetric<T>,
    max_points: Option<usize>,
    random_state: Option<u64>,
}

impl<T: FloatLinalg> CorrInt<T> {
    /// Start configuring a correlation dimension estimator.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> CorrIntBuilder<T> {
        CorrIntBuilder::new()
    }

    /// Neighbor ranks defining the two scales.
    pub fn scales(&self) -> (usize, usize) {
        (self.k1, self.k2)
    }

    /// Subsample size limit, if any.
    pub fn max_points(&self) -> Option<usize> {
        self.max_points
    }

    fn subsample(&self, cloud: &PointCloud<'_, T>) -> Option<Vec<T>> {
        let n = cloud.n_points();
        let limit = self.max_points.filter(|&m| m < n)?;

        let mut rng = StdRng::seed_from_u64(self.random_state.unwrap_or(DEFAULT_SEED));
        let mut rows = sample(&mut rng, n, limit).into_vec();
        rows.sort_unstable();

        let mut data = Vec::new();
        cloud.gather_into(&rows, &mut data);
        Some(data)
    }

    fn estimate_on(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        let n = cloud.n_points();
        Validator::validate_min_points(n, self.k2 + 1)?;

        let index = NeighborIndex::new(*cloud, self.metric.clone())?;
        let mut search = SearchBuffer::new(self.k2);
        let mut out = NeighborBuffer::new(self.k2, 0);

        let mut d1 = Vec::with_capacity(n);
        let mut d2 = Vec::with_capacity(n);
        for i in 0..n {
            index.query_into(Query::Index(i), self.k2, false, &mut search, &mut out)?;
            d1.push(out.distances[self.k1 - 1]);
            d2.push(out.distances[self.k2 - 1]);
        }
        let r1 = median_inplace(&mut d1);
        let r2 = median_inplace(&mut d2);

        if !(r1 > T::zero()) {
            return Err(IdError::degenerate("lower scale r1 is zero"));
        }
        if !(r2 > r1) {
            return Err(IdError::degenerate("scales r1 and r2 coincide"));
        }

        let (mut pairs1, mut pairs2) = (0usize, 0usize);
        for i in 0..n {
            index.query_radius_into(Query::Index(i), r2, false, &mut search, &mut out)?;
            pairs2 += out.len();
            pairs1 += out.distances.iter().filter(|&&d| d <= r1).count();
        }
        if pairs1 == 0 {
            return Err(IdError::degenerate("no pairs within the lower scale r1"));
        }

        let total: T = param((n * (n - 1)) as f64);
        let c1 = param::<T>(pairs1 as f64) / total;
        let c2 = param::<T>(pairs2 as f64) / total;

        Ok((c2 / c1).ln() / (r2 / r1).ln())
    }
}

impl<T: FloatLinalg> Estimator<T> for CorrInt<T> {
    fn name(&self) -> &'static str {
        "corr_int"
    }

    fn scope(&self) -> Scope {
        Scope::Global
    }

    fn min_points(&self) -> usize {
        self.k2 + 1
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        match self.subsample(cloud) {
            Some(data) => self.estimate_on(&PointCloud::new(&data, cloud.dims())?),
            None => self.estimate_on(cloud),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`CorrInt`].
#[derive(Debug, Clone)]
pub struct CorrIntBuilder<T> {
    k1: Option<usize>,
    k2: Option<usize>,
    metric: Option<DistanceMetric<T>>,
    max_points: Option<usize>,
    random_state: Option<u64>,
    duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg> Default for CorrIntBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg> CorrIntBuilder<T> {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            k1: None,
            k2: None,
            metric: None,
            max_points: None,
            random_state: None,
            duplicate_param: None,
        }
    }

    /// Neighbor rank of the lower scale (default 10).
    pub fn k1(mut self, k1: usize) -> Self {
        if self.k1.is_some() {
            self.duplicate_param = Some("k1");
        }
        self.k1 = Some(k1);
        self
    }

    /// Neighbor rank of the upper scale (default 20).
    pub fn k2(mut self, k2: usize) -> Self {
        if self.k2.is_some() {
            self.duplicate_param = Some("k2");
        }
        self.k2 = Some(k2);
        self
    }

    /// Distance metric (default Euclidean).
    pub fn metric(mut self, metric: DistanceMetric<T>) -> Self {
        if self.metric.is_some() {
            self.duplicate_param = Some("metric");
        }
        self.metric = Some(metric);
        self
    }

    /// Estimate on a random subsample of at most `max_points` points.
    pub fn max_points(mut self, max_points: usize) -> Self {
        if self.max_points.is_some() {
            self.duplicate_param = Some("max_points");
        }
        self.max_points = Some(max_points);
        self
    }

    /// Seed for the subsample (defaults to a fixed seed).
    pub fn random_state(mut self, seed: u64) -> Self {
        if self.random_state.is_some() {
            self.duplicate_param = Some("random_state");
        }
        self.random_state = Some(seed);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<CorrInt<T>, IdError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let k1 = self.k1.unwrap_or(DEFAULT_K1);
        let k2 = self.k2.unwrap_or(DEFAULT_K2);
        Validator::validate_scale_pair(k1, k2)?;

        if let Some(m) = self.max_points {
            Validator::validate_neighbor_count("max_points", m, k2 + 1)?;
        }

        Ok(CorrInt {
            k1,
            k2,
            metric: self.metric.unwrap_or_default(),
            max_points: self.max_points,
            random_state: self.random_state,
        })
    }
}
