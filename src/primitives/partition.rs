//! Work partitioning for chunked pointwise processing.
//!
//! ## Purpose
//!
//! This module splits a list of query points into contiguous chunks and
//! resolves the requested worker count, so the executor can hand each chunk
//! to one worker with its own workspace.
//!
//! ## Design notes
//!
//! * **Contiguous**: Chunks are consecutive ranges of the query list, so
//!   concatenating per-chunk results in chunk order restores input order.
//! * **Deterministic**: The partition depends only on the number of queries,
//!   the worker count and the optional chunk size, never on timing.
//!
//! ## Invariants
//!
//! * Every query position belongs to exactly one chunk.
//! * No chunk is empty; the partition of zero queries has no chunks.

use std::ops::Range;

/// Worker count used when `n_jobs` is zero and the platform cannot report one.
const FALLBACK_WORKERS: usize = 1;

/// Number of chunks handed to each worker when no chunk size is configured.
const CHUNKS_PER_WORKER: usize = 4;

/// Resolve a requested job count: `0` means all available cores.
pub fn resolve_n_jobs(n_jobs: usize) -> usize {
    if n_jobs > 0 {
        return n_jobs;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKERS)
}

/// A split of `n_queries` positions into contiguous chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPartition {
    n_queries: usize,
    chunk_size: usize,
}

impl WorkPartition {
    /// Partition `n_queries` positions for `workers` threads.
    ///
    /// When `chunk_size` is `None`, each worker receives about
    /// `CHUNKS_PER_WORKER` chunks to smooth out uneven neighborhoods.
    pub fn new(n_queries: usize, workers: usize, chunk_size: Option<usize>) -> Self {
        let workers = workers.max(1);
        let chunk_size = match chunk_size {
            Some(c) => c.max(1),
            None => n_queries.div_ceil(workers * CHUNKS_PER_WORKER).max(1),
        };
        Self {
            n_queries,
            chunk_size,
        }
    }

    /// Number of positions covered.
    #[inline]
    pub fn n_queries(&self) -> usize {
        self.n_queries
    }

    /// Positions per chunk (the last chunk may be shorter).
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks.
    #[inline]
    pub fn n_chunks(&self) -> usize {
        self.n_queries.div_ceil(self.chunk_size)
    }

    /// Position range of chunk `c`.
    #[inline]
    pub fn chunk(&self, c: usize) -> Range<usize> {
        let start = (c * self.chunk_size).min(self.n_queries);
        let end = (start + self.chunk_size).min(self.n_queries);
        start..end
    }

    /// Iterate over all chunk ranges in order.
    pub fn chunks(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.n_chunks()).map(move |c| self.chunk(c))
    }
}
