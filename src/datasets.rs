//! Synthetic point clouds with known intrinsic dimension.
//!
//! ## Purpose
//!
//! This module generates uniform samples of balls and spheres embedded in a
//! larger ambient space, for tests, benchmarks and examples.
//!
//! ## Design notes
//!
//! * **Embedding**: A `d`-dimensional sample occupies the first coordinates
//!   of each row; the remaining ambient coordinates are zero.
//! * **Reproducible**: Every generator takes a seed for a `StdRng`.
//!
//! ## Key concepts
//!
//! * **Sphere `S^d`**: Normalized Gaussian vectors in `d + 1` coordinates,
//!   a manifold of intrinsic dimension `d`.
//! * **Ball `B^d`**: Normalized Gaussian directions scaled by `U^(1/d)`,
//!   uniform in volume.

use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::primitives::errors::IdError;

/// `n_points` rows uniform in a `intrinsic_dim`-ball of `radius`, in `ambient_dim` coordinates.
pub fn hyperball(
    n_points: usize,
    intrinsic_dim: usize,
    ambient_dim: usize,
    radius: f64,
    seed: u64,
) -> Result<Vec<f64>, IdError> {
    check_shape(intrinsic_dim, intrinsic_dim, ambient_dim, radius)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let exponent = 1.0 / intrinsic_dim as f64;

    let mut data = vec![0.0; n_points * ambient_dim];
    for row in data.chunks_exact_mut(ambient_dim) {
        let scale = radius * rng.random::<f64>().powf(exponent);
        fill_direction(&mut rng, &mut row[..intrinsic_dim], scale);
    }
    Ok(data)
}

/// `n_points` rows uniform on a `intrinsic_dim`-sphere of `radius`, in `ambient_dim` coordinates.
///
/// The sphere spans `intrinsic_dim + 1` coordinates.
pub fn hypersphere(
    n_points: usize,
    intrinsic_dim: usize,
    ambient_dim: usize,
    radius: f64,
    seed: u64,
) -> Result<Vec<f64>, IdError> {
    check_shape(intrinsic_dim, intrinsic_dim + 1, ambient_dim, radius)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut data = vec![0.0; n_points * ambient_dim];
    for row in data.chunks_exact_mut(ambient_dim) {
        fill_direction(&mut rng, &mut row[..=intrinsic_dim], radius);
    }
    Ok(data)
}

/// Write a uniform random direction of length `scale` into `out`.
fn fill_direction(rng: &mut StdRng, out: &mut [f64], scale: f64) {
    loop {
        for v in out.iter_mut() {
            *v = rng.sample(StandardNormal);
        }
        let norm = out.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            out.iter_mut().for_each(|v| *v *= scale / norm);
            return;
        }
    }
}

fn check_shape(
    intrinsic_dim: usize,
    span: usize,
    ambient_dim: usize,
    radius: f64,
) -> Result<(), IdError> {
    if intrinsic_dim == 0 {
        return Err(IdError::invalid("intrinsic_dim", "must be at least 1"));
    }
    if span > ambient_dim {
        return Err(IdError::invalid(
            "ambient_dim",
            format!("must be at least {}, got {}", span, ambient_dim),
        ));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(IdError::invalid("radius", "must be finite and positive"));
    }
    Ok(())
}
