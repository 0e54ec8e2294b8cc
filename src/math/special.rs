//! Special functions.
//!
//! ## Purpose
//!
//! This module provides the principal branch of the Lambert W function, which
//! inverts the inseparability probability of uniformly sampled spheres.
//!
//! ## Design notes
//!
//! * **Algorithm**: Halley iteration from a branch-aware initial guess: the
//!   branch-point series near `-1/e`, `ln(1 + x)` for moderate `x` and the
//!   asymptotic `ln x - ln ln x` for large `x`.
//!
//! ## Invariants
//!
//! * `w(x) * exp(w(x)) == x` to within a few ulps for `x >= -1/e`.
//! * Returns NaN below the branch point and for NaN input; `+inf` maps to `+inf`.

use num_traits::Float;

/// Maximum Halley steps; convergence is cubic so a handful suffice.
const MAX_HALLEY_STEPS: usize = 64;

/// Principal branch `W₀(x)` of the Lambert W function.
pub fn lambert_w0<T: Float>(x: T) -> T {
    let c = |v: f64| T::from(v).unwrap_or_else(T::nan);

    if x.is_nan() {
        return T::nan();
    }
    if x == T::infinity() {
        return T::infinity();
    }
    if x == T::zero() {
        return T::zero();
    }

    let branch_point = -(-T::one()).exp();
    if x < branch_point {
        return T::nan();
    }
    if x == branch_point {
        return -T::one();
    }

    let mut w = if x < c(-0.25) {
        // Series in p = sqrt(2 (e x + 1)) around the branch point.
        let p = (c(2.0) * (c(core::f64::consts::E) * x + T::one())).sqrt();
        -T::one() + p - p * p / c(3.0) + c(11.0 / 72.0) * p * p * p
    } else if x < c(3.0) {
        (T::one() + x).ln()
    } else {
        let l1 = x.ln();
        let l2 = l1.ln();
        l1 - l2 + l2 / l1
    };

    let tol = T::epsilon() * c(4.0);
    for _ in 0..MAX_HALLEY_STEPS {
        let ew = w.exp();
        let f = w * ew - x;
        let wp1 = w + T::one();
        let denom = ew * wp1 - (w + c(2.0)) * f / (c(2.0) * wp1);
        if denom == T::zero() || !denom.is_finite() {
            break;
        }
        let step = f / denom;
        w = w - step;
        if step.abs() <= tol * (T::one() + w.abs()) {
            break;
        }
    }
    w
}
