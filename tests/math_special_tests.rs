#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use intdim_rs::internals::math::special::lambert_w0;

#[test]
fn test_lambert_w_identity() {
    for &x in &[-0.35, -0.1, 0.5, 1.0, 2.0, 10.0, 1e3, 1e8] {
        let w: f64 = lambert_w0(x);
        assert_relative_eq!(w * w.exp(), x, max_relative = 1e-12, epsilon = 1e-14);
    }
}

#[test]
fn test_lambert_w_known_values() {
    // Omega constant
    assert_relative_eq!(lambert_w0(1.0f64), 0.5671432904097838, epsilon = 1e-14);
    assert_relative_eq!(lambert_w0(core::f64::consts::E), 1.0, epsilon = 1e-14);
    assert_eq!(lambert_w0(0.0f64), 0.0);
}

#[test]
fn test_lambert_w_branch_point() {
    let b = -(-1.0f64).exp();
    assert_relative_eq!(lambert_w0(b), -1.0);
    assert!(lambert_w0(-1.0f64).is_nan());
    assert!(lambert_w0(f64::NAN).is_nan());
    assert_eq!(lambert_w0(f64::INFINITY), f64::INFINITY);
}

#[test]
fn test_lambert_w_f32() {
    let w: f32 = lambert_w0(2.0f32);
    assert_relative_eq!(w * w.exp(), 2.0, max_relative = 1e-5);
}
