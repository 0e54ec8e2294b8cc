#![cfg(feature = "dev")]
//! Tests for input and parameter validation.

use intdim_rs::internals::primitives::errors::IdError;
use intdim_rs::internals::primitives::validator::Validator;

// ============================================================================
// Input Validation Tests
// ============================================================================

#[test]
fn test_validate_inputs_empty() {
    let data: [f64; 0] = [];
    assert_eq!(
        Validator::validate_inputs(&data, 2).unwrap_err(),
        IdError::EmptyInput
    );
}

#[test]
fn test_validate_inputs_non_finite() {
    let data = [0.0, f64::INFINITY];
    assert!(matches!(
        Validator::validate_inputs(&data, 1),
        Err(IdError::InvalidNumericValue(_))
    ));
}

#[test]
fn test_validate_inputs_ok() {
    let data = [0.0, 1.0, 2.0, 3.0];
    let cloud = Validator::validate_inputs(&data, 2).unwrap();
    assert_eq!(cloud.n_points(), 2);
}

#[test]
fn test_validate_min_points() {
    assert!(Validator::validate_min_points(3, 3).is_ok());
    assert_eq!(
        Validator::validate_min_points(2, 3).unwrap_err(),
        IdError::InsufficientData {
            what: "points",
            got: 2,
            min: 3
        }
    );
}

#[test]
fn test_validate_subset_reports_first_bad_row() {
    assert!(Validator::validate_subset(&[0, 4, 2], 5).is_ok());
    assert_eq!(
        Validator::validate_subset(&[0, 7, 9], 5).unwrap_err(),
        IdError::InvalidIndex { index: 7, len: 5 }
    );
}

// ============================================================================
// Parameter Validation Tests
// ============================================================================

#[test]
fn test_validate_scale_pair() {
    assert!(Validator::validate_scale_pair(10, 20).is_ok());
    assert!(Validator::validate_scale_pair(0, 5).is_err());
    assert!(matches!(
        Validator::validate_scale_pair(5, 5),
        Err(IdError::InvalidParameter { parameter: "k2", .. })
    ));
}

#[test]
fn test_validate_fraction_half_open() {
    assert!(Validator::validate_fraction("f", 0.0, 0.0, 1.0).is_ok());
    assert!(Validator::validate_fraction("f", 1.0, 0.0, 1.0).is_err());
    assert!(Validator::validate_fraction("f", f64::NAN, 0.0, 1.0).is_err());
}

#[test]
fn test_validate_positive() {
    assert!(Validator::validate_positive("c", 1e-9).is_ok());
    assert!(Validator::validate_positive("c", 0.0).is_err());
    assert!(Validator::validate_positive("c", f64::INFINITY).is_err());
}

#[test]
fn test_validate_alphas() {
    assert!(Validator::validate_alphas(&[0.6, 0.8]).is_ok());
    assert!(Validator::validate_alphas(&[]).is_err());
    assert!(Validator::validate_alphas(&[0.8, 0.6]).is_err());
    assert!(Validator::validate_alphas(&[0.5, 1.0]).is_err());
}

#[test]
fn test_validate_no_duplicates() {
    assert!(Validator::validate_no_duplicates(None).is_ok());
    assert_eq!(
        Validator::validate_no_duplicates(Some("k")).unwrap_err(),
        IdError::DuplicateParameter { parameter: "k" }
    );
}

#[test]
fn test_validate_chunk_size() {
    assert!(Validator::validate_chunk_size(1).is_ok());
    assert!(Validator::validate_chunk_size(0).is_err());
}
