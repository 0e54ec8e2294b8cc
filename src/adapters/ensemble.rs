//! Ensemble adapter: several estimators, one combined estimate.
//!
//! ## Purpose
//!
//! This module fits a list of estimators on the same cloud and combines their
//! estimates with a [`Reducer`]. Estimators that cannot produce an estimate
//! contribute NaN and are left out of the combination.
//!
//! ## Design notes
//!
//! * **Heterogeneous**: Members are boxed trait objects, so global and local
//!   estimators can be mixed.
//! * **Tolerant**: Recoverable member failures are logged and recorded.
//!   Input errors abort the fit, since they would fail every member.

use log::warn;

use crate::algorithms::estimator::Estimator;
use crate::evaluation::aggregate::Reducer;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

/// Per-estimator and combined estimates of an ensemble fit.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleResult<T> {
    /// Member names, in insertion order.
    pub names: Vec<&'static str>,
    /// Member estimates aligned with `names`, NaN where a member failed.
    pub estimates: Vec<T>,
    /// Failed members by position, with their errors.
    pub failures: Vec<(usize, IdError)>,
    /// Reduced estimate over the members that succeeded.
    pub combined: T,
}

/// A set of estimators fitted together.
#[derive(Debug)]
pub struct Ensemble<T: FloatLinalg> {
    members: Vec<Box<dyn Estimator<T>>>,
    reducer: Reducer,
}

impl<T: FloatLinalg> Ensemble<T> {
    /// Start configuring an ensemble.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> EnsembleBuilder<T> {
        EnsembleBuilder::new()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the ensemble has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Fit every member on a row-major buffer.
    pub fn fit(&self, data: &[T], dims: usize) -> Result<EnsembleResult<T>, IdError> {
        let cloud = Validator::validate_inputs(data, dims)?;

        let mut names = Vec::with_capacity(self.members.len());
        let mut estimates = Vec::with_capacity(self.members.len());
        let mut failures = Vec::new();

        for (m, member) in self.members.iter().enumerate() {
            names.push(member.name());
            let outcome = member.estimate(&cloud).and_then(|d| {
                if d.is_finite() {
                    Ok(d)
                } else {
                    Err(IdError::degenerate("non-finite estimate"))
                }
            });
            match outcome {
                Ok(d) => estimates.push(d),
                Err(e) if e.is_recoverable() => {
                    warn!("ensemble: {} failed: {}", member.name(), e);
                    estimates.push(T::nan());
                    failures.push((m, e));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(EnsembleResult {
            combined: self.reducer.reduce(&estimates)?,
            names,
            estimates,
            failures,
        })
    }
}

/// Builder for [`Ensemble`].
#[derive(Debug)]
pub struct EnsembleBuilder<T: FloatLinalg> {
    members: Vec<Box<dyn Estimator<T>>>,
    reducer: Option<Reducer>,
    duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg> Default for EnsembleBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg> EnsembleBuilder<T> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            reducer: None,
            duplicate_param: None,
        }
    }

    /// Add a member estimator.
    pub fn add<E: Estimator<T> + 'static>(mut self, estimator: E) -> Self {
        self.members.push(Box::new(estimator));
        self
    }

    /// Add an already boxed member.
    pub fn add_boxed(mut self, estimator: Box<dyn Estimator<T>>) -> Self {
        self.members.push(estimator);
        self
    }

    /// How member estimates are combined (default [`Reducer::Mean`]).
    pub fn reducer(mut self, reducer: Reducer) -> Self {
        if self.reducer.is_some() {
            self.duplicate_param = Some("reducer");
        }
        self.reducer = Some(reducer);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Ensemble<T>, IdError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        if self.members.is_empty() {
            return Err(IdError::invalid("estimators", "at least one is required"));
        }
        let reducer = self.reducer.unwrap_or_default();
        reducer.validate()?;
        Ok(Ensemble {
            members: self.members,
            reducer,
        })
    }
}
