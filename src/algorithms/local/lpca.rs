//! Local PCA estimator.
//!
//! ## Purpose
//!
//! This module estimates the dimension of one neighborhood from the
//! covariance spectrum of its rows. The default rule is Fukunaga-Olsen with
//! `alpha = 0.05`: count the eigenvalues above 5% of the largest.
//!
//! The neighborhood spectrum does not depend on the reference point, so
//! `estimate_local` is the default forward of the neighbor rows.

use crate::algorithms::estimator::{Estimator, Scope, require};
use crate::math::linalg::FloatLinalg;
use crate::math::spectrum::{SpectralRule, covariance_spectrum};
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

const DEFAULT_RULE: SpectralRule = SpectralRule::FukunagaOlsen { alpha: 0.05 };

/// Local PCA estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPca {
    rule: SpectralRule,
}

impl LocalPca {
    /// Start configuring a local PCA estimator.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> LocalPcaBuilder {
        LocalPcaBuilder::new()
    }

    /// The spectral rule in use.
    pub fn rule(&self) -> SpectralRule {
        self.rule
    }
}

impl<T: FloatLinalg> Estimator<T> for LocalPca {
    fn name(&self) -> &'static str {
        "lpca"
    }

    fn scope(&self) -> Scope {
        Scope::Local
    }

    fn min_points(&self) -> usize {
        3
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        require("neighbors", cloud.n_points(), 3)?;
        let spectrum = covariance_spectrum(cloud, false)?;
        self.rule.evaluate(&spectrum.values)
    }
}

/// Builder for [`LocalPca`].
#[derive(Debug, Clone, Default)]
pub struct LocalPcaBuilder {
    rule: Option<SpectralRule>,
    duplicate_param: Option<&'static str>,
}

impl LocalPcaBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spectral rule (default Fukunaga-Olsen with `alpha = 0.05`).
    pub fn rule(mut self, rule: SpectralRule) -> Self {
        if self.rule.is_some() {
            self.duplicate_param = Some("rule");
        }
        self.rule = Some(rule);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<LocalPca, IdError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        let rule = self.rule.unwrap_or(DEFAULT_RULE);
        rule.validate()?;
        Ok(LocalPca { rule })
    }
}
