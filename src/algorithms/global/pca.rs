//! Global PCA estimator.
//!
//! ## Purpose
//!
//! This module estimates the dimension of a whole cloud from the eigenvalue
//! spectrum of its centered covariance, using a configurable
//! [`SpectralRule`] (default: the continuous participation ratio).

use crate::algorithms::estimator::{Estimator, Scope};
use crate::math::linalg::FloatLinalg;
use crate::math::spectrum::{SpectralRule, Spectrum, covariance_spectrum};
use crate::primitives::cloud::PointCloud;
use crate::primitives::errors::IdError;
use crate::primitives::validator::Validator;

/// Global PCA estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pca {
    rule: SpectralRule,
}

impl Pca {
    /// Start configuring a PCA estimator.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> PcaBuilder {
        PcaBuilder::new()
    }

    /// The spectral rule in use.
    pub fn rule(&self) -> SpectralRule {
        self.rule
    }

    /// Covariance spectrum of `cloud`.
    pub fn spectrum<T: FloatLinalg>(&self, cloud: &PointCloud<'_, T>) -> Result<Spectrum<T>, IdError> {
        covariance_spectrum(cloud, false)
    }
}

impl<T: FloatLinalg> Estimator<T> for Pca {
    fn name(&self) -> &'static str {
        "pca"
    }

    fn scope(&self) -> Scope {
        Scope::Global
    }

    fn min_points(&self) -> usize {
        2
    }

    fn estimate(&self, cloud: &PointCloud<'_, T>) -> Result<T, IdError> {
        let spectrum = self.spectrum(cloud)?;
        self.rule.evaluate(&spectrum.values)
    }
}

/// Builder for [`Pca`].
#[derive(Debug, Clone, Default)]
pub struct PcaBuilder {
    rule: Option<SpectralRule>,
    duplicate_param: Option<&'static str>,
}

impl PcaBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spectral rule (default [`SpectralRule::ParticipationRatio`]).
    pub fn rule(mut self, rule: SpectralRule) -> Self {
        if self.rule.is_some() {
            self.duplicate_param = Some("rule");
        }
        self.rule = Some(rule);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Pca, IdError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        let rule = self.rule.unwrap_or_default();
        rule.validate()?;
        Ok(Pca { rule })
    }
}
