//! Construction-time validation errors.
//!
//! Only programmer-error-class violations surface as hard failures.
//! Physically expected non-events (lost photons, failed interference, missed
//! detections) are ordinary result values and never raise.

use thiserror::Error;

/// Invalid construction parameter for a link component.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} = {value} is not a probability in [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("{name} = {value} must be non-negative")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} = {value} must be positive")]
    NonPositive { name: &'static str, value: f64 },

    #[error("Bell-state weights sum to {sum}, expected 1")]
    WeightsNotNormalized { sum: f64 },

    #[error("numerical aperture {na} exceeds refractive index {n}")]
    ApertureExceedsIndex { na: f64, n: f64 },
}

pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_bounds_are_inclusive() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", 1.0 + 1e-12).is_err());
        assert!(check_probability("p", -0.1).is_err());
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert!(check_non_negative("t", 0.0).is_ok());
        assert!(check_non_negative("t", -1e-15).is_err());
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(check_positive("v", 0.0).is_err());
        assert!(check_positive("v", 2e8).is_ok());
    }
}
