//! Error types for the flipfield core.
//!
//! Stepping and sampling never fail; these errors only come out of
//! configuration validation and the snapshot/export paths.

use thiserror::Error;

/// Errors produced while configuring or rendering a simulation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Canvas width or height was zero, or their product overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A parameter had a value the engine cannot run with.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// The spawn band was inverted, non-finite, or did not lie outside the boundary.
    #[error("invalid spawn band [{min}, {max}]: {reason}")]
    InvalidBand { min: f64, max: f64, reason: String },

    /// An I/O failure while writing a snapshot or export.
    #[error("i/o error: {0}")]
    Io(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidParam`].
    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Rejects NaN and infinite values for the named parameter.
pub fn require_finite(name: &str, value: f64) -> Result<f64, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::invalid_param(name, format!("must be finite, got {value}")))
    }
}

/// Rejects values that are not strictly positive (NaN included).
pub fn require_positive(name: &str, value: f64) -> Result<f64, EngineError> {
    let value = require_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_param(name, format!("must be > 0, got {value}")))
    }
}

/// Rejects negative values (NaN included).
pub fn require_non_negative(name: &str, value: f64) -> Result<f64, EngineError> {
    let value = require_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_param(name, format!("must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = EngineError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_param_includes_name_and_reason() {
        let msg = EngineError::invalid_param("speed_cap", "must be > 0").to_string();
        assert!(msg.contains("speed_cap"), "missing name in: {msg}");
        assert!(msg.contains("must be > 0"), "missing reason in: {msg}");
    }

    #[test]
    fn invalid_band_includes_bounds() {
        let err = EngineError::InvalidBand {
            min: 350.0,
            max: 150.0,
            reason: "min exceeds max".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("350"), "missing min in: {msg}");
        assert!(msg.contains("150"), "missing max in: {msg}");
        assert!(msg.contains("min exceeds max"), "missing reason in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let msg = EngineError::Io("disk full".into()).to_string();
        assert!(msg.contains("disk full"), "missing message in: {msg}");
    }

    // ---- Validation helpers ----

    #[test]
    fn require_finite_rejects_nan_and_infinity() {
        assert!(require_finite("a", f64::NAN).is_err());
        assert!(require_finite("a", f64::INFINITY).is_err());
        assert!(require_finite("a", -3.0).is_ok());
    }

    #[test]
    fn require_positive_rejects_zero_and_negative() {
        assert!(require_positive("k", 0.0).is_err());
        assert!(require_positive("k", -1.0).is_err());
        assert_eq!(require_positive("k", 50.0).unwrap(), 50.0);
    }

    #[test]
    fn require_non_negative_accepts_zero() {
        assert_eq!(require_non_negative("jitter", 0.0).unwrap(), 0.0);
        assert!(require_non_negative("jitter", -0.1).is_err());
        assert!(require_non_negative("jitter", f64::NAN).is_err());
    }

    #[test]
    fn engine_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }

    #[test]
    fn engine_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<EngineError>();
    }
}
