//! Configuration errors.
//!
//! These are the only fatal errors in the arena: they are raised while an
//! entity is being built or reconfigured, never during a tick.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A required collaborator or configuration record was not supplied.
    #[error("missing required reference: {0}")]
    MissingReference(&'static str),

    /// A physical quantity is non-finite or out of its valid domain.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    /// Enemy engagement ranges are not ordered attack < detection <= lose.
    #[error(
        "enemy ranges must satisfy attack < detection <= lose \
         (got {attack} / {detection} / {lose})"
    )]
    RangeOrder {
        attack: f64,
        detection: f64,
        lose: f64,
    },
}

/// Require `value` to be finite and strictly positive.
pub fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

/// Require `value` to be finite and not negative.
pub fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}
