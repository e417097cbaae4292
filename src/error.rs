//! Error types for detector simulation operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    /// A four-momentum violates non-negative energy or the mass-shell condition.
    #[error("Invalid physics: {0}")]
    InvalidPhysics(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Structural detector configuration error (wrong sub-detector composition).
    #[error("Logic error: {0}")]
    Logic(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DetectorError {
    pub fn invalid_physics(msg: impl Into<String>) -> Self {
        Self::InvalidPhysics(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn logic(msg: impl Into<String>) -> Self {
        Self::Logic(msg.into())
    }

    pub fn is_invalid_physics(&self) -> bool {
        matches!(self, Self::InvalidPhysics(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_logic(&self) -> bool {
        matches!(self, Self::Logic(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_predicates() {
        let err = DetectorError::invalid_argument("resolution out of range");
        assert!(err.is_invalid_argument());
        assert!(!err.is_logic());
        assert_eq!(err.to_string(), "Invalid argument: resolution out of range");

        let err = DetectorError::logic("two trackers");
        assert!(err.is_logic());
        assert!(!err.is_invalid_physics());
    }
}
