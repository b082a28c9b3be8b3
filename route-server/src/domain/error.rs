//! Domain error types.
//!
//! These errors represent validation failures of user-supplied values.
//! They are distinct from API/IO errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Coordinate outside the WGS84 range or not finite
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Criterion identifier not in the supported set
    #[error("unknown criterion: {0}")]
    UnknownCriterion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidCoordinate("latitude 91 out of range".into());
        assert_eq!(
            err.to_string(),
            "invalid coordinate: latitude 91 out of range"
        );

        let err = DomainError::UnknownCriterion("scenic".into());
        assert_eq!(err.to_string(), "unknown criterion: scenic");
    }
}
