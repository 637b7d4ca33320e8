//! Settings validation errors and semantic validation.

use crate::settings::IntegrationSettings;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate integration settings semantically.
pub fn validate_settings(settings: &IntegrationSettings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    let nodes = settings.quadrature.nodes;
    if nodes == 0 || nodes > crate::MAX_QUADRATURE_NODES {
        return Err(ValidationError::InvalidValue {
            field: "quadrature.nodes".to_string(),
            message: format!(
                "Must be in [1, {}], got {}",
                crate::MAX_QUADRATURE_NODES,
                nodes
            ),
        });
    }

    if settings.monte_carlo.samples == 0 {
        return Err(ValidationError::InvalidValue {
            field: "monte_carlo.samples".to_string(),
            message: "Must be positive, got 0".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ValidationError::IoError("x".into()).code(), 60);
        assert_eq!(ValidationError::ParseError("x".into()).code(), 61);
        assert_eq!(
            ValidationError::InvalidValue {
                field: "f".into(),
                message: "m".into()
            }
            .code(),
            65
        );
    }

    #[test]
    fn version_mismatch_detected() {
        let mut settings = IntegrationSettings::default();
        settings.schema_version = "0.9.0".to_string();
        let err = validate_settings(&settings).unwrap_err();
        assert_eq!(err.code(), 66);
    }

    #[test]
    fn node_bounds() {
        let ok = IntegrationSettings::default().with_quadrature_nodes(crate::MAX_QUADRATURE_NODES);
        assert!(validate_settings(&ok).is_ok());
        let too_many =
            IntegrationSettings::default().with_quadrature_nodes(crate::MAX_QUADRATURE_NODES + 1);
        assert!(validate_settings(&too_many).is_err());
    }

    #[test]
    fn zero_samples_rejected() {
        let settings = IntegrationSettings::default().with_monte_carlo_samples(0);
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("monte_carlo.samples"));
    }
}
