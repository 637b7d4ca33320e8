//! Error types for infra-bayes.
//!
//! Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Unsupported Distribution
//!   Reason: quadrature is not defined for the two_point family
//!   Fix: Use the closed-form expectation for two-point measures, or switch to Monte Carlo.
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 30,
//!   "category": "argument",
//!   "message": "invalid argument n: must be positive, got 0",
//!   "recoverable": false,
//!   "suggested_action": "fix_input",
//!   "context": { "argument": "n" }
//! }
//! ```

use ib_config::ValidationError;
use ib_math::hermite::RuleError;
use ib_math::ShapeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for infra-bayes operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Batch shapes that do not line up.
    Shape,
    /// Distribution families used where they are not supported.
    Distribution,
    /// Out-of-domain arguments and parameters.
    Argument,
    /// Operations the algebra does not define.
    Operation,
    /// Settings files and their validation.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Shape => write!(f, "shape"),
            ErrorCategory::Distribution => write!(f, "distribution"),
            ErrorCategory::Argument => write!(f, "argument"),
            ErrorCategory::Operation => write!(f, "operation"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested actions for agents to take in response to errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Correct the inputs and call again.
    FixInput,
    /// Reset configuration to defaults.
    ResetConfig,
    /// Retry the operation.
    Retry,
    /// Abort the operation.
    Abort,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::ResetConfig => write!(f, "reset_config"),
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::Abort => write!(f, "abort"),
        }
    }
}

/// Unified error type for infra-bayes.
#[derive(Error, Debug)]
pub enum Error {
    // Shape errors (10-19)
    #[error("shape error: {0}")]
    Shape(String),

    #[error("shape error: {0}")]
    Broadcast(#[from] ShapeError),

    // Distribution errors (20-29)
    #[error("{operation} is not defined for the {family} family")]
    UnsupportedDistribution { family: String, operation: String },

    #[error("quadrature rule failed: {0}")]
    Quadrature(#[from] RuleError),

    // Argument errors (30-39)
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    // Operation errors (40-49)
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    // Configuration errors (50-59)
    #[error("configuration error: {0}")]
    Config(#[from] ValidationError),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::Shape`].
    pub fn shape(message: impl Into<String>) -> Self {
        Error::Shape(message.into())
    }

    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::UnsupportedDistribution`].
    pub fn unsupported_distribution(
        family: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Error::UnsupportedDistribution {
            family: family.into(),
            operation: operation.into(),
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Shape errors
    /// - 20-29: Distribution errors
    /// - 30-39: Argument errors
    /// - 40-49: Operation errors
    /// - 50-59: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Shape(_) => 10,
            Error::Broadcast(_) => 11,
            Error::UnsupportedDistribution { .. } => 20,
            Error::Quadrature(_) => 21,
            Error::InvalidArgument { .. } => 30,
            Error::UnsupportedOperation(_) => 40,
            Error::Config(_) => 50,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Shape(_) | Error::Broadcast(_) => ErrorCategory::Shape,
            Error::UnsupportedDistribution { .. } | Error::Quadrature(_) => {
                ErrorCategory::Distribution
            }
            Error::InvalidArgument { .. } => ErrorCategory::Argument,
            Error::UnsupportedOperation(_) => ErrorCategory::Operation,
            Error::Config(_) => ErrorCategory::Config,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether this error is a shape mismatch of either flavour.
    pub fn is_shape(&self) -> bool {
        self.category() == ErrorCategory::Shape
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Contract violations by the caller are not: the same call fails the
    /// same way every time.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Shape(_)
            | Error::Broadcast(_)
            | Error::UnsupportedDistribution { .. }
            | Error::Quadrature(_)
            | Error::InvalidArgument { .. }
            | Error::UnsupportedOperation(_) => false,

            // Fixing or resetting the settings file resolves these
            Error::Config(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns the suggested action for agents.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Shape(_) | Error::Broadcast(_) | Error::InvalidArgument { .. } => {
                SuggestedAction::FixInput
            }
            Error::UnsupportedDistribution { .. } | Error::UnsupportedOperation(_) => {
                SuggestedAction::Abort
            }
            Error::Quadrature(_) => SuggestedAction::FixInput,
            Error::Config(_) => SuggestedAction::ResetConfig,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ResetConfig,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Shape(_) => {
                "Check that every measure in a polytope shares one batch shape with at least two entries on the leading axis."
            }
            Error::Broadcast(_) => {
                "Make parameters broadcast into the measure's batch shape, and have integrands return values broadcastable to their input."
            }
            Error::UnsupportedDistribution { .. } => {
                "Use the closed-form expectation for two-point measures, or switch to Monte Carlo."
            }
            Error::Quadrature(_) => {
                "Use fewer quadrature nodes; 20 is exact for polynomials up to degree 39."
            }
            Error::InvalidArgument { .. } => {
                "Probabilities must lie in [0, 1], spreads must be positive and finite, and node or sample counts must be positive."
            }
            Error::UnsupportedOperation(_) => {
                "Addition of sa-measures is undefined. Compute each expectation separately and combine the results outside the engine."
            }
            Error::Config(_) => {
                "Validate integration.json against schema 1.0.0, or delete it to fall back to built-in defaults."
            }
            Error::Io(_) => "Check that the settings path exists and is readable. Retry the operation.",
            Error::Json(_) => {
                "Invalid JSON in settings file. Check syntax with 'jq . integration.json'."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Shape(_) => "Shape Error",
            Error::Broadcast(_) => "Broadcast Error",
            Error::UnsupportedDistribution { .. } => "Unsupported Distribution",
            Error::Quadrature(_) => "Quadrature Failure",
            Error::InvalidArgument { .. } => "Invalid Argument",
            Error::UnsupportedOperation(_) => "Unsupported Operation",
            Error::Config(_) => "Configuration Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for agents.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., argument name, family).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::UnsupportedDistribution { family, operation } => {
                context.insert("family".to_string(), serde_json::json!(family));
                context.insert("operation".to_string(), serde_json::json!(operation));
            }
            Error::InvalidArgument { name, .. } => {
                context.insert("argument".to_string(), serde_json::json!(name));
            }
            Error::Quadrature(inner) => {
                context.insert("nodes".to_string(), serde_json::json!(inner.nodes()));
            }
            Error::Config(inner) => {
                context.insert("validation_code".to_string(), serde_json::json!(inner.code()));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
