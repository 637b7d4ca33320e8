//! Infra-Bayes configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for integration.json
//! - Config resolution (explicit path → env → XDG → /etc → defaults)
//! - Semantic validation with stable error codes

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_settings_path, ConfigSource, SettingsPath};
pub use settings::{IntegrationSettings, MonteCarloSettings, QuadratureSettings};
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Node count used when no configuration overrides it.
pub const DEFAULT_QUADRATURE_NODES: usize = 20;

/// Largest accepted node count.
pub const MAX_QUADRATURE_NODES: usize = 200;

/// Sample count for the Monte Carlo oracle when not configured.
pub const DEFAULT_MONTE_CARLO_SAMPLES: usize = 100_000;
