//! Integration settings (integration.json).
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "quadrature": { "nodes": 20 },
//!   "monte_carlo": { "samples": 100000, "seed": 7 }
//! }
//! ```
//!
//! Every field is optional; missing fields take the built-in defaults.

use crate::resolve::{resolve_settings_path, ConfigSource};
use crate::validate::{validate_settings, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the deterministic Gauss-Hermite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureSettings {
    /// Number of quadrature nodes.
    pub nodes: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self {
            nodes: crate::DEFAULT_QUADRATURE_NODES,
        }
    }
}

/// Settings for the Monte Carlo cross-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloSettings {
    /// Number of samples drawn per estimate.
    pub samples: usize,
    /// Fixed RNG seed; `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            samples: crate::DEFAULT_MONTE_CARLO_SAMPLES,
            seed: None,
        }
    }
}

/// Top-level integration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    pub schema_version: String,
    pub quadrature: QuadratureSettings,
    pub monte_carlo: MonteCarloSettings,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            quadrature: QuadratureSettings::default(),
            monte_carlo: MonteCarloSettings::default(),
        }
    }
}

impl IntegrationSettings {
    /// Parse and validate settings from a JSON string.
    pub fn from_json_str(json: &str) -> ValidationResult<Self> {
        let settings: IntegrationSettings =
            serde_json::from_str(json).map_err(|e| ValidationError::ParseError(e.to_string()))?;
        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Load and validate settings from a file.
    pub fn load(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ValidationError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// Resolve the settings file and load it, falling back to defaults.
    ///
    /// Returns the settings together with where they came from.
    pub fn load_resolved(explicit: Option<&Path>) -> ValidationResult<(Self, ConfigSource)> {
        let resolved = resolve_settings_path(explicit);
        match resolved.path {
            Some(path) => Ok((Self::load(&path)?, resolved.source)),
            None => Ok((Self::default(), ConfigSource::BuiltinDefault)),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Builder: override the quadrature node count.
    pub fn with_quadrature_nodes(mut self, nodes: usize) -> Self {
        self.quadrature.nodes = nodes;
        self
    }

    /// Builder: override the Monte Carlo sample count.
    pub fn with_monte_carlo_samples(mut self, samples: usize) -> Self {
        self.monte_carlo.samples = samples;
        self
    }

    /// Builder: fix the Monte Carlo seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.monte_carlo.seed = Some(seed);
        self
    }
}
