//! Settings loading for the engine.
//!
//! Thin layer over `ib-config` that resolves the settings file, logs where
//! the settings came from and converts failures into [`ib_common::Error`].

pub use ib_config::{ConfigSource, IntegrationSettings, MonteCarloSettings, QuadratureSettings};

use crate::logging::{event_names, Stage};
use ib_common::Result;
use std::path::Path;

/// Resolve and load integration settings.
///
/// `explicit` wins when it names an existing file; otherwise the
/// environment, XDG and system locations are tried before the built-in
/// defaults.
pub fn load_settings(explicit: Option<&Path>) -> Result<(IntegrationSettings, ConfigSource)> {
    let (settings, source) = IntegrationSettings::load_resolved(explicit)?;
    if source == ConfigSource::BuiltinDefault {
        tracing::debug!(
            event = event_names::CONFIG_DEFAULT_USED,
            stage = %Stage::Config,
            "no settings file found, using defaults"
        );
    } else {
        tracing::debug!(
            event = event_names::CONFIG_LOADED,
            stage = %Stage::Config,
            source = %source,
            nodes = settings.quadrature.nodes,
            samples = settings.monte_carlo.samples,
            "loaded integration settings"
        );
    }
    Ok((settings, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("integration.json");
        fs::write(&path, r#"{"quadrature": {"nodes": 6}}"#).unwrap();

        let (settings, source) = load_settings(Some(path.as_path())).unwrap();
        assert_eq!(source, ConfigSource::Explicit);
        assert_eq!(settings.quadrature.nodes, 6);
    }

    #[test]
    fn invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("integration.json");
        fs::write(&path, r#"{"quadrature": {"nodes": 1000}}"#).unwrap();

        let err = load_settings(Some(path.as_path())).unwrap_err();
        assert_eq!(err.code(), 50);
        assert!(err.is_recoverable());
    }
}
