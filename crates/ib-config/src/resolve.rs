//! Settings path discovery.
//!
//! Resolution order: explicit path → environment variables → XDG paths →
//! system config → defaults.

use std::path::{Path, PathBuf};

/// Where a settings file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed explicitly by the caller.
    Explicit,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/infra-bayes/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Explicit => write!(f, "explicit path"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// A resolved settings path and its source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPath {
    /// Path to integration.json (or None if not found).
    pub path: Option<PathBuf>,

    /// Source of the settings (for diagnostics).
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_SETTINGS_PATH: &str = "INFRA_BAYES_SETTINGS";
pub const ENV_CONFIG_DIR: &str = "INFRA_BAYES_CONFIG_DIR";

/// Standard settings file name.
pub const SETTINGS_FILENAME: &str = "integration.json";

/// Application name for XDG directories.
const APP_NAME: &str = "infra-bayes";

/// Resolve the settings path.
///
/// 1. Explicit path (if it exists)
/// 2. INFRA_BAYES_SETTINGS
/// 3. INFRA_BAYES_CONFIG_DIR + filename
/// 4. XDG config directory (~/.config/infra-bayes/)
/// 5. System config (/etc/infra-bayes/)
/// 6. Built-in defaults (None)
pub fn resolve_settings_path(explicit: Option<&Path>) -> SettingsPath {
    // 1. Explicit path
    if let Some(path) = explicit {
        if path.exists() {
            return SettingsPath {
                path: Some(path.to_path_buf()),
                source: ConfigSource::Explicit,
            };
        }
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_SETTINGS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return SettingsPath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SETTINGS_FILENAME);
        if path.exists() {
            return SettingsPath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return SettingsPath {
                path: Some(path),
                source: ConfigSource::XdgConfig,
            };
        }
    }

    // 5. System config
    let system_path = system_config_dir().join(SETTINGS_FILENAME);
    if system_path.exists() {
        return SettingsPath {
            path: Some(system_path),
            source: ConfigSource::SystemConfig,
        };
    }

    // 6. Built-in default
    SettingsPath::default()
}

/// Get the XDG config directory for infra-bayes.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
