//! Structured logging for the integration engine.
//!
//! The engine only emits `tracing` events; nothing is printed unless the
//! embedding application installs a subscriber. [`init_logging`] installs
//! one writing to stderr, either human-readable or as JSON lines.
//!
//! ```ignore
//! use ib_core::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! ```

pub mod config;
pub mod events;

pub use config::{LevelSource, LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Stage};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a global subscriber for `config`.
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = env_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
                    .is_ok()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
                    .is_ok()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
    }
}

/// Filter for `config`. Malformed `RUST_LOG` directives fall back to the
/// configured level for `ib_core`.
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_new(config.filter_directive())
        .unwrap_or_else(|_| EnvFilter::new(config.crate_directive()))
}

/// Initialize logging from the environment (for tests and simple cases).
pub fn init_default_logging() -> bool {
    init_logging(&LogConfig::from_env(None, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Info);
    }

    #[test]
    fn test_filter_follows_own_variable_over_rust_log() {
        let config = LogConfig::from_lookup(
            |key| match key {
                "INFRA_BAYES_LOG" => Some("error".to_string()),
                "RUST_LOG" => Some("trace".to_string()),
                _ => None,
            },
            None,
            None,
        );
        assert_eq!(env_filter(&config).max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn test_malformed_rust_log_falls_back() {
        let config = LogConfig {
            source: LevelSource::RustLog("ib_core=loud".to_string()),
            ..LogConfig::default()
        };
        assert_eq!(env_filter(&config).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_second_init_is_refused() {
        let config = LogConfig::default().with_level(LogLevel::Error);
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }
}
