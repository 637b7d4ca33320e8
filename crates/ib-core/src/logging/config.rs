//! Logging configuration.
//!
//! The level comes from, highest priority first: an explicit override,
//! `INFRA_BAYES_LOG`, then `RUST_LOG`. When `RUST_LOG` wins its directives
//! are handed to the filter verbatim.

/// Environment variable holding the engine's log level.
pub const ENV_LOG_LEVEL: &str = "INFRA_BAYES_LOG";

/// Environment variable holding the log format.
pub const ENV_LOG_FORMAT: &str = "INFRA_BAYES_LOG_FORMAT";

const ENV_RUST_LOG: &str = "RUST_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Some(LogFormat::Human),
            "jsonl" | "json" => Some(LogFormat::Jsonl),
            _ => None,
        }
    }
}

/// Minimum level for `ib_core` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Per-reduction events.
    Trace,
    /// Construction and rule-building events.
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
    }
}

/// Where the effective filter came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LevelSource {
    #[default]
    Default,
    /// `RUST_LOG` directives, kept verbatim.
    RustLog(String),
    /// `INFRA_BAYES_LOG`.
    Variable,
    /// Set by the embedding application.
    Explicit,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    pub source: LevelSource,
    /// Timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            source: LevelSource::Default,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Config from the process environment, then explicit overrides.
    pub fn from_env(level: Option<LogLevel>, format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), level, format)
    }

    /// Same as [`LogConfig::from_env`] with a caller-supplied variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        level: Option<LogLevel>,
        format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        if let Some(parsed) = lookup(ENV_LOG_LEVEL).as_deref().and_then(LogLevel::parse) {
            config.level = parsed;
            config.source = LevelSource::Variable;
        } else if let Some(directives) = lookup(ENV_RUST_LOG).filter(|d| !d.trim().is_empty()) {
            config.source = LevelSource::RustLog(directives);
        }

        if let Some(parsed) = lookup(ENV_LOG_FORMAT).as_deref().and_then(LogFormat::parse) {
            config.format = parsed;
        }

        if let Some(level) = level {
            config = config.with_level(level);
        }
        if let Some(format) = format {
            config.format = format;
        }
        config
    }

    /// Explicit level; replaces anything read from the environment.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self.source = LevelSource::Explicit;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// `EnvFilter` directives: raw `RUST_LOG` when it was the source,
    /// otherwise `ib_core=<level>`.
    pub fn filter_directive(&self) -> String {
        match &self.source {
            LevelSource::RustLog(directives) => directives.clone(),
            _ => self.crate_directive(),
        }
    }

    /// `ib_core=<level>`, ignoring `RUST_LOG`.
    pub fn crate_directive(&self) -> String {
        format!("ib_core={}", self.level.as_str())
    }
}
