//! Stable event names and stages for structured logging.

use serde::{Deserialize, Serialize};

/// Where in the engine an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Settings resolution and loading.
    Config,
    /// Building measures and polytopes.
    Construct,
    /// Quadrature and sampling.
    Integrate,
    /// Min/max reduction over vertices.
    Reduce,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Config => "config",
            Stage::Construct => "construct",
            Stage::Integrate => "integrate",
            Stage::Reduce => "reduce",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Construction
    pub const POLYTOPE_BUILT: &str = "polytope.built";
    pub const POLYTOPE_REJECTED: &str = "polytope.rejected";

    // Reduction
    pub const EXPECTATION_REDUCED: &str = "expectation.reduced";
    pub const ENTROPY_REDUCED: &str = "entropy.reduced";

    // Integration
    pub const QUADRATURE_RULE_BUILT: &str = "quadrature.rule_built";
    pub const MONTECARLO_SAMPLED: &str = "montecarlo.sampled";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
}
