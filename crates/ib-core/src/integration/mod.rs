//! Numeric integration of expectations.
//!
//! [`quadrature`] is the deterministic Gauss-Hermite path used for every
//! continuous measure. [`monte_carlo`] is an independent sampling estimator
//! kept as a test oracle; decisions never go through it.

pub mod monte_carlo;
pub mod quadrature;

pub use monte_carlo::{
    monte_carlo_expectation, monte_carlo_expectation_seeded, monte_carlo_with_settings,
};
pub use quadrature::{
    checked_node_count, default_rule, hermite_rule, quadrature_expectation, DEFAULT_NODES,
    MAX_NODES,
};

