//! Infra-Bayes core library.
//!
//! Robust expected values under Knightian uncertainty:
//! - Batched base measures (two-point and continuous bell-shaped)
//! - Scale-bias measures with closed-form or quadrature expectations
//! - Credal polytopes reducing vertex expectations by minimum
//! - Gauss-Hermite and Monte Carlo integration
//! - Settings resolution and structured logging
//!
//! ```
//! use ib_core::{InfraDistribution, InfraPolytope, ProbabilityMeasure};
//!
//! let accuracy = ProbabilityMeasure::two_point(vec![0.8, 0.9, 0.95])?;
//! let polytope = InfraPolytope::from_measure(accuracy)?;
//! let worst = polytope.expectation(&|x| x * 1_000_000.0)?;
//! assert_eq!(worst.item(), Some(800_000.0));
//! # Ok::<(), ib_core::Error>(())
//! ```

pub mod config;
pub mod infra;
pub mod integration;
pub mod logging;
pub mod measure;
pub mod sa_measure;

pub use ib_common::{Error, Result};
pub use ib_math::Batch;
pub use infra::{InfraDistribution, InfraPolytope};
pub use measure::{ContinuousBell, Family, ProbabilityMeasure, TwoPoint};
pub use sa_measure::SaMeasure;
