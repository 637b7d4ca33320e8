//! Infra-Bayes math utilities.

pub mod math;

pub use math::batch::{broadcast_shapes, Batch, ShapeError};
pub use math::entropy::*;
pub use math::hermite;
pub use math::hermite::{GaussHermiteRule, RuleError};
pub use math::moments::*;
