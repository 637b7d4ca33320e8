//! Base probability measures.
//!
//! Two families are supported, both batched: every parameter is a [`Batch`]
//! and the measure describes one independent random variable per element.
//!
//! - [`TwoPoint`]: takes value 1 with probability `p`, else 0.
//! - [`ContinuousBell`]: normal with the given mean and standard deviation.
//!
//! Parameters are validated on construction and never change afterwards.

use ib_common::{Error, Result};
use ib_math::{binary_entropy, broadcast_shapes, gaussian_entropy, Batch};
use std::fmt;

/// Family tag, used in errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    TwoPoint,
    ContinuousBell,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::TwoPoint => "two_point",
            Family::ContinuousBell => "continuous_bell",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bernoulli measure on `{0, 1}` with success probabilities `probs`.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPoint {
    probs: Batch,
}

impl TwoPoint {
    /// Every probability must be finite and lie in `[0, 1]`.
    pub fn new(probs: impl Into<Batch>) -> Result<Self> {
        let probs = probs.into();
        if let Some(bad) = probs.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(Error::invalid_argument(
                "probs",
                format!("probabilities must lie in [0, 1], got {}", bad),
            ));
        }
        Ok(Self { probs })
    }

    pub fn probs(&self) -> &Batch {
        &self.probs
    }

    pub fn batch_shape(&self) -> &[usize] {
        self.probs.shape()
    }

    /// Binary entropy per element, in nats.
    pub fn entropy(&self) -> Batch {
        self.probs.map(binary_entropy)
    }

    fn index_axis0(&self, index: usize) -> Result<Self> {
        Ok(Self {
            probs: self.probs.index_axis0(index)?,
        })
    }
}

/// Normal measure `N(mean, std²)`.
///
/// `mean` and `std` are stored broadcast to their common shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousBell {
    mean: Batch,
    std: Batch,
}

impl ContinuousBell {
    /// Means must be finite; standard deviations finite and positive.
    pub fn new(mean: impl Into<Batch>, std: impl Into<Batch>) -> Result<Self> {
        let mean = mean.into();
        let std = std.into();

        if let Some(bad) = mean.iter().find(|m| !m.is_finite()) {
            return Err(Error::invalid_argument(
                "mean",
                format!("mean must be finite, got {}", bad),
            ));
        }
        if let Some(bad) = std.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(Error::invalid_argument(
                "std",
                format!("standard deviation must be positive and finite, got {}", bad),
            ));
        }

        let shape = broadcast_shapes(mean.shape(), std.shape())?;
        Ok(Self {
            mean: mean.broadcast_to(&shape)?,
            std: std.broadcast_to(&shape)?,
        })
    }

    /// Standard normal, unbatched.
    pub fn standard() -> Self {
        Self {
            mean: Batch::scalar(0.0),
            std: Batch::scalar(1.0),
        }
    }

    pub fn mean(&self) -> &Batch {
        &self.mean
    }

    pub fn std(&self) -> &Batch {
        &self.std
    }

    pub fn batch_shape(&self) -> &[usize] {
        self.mean.shape()
    }

    /// Differential entropy per element, in nats.
    pub fn entropy(&self) -> Batch {
        self.std.map(gaussian_entropy)
    }

    fn index_axis0(&self, index: usize) -> Result<Self> {
        Ok(Self {
            mean: self.mean.index_axis0(index)?,
            std: self.std.index_axis0(index)?,
        })
    }
}

/// A batched probability measure from one of the supported families.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbabilityMeasure {
    TwoPoint(TwoPoint),
    ContinuousBell(ContinuousBell),
}

impl ProbabilityMeasure {
    /// Validated [`TwoPoint`] measure.
    pub fn two_point(probs: impl Into<Batch>) -> Result<Self> {
        TwoPoint::new(probs).map(ProbabilityMeasure::TwoPoint)
    }

    /// Validated [`ContinuousBell`] measure.
    pub fn continuous_bell(mean: impl Into<Batch>, std: impl Into<Batch>) -> Result<Self> {
        ContinuousBell::new(mean, std).map(ProbabilityMeasure::ContinuousBell)
    }

    pub fn family(&self) -> Family {
        match self {
            ProbabilityMeasure::TwoPoint(_) => Family::TwoPoint,
            ProbabilityMeasure::ContinuousBell(_) => Family::ContinuousBell,
        }
    }

    /// Shape of the batch of independent variables.
    pub fn batch_shape(&self) -> &[usize] {
        match self {
            ProbabilityMeasure::TwoPoint(m) => m.batch_shape(),
            ProbabilityMeasure::ContinuousBell(m) => m.batch_shape(),
        }
    }

    pub fn entropy(&self) -> Batch {
        match self {
            ProbabilityMeasure::TwoPoint(m) => m.entropy(),
            ProbabilityMeasure::ContinuousBell(m) => m.entropy(),
        }
    }

    /// The measure at `index` along the leading batch axis.
    pub fn index_axis0(&self, index: usize) -> Result<Self> {
        match self {
            ProbabilityMeasure::TwoPoint(m) => m.index_axis0(index).map(Self::TwoPoint),
            ProbabilityMeasure::ContinuousBell(m) => {
                m.index_axis0(index).map(Self::ContinuousBell)
            }
        }
    }
}

impl From<TwoPoint> for ProbabilityMeasure {
    fn from(m: TwoPoint) -> Self {
        ProbabilityMeasure::TwoPoint(m)
    }
}

impl From<ContinuousBell> for ProbabilityMeasure {
    fn from(m: ContinuousBell) -> Self {
        ProbabilityMeasure::ContinuousBell(m)
    }
}

impl fmt::Display for ProbabilityMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbabilityMeasure::TwoPoint(m) => write!(f, "TwoPoint(p={})", m.probs),
            ProbabilityMeasure::ContinuousBell(m) => {
                write!(f, "ContinuousBell(mean={}, std={})", m.mean, m.std)
            }
        }
    }
}
