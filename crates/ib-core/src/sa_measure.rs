//! Scale-bias measures.
//!
//! An [`SaMeasure`] pairs a base [`ProbabilityMeasure`] with an optional
//! affine post-transform. Its expectation is
//!
//! ```text
//! E_sa[f] = scale · E_base[f] + bias
//! ```
//!
//! computed elementwise over the batch. Missing `scale` means 1, missing
//! `bias` means 0. Both must broadcast into the base measure's batch shape.

use crate::integration::{quadrature_expectation, DEFAULT_NODES};
use crate::measure::ProbabilityMeasure;
use ib_common::{Error, Result};
use ib_math::Batch;
use std::fmt;

/// A probability measure with an affine transform applied to expectations.
#[derive(Debug, Clone, PartialEq)]
pub struct SaMeasure {
    base: ProbabilityMeasure,
    scale: Option<Batch>,
    bias: Option<Batch>,
}

impl SaMeasure {
    /// Untransformed measure.
    pub fn new(base: ProbabilityMeasure) -> Self {
        Self {
            base,
            scale: None,
            bias: None,
        }
    }

    /// Measure with an explicit transform.
    ///
    /// Fails with a shape error if `scale` or `bias` would grow the batch.
    pub fn with_transform(
        base: ProbabilityMeasure,
        scale: Option<Batch>,
        bias: Option<Batch>,
    ) -> Result<Self> {
        let shape = base.batch_shape();
        for (name, param) in [("scale", &scale), ("bias", &bias)] {
            if let Some(param) = param {
                if !param.broadcasts_into(shape) {
                    return Err(Error::shape(format!(
                        "{} of shape {:?} does not broadcast into batch shape {:?}",
                        name,
                        param.shape(),
                        shape
                    )));
                }
            }
        }
        Ok(Self { base, scale, bias })
    }

    pub fn base(&self) -> &ProbabilityMeasure {
        &self.base
    }

    pub fn scale(&self) -> Option<&Batch> {
        self.scale.as_ref()
    }

    pub fn bias(&self) -> Option<&Batch> {
        self.bias.as_ref()
    }

    pub fn batch_shape(&self) -> &[usize] {
        self.base.batch_shape()
    }

    /// `scale · E_base[f] + bias` with the default node count.
    pub fn expectation(&self, f: &dyn Fn(&Batch) -> Batch) -> Result<Batch> {
        self.expectation_with_nodes(f, DEFAULT_NODES)
    }

    /// Like [`SaMeasure::expectation`] with `n` quadrature nodes.
    ///
    /// `n` only matters for the continuous family; two-point measures use
    /// the closed form `p·f(1) + (1-p)·f(0)`.
    pub fn expectation_with_nodes(&self, f: &dyn Fn(&Batch) -> Batch, n: usize) -> Result<Batch> {
        let shape = self.batch_shape();
        let raw = match &self.base {
            ProbabilityMeasure::TwoPoint(m) => {
                let on_one = f(&Batch::ones(shape)).broadcast_to(shape)?;
                let on_zero = f(&Batch::zeros(shape)).broadcast_to(shape)?;
                let p = m.probs();
                p.checked_mul(&on_one)?
                    .checked_add(&(&(-p) + 1.0).checked_mul(&on_zero)?)?
            }
            ProbabilityMeasure::ContinuousBell(_) => quadrature_expectation(&self.base, f, n)?,
        };

        let mut result = raw.broadcast_to(shape)?;
        if let Some(scale) = &self.scale {
            result = result.checked_mul(scale)?;
        }
        if let Some(bias) = &self.bias {
            result = result.checked_add(bias)?;
        }
        Ok(result)
    }

    /// Entropy of the base measure. The transform is ignored.
    pub fn entropy(&self) -> Batch {
        self.base.entropy()
    }

    /// New measure with `c` added to the bias.
    pub fn add_constant(&self, c: impl Into<Batch>) -> Result<Self> {
        let c = c.into();
        let bias = match &self.bias {
            Some(bias) => bias.checked_add(&c)?,
            None => c,
        };
        Self::with_transform(self.base.clone(), self.scale.clone(), Some(bias))
    }

    /// Sa-measures cannot be added: the sum of two measures is not an
    /// sa-measure over a single base. Always fails.
    pub fn add(&self, other: &SaMeasure) -> Result<Self> {
        Err(Error::UnsupportedOperation(format!(
            "addition of sa-measures ({} + {})",
            self.base.family(),
            other.base.family()
        )))
    }

    /// New measure with scale and bias multiplied by `k`.
    pub fn multiply_scalar(&self, k: impl Into<Batch>) -> Result<Self> {
        let k = k.into();
        let scale = match &self.scale {
            Some(scale) => scale.checked_mul(&k)?,
            None => k.clone(),
        };
        let bias = self
            .bias
            .as_ref()
            .map(|bias| bias.checked_mul(&k))
            .transpose()?;
        Self::with_transform(self.base.clone(), Some(scale), bias)
    }

    /// Number of entries along the leading batch axis, `None` if unbatched.
    pub fn leading_len(&self) -> Option<usize> {
        self.batch_shape().first().copied()
    }

    /// The sa-measure at `index` along the leading batch axis.
    ///
    /// Scale and bias are sliced alongside when they carry the leading axis
    /// (a leading dimension of 1 is shared by every entry). Lower-rank
    /// parameters already broadcast into the remaining axes and are kept.
    pub fn index_axis0(&self, index: usize) -> Result<Self> {
        let rank = self.batch_shape().len();
        let slice = |param: &Option<Batch>| -> Result<Option<Batch>> {
            match param {
                Some(p) if p.ndim() == rank => {
                    let at = if p.shape()[0] == 1 { 0 } else { index };
                    Ok(Some(p.index_axis0(at)?))
                }
                other => Ok(other.clone()),
            }
        };
        Self::with_transform(
            self.base.index_axis0(index)?,
            slice(&self.scale)?,
            slice(&self.bias)?,
        )
    }
}

impl From<ProbabilityMeasure> for SaMeasure {
    fn from(base: ProbabilityMeasure) -> Self {
        SaMeasure::new(base)
    }
}

impl fmt::Display for SaMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SaMeasure({}", self.base)?;
        if let Some(scale) = &self.scale {
            write!(f, ", scale={}", scale)?;
        }
        if let Some(bias) = &self.bias {
            write!(f, ", bias={}", bias)?;
        }
        write!(f, ")")
    }
}
