//! Batched `f64` arrays with numpy-style broadcasting.
//!
//! A [`Batch`] wraps an `ndarray::ArrayD<f64>` in standard (row-major)
//! layout. Rank 0 is a scalar. The leading axis is the batch axis: measures
//! carry one parameter per entry and reductions over measures run along
//! axis 0.
//!
//! # Broadcasting
//!
//! Two shapes are compatible when, aligned from the right, every pair of
//! dimensions is equal or one of them is 1. Missing leading dimensions count
//! as 1:
//!
//! ```text
//! [3, 4] with [4]    -> [3, 4]
//! [3, 1] with [1, 4] -> [3, 4]
//! [3]    with [4]    -> error
//! ```
//!
//! `ndarray` panics on incompatible operands; every fallible operation here
//! checks shapes first and reports a [`ShapeError`] instead.

use ndarray::{Array1, ArrayD, ArrayViewD, Axis, IxDyn, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use thiserror::Error;

/// Shape failures raised by batch operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shapes {left:?} and {right:?} are not broadcast-compatible")]
    Incompatible { left: Vec<usize>, right: Vec<usize> },

    #[error("shape {shape:?} holds {expected} elements, got {actual}")]
    Length {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("index {index} out of range for axis 0 of shape {shape:?}")]
    AxisIndex { index: usize, shape: Vec<usize> },

    #[error("cannot stack an empty sequence of batches")]
    EmptyStack,
}

impl ShapeError {
    fn incompatible(left: &[usize], right: &[usize]) -> Self {
        ShapeError::Incompatible {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }
}

/// Broadcast two shapes against each other.
pub fn broadcast_shapes(left: &[usize], right: &[usize]) -> Result<Vec<usize>, ShapeError> {
    let rank = left.len().max(right.len());
    let pad = |shape: &[usize], axis: usize| {
        let offset = rank - shape.len();
        if axis < offset {
            1
        } else {
            shape[axis - offset]
        }
    };
    (0..rank)
        .map(|axis| match (pad(left, axis), pad(right, axis)) {
            (a, b) if a == b => Ok(a),
            (1, b) => Ok(b),
            (a, 1) => Ok(a),
            _ => Err(ShapeError::incompatible(left, right)),
        })
        .collect()
}

/// Row-major n-dimensional array of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    data: ArrayD<f64>,
}

impl Batch {
    /// Rank-0 batch holding a single value.
    pub fn scalar(value: f64) -> Self {
        Self::full(&[], value)
    }

    /// One-dimensional batch.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            data: Array1::from_vec(data).into_dyn(),
        }
    }

    /// Batch with an explicit shape.
    ///
    /// Fails when `data` does not hold exactly `product(shape)` elements.
    pub fn from_shape_vec(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, ShapeError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ShapeError::Length {
                shape,
                expected,
                actual: data.len(),
            });
        }
        ArrayD::from_shape_vec(IxDyn(&shape), data)
            .map(Self::from)
            .map_err(|_| ShapeError::incompatible(&shape, &[expected]))
    }

    /// Batch of the given shape filled with `value`.
    pub fn full(shape: &[usize], value: f64) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, 0.0)
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, 1.0)
    }

    /// `n` evenly spaced values from `start` to `end` inclusive.
    pub fn linspace(start: f64, end: f64, n: usize) -> Self {
        Self {
            data: Array1::linspace(start, end, n).into_dyn(),
        }
    }

    /// The underlying array.
    pub fn as_array(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.data.ndim() == 0
    }

    /// Elements in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        // Every constructor yields standard layout.
        self.data.as_slice().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.data.iter()
    }

    /// The single value of a one-element batch.
    pub fn item(&self) -> Option<f64> {
        match self.as_slice() {
            [value] => Some(*value),
            _ => None,
        }
    }

    /// Length of the leading axis, `None` for scalars.
    pub fn axis0_len(&self) -> Option<usize> {
        self.shape().first().copied()
    }

    /// Apply `f` to every element.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from(self.data.mapv(f))
    }

    pub fn powi(&self, exponent: i32) -> Self {
        self.map(|v| v.powi(exponent))
    }

    /// Combine two batches elementwise after broadcasting them together.
    pub fn zip_with(
        &self,
        other: &Batch,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Self, ShapeError> {
        let shape = broadcast_shapes(self.shape(), other.shape())?;
        let left = self.view_as(&shape)?;
        let right = other.view_as(&shape)?;
        Ok(Self::from(
            Zip::from(left).and(right).map_collect(|&a, &b| f(a, b)),
        ))
    }

    pub fn checked_add(&self, other: &Batch) -> Result<Self, ShapeError> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn checked_sub(&self, other: &Batch) -> Result<Self, ShapeError> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn checked_mul(&self, other: &Batch) -> Result<Self, ShapeError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Elementwise minimum. NaN in either operand yields NaN.
    pub fn elementwise_min(&self, other: &Batch) -> Result<Self, ShapeError> {
        self.zip_with(other, |a, b| if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) })
    }

    /// Elementwise maximum. NaN in either operand yields NaN.
    pub fn elementwise_max(&self, other: &Batch) -> Result<Self, ShapeError> {
        self.zip_with(other, |a, b| if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) })
    }

    /// Broadcast to exactly `shape`.
    ///
    /// Fails if `shape` is not the broadcast of itself with `self.shape()`.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self, ShapeError> {
        self.view_as(shape).map(|view| Self::from(view.to_owned()))
    }

    /// Whether `self` broadcasts into `shape` without growing it.
    pub fn broadcasts_into(&self, shape: &[usize]) -> bool {
        self.data.broadcast(IxDyn(shape)).is_some()
    }

    /// Sub-batch at `index` along axis 0.
    pub fn index_axis0(&self, index: usize) -> Result<Self, ShapeError> {
        match self.axis0_len() {
            Some(outer) if index < outer => {
                Ok(Self::from(self.data.index_axis(Axis(0), index).to_owned()))
            }
            _ => Err(ShapeError::AxisIndex {
                index,
                shape: self.shape().to_vec(),
            }),
        }
    }

    /// Stack equally-shaped batches along a new leading axis.
    pub fn stack(parts: &[Batch]) -> Result<Self, ShapeError> {
        let Some(first) = parts.first() else {
            return Err(ShapeError::EmptyStack);
        };
        if let Some(odd) = parts.iter().find(|p| p.shape() != first.shape()) {
            return Err(ShapeError::incompatible(first.shape(), odd.shape()));
        }
        let views: Vec<ArrayViewD<'_, f64>> = parts.iter().map(|p| p.data.view()).collect();
        ndarray::stack(Axis(0), &views)
            .map(Self::from)
            .map_err(|_| ShapeError::incompatible(first.shape(), &[parts.len()]))
    }

    /// Contract axis 0 against `weights`: `out[j] = sum_i weights[i] * self[i, j]`.
    pub fn weighted_sum_axis0(&self, weights: &[f64]) -> Result<Self, ShapeError> {
        if self.axis0_len() != Some(weights.len()) {
            return Err(ShapeError::incompatible(self.shape(), &[weights.len()]));
        }
        let mut out = ArrayD::<f64>::zeros(IxDyn(&self.shape()[1..]));
        for (row, &w) in self.data.axis_iter(Axis(0)).zip(weights) {
            out.scaled_add(w, &row);
        }
        Ok(Self::from(out))
    }

    /// Arithmetic mean along axis 0.
    pub fn mean_axis0(&self) -> Result<Self, ShapeError> {
        let empty = || ShapeError::AxisIndex {
            index: 0,
            shape: self.shape().to_vec(),
        };
        if self.is_scalar() {
            return Err(empty());
        }
        self.data
            .mean_axis(Axis(0))
            .map(Self::from)
            .ok_or_else(empty)
    }

    /// Largest absolute elementwise difference after broadcasting.
    pub fn max_abs_diff(&self, other: &Batch) -> Result<f64, ShapeError> {
        let diff = self.zip_with(other, |a, b| (a - b).abs())?;
        Ok(diff.data.fold(0.0, |acc, &v| acc.max(v)))
    }

    /// View broadcast to exactly `shape`.
    fn view_as(&self, shape: &[usize]) -> Result<ArrayViewD<'_, f64>, ShapeError> {
        self.data
            .broadcast(IxDyn(shape))
            .ok_or_else(|| ShapeError::incompatible(self.shape(), shape))
    }
}

impl From<ArrayD<f64>> for Batch {
    fn from(data: ArrayD<f64>) -> Self {
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Self { data }
    }
}

impl From<f64> for Batch {
    fn from(value: f64) -> Self {
        Batch::scalar(value)
    }
}

impl From<Vec<f64>> for Batch {
    fn from(data: Vec<f64>) -> Self {
        Batch::from_vec(data)
    }
}

impl From<&[f64]> for Batch {
    fn from(data: &[f64]) -> Self {
        Batch::from_vec(data.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Batch {
    fn from(data: [f64; N]) -> Self {
        Batch::from_vec(data.to_vec())
    }
}

impl Add<f64> for &Batch {
    type Output = Batch;

    fn add(self, rhs: f64) -> Batch {
        self.map(|v| v + rhs)
    }
}

impl Sub<f64> for &Batch {
    type Output = Batch;

    fn sub(self, rhs: f64) -> Batch {
        self.map(|v| v - rhs)
    }
}

impl Mul<f64> for &Batch {
    type Output = Batch;

    fn mul(self, rhs: f64) -> Batch {
        self.map(|v| v * rhs)
    }
}

impl Neg for &Batch {
    type Output = Batch;

    fn neg(self) -> Batch {
        self.map(|v| -v)
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (true, Some(value)) = (self.is_scalar(), self.item()) {
            return write!(f, "{value}");
        }
        write!(f, "[")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "] shape={:?}", self.shape())
    }
}
