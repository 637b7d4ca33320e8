//! Infra-distributions: convex sets of sa-measures.
//!
//! Decisions under Knightian uncertainty evaluate a function against every
//! measure in a credal set and keep the worst case. [`InfraDistribution`] is
//! that capability; [`InfraPolytope`] represents the set by its extreme
//! points, and a bare [`SaMeasure`] is the one-point set.

pub mod polytope;

pub use polytope::InfraPolytope;

use crate::sa_measure::SaMeasure;
use ib_common::Result;
use ib_math::Batch;

/// A convex set of sa-measures.
///
/// Object safe, so heterogeneous sets can sit behind `&dyn InfraDistribution`.
pub trait InfraDistribution {
    /// Infimum of the expectation of `f` over the set, elementwise.
    fn expectation(&self, f: &dyn Fn(&Batch) -> Batch) -> Result<Batch>;

    /// Supremum of entropy over the set, elementwise.
    fn entropy(&self) -> Result<Batch>;
}

impl InfraDistribution for SaMeasure {
    fn expectation(&self, f: &dyn Fn(&Batch) -> Batch) -> Result<Batch> {
        SaMeasure::expectation(self, f)
    }

    fn entropy(&self) -> Result<Batch> {
        Ok(SaMeasure::entropy(self))
    }
}

impl<T: InfraDistribution + ?Sized> InfraDistribution for Box<T> {
    fn expectation(&self, f: &dyn Fn(&Batch) -> Batch) -> Result<Batch> {
        (**self).expectation(f)
    }

    fn entropy(&self) -> Result<Batch> {
        (**self).entropy()
    }
}
