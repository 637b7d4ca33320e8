//! Credal sets given by their extreme points.
//!
//! Expectation is linear in the sa-measure, so its infimum over the convex
//! hull of the vertices is attained at a vertex: the elementwise minimum of
//! vertex expectations is exact, not an approximation.

use super::InfraDistribution;
use crate::integration::{checked_node_count, DEFAULT_NODES};
use crate::logging::{event_names, Stage};
use crate::measure::ProbabilityMeasure;
use crate::sa_measure::SaMeasure;
use ib_common::{Error, Result};
use ib_config::IntegrationSettings;
use ib_math::Batch;
use std::fmt;

/// A finite set of equally-shaped sa-measures spanning a credal polytope.
#[derive(Debug, Clone, PartialEq)]
pub struct InfraPolytope {
    vertices: Vec<SaMeasure>,
    quadrature_nodes: usize,
}

impl InfraPolytope {
    /// Polytope whose vertices are the entries of a batched measure.
    pub fn from_measure(measure: ProbabilityMeasure) -> Result<Self> {
        Self::from_sa_measure(SaMeasure::new(measure))
    }

    /// Polytope whose vertices are the entries of a batched sa-measure.
    ///
    /// The leading batch axis indexes vertices; each vertex keeps the
    /// remaining axes.
    pub fn from_sa_measure(measure: SaMeasure) -> Result<Self> {
        let Some(count) = measure.leading_len() else {
            return Err(rejected(
                "cannot build a polytope from an unbatched measure".to_string(),
            ));
        };
        check_vertex_count(count)?;
        let vertices = (0..count)
            .map(|i| measure.index_axis0(i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::built(vertices))
    }

    /// Polytope from explicit vertices, which must share one batch shape.
    pub fn from_vertices(vertices: Vec<SaMeasure>) -> Result<Self> {
        check_vertex_count(vertices.len())?;
        let shape = vertices[0].batch_shape();
        if let Some(odd) = vertices.iter().find(|v| v.batch_shape() != shape) {
            return Err(rejected(format!(
                "vertices must share one batch shape, got {:?} and {:?}",
                shape,
                odd.batch_shape()
            )));
        }
        Ok(Self::built(vertices))
    }

    fn built(vertices: Vec<SaMeasure>) -> Self {
        tracing::debug!(
            event = event_names::POLYTOPE_BUILT,
            stage = %Stage::Construct,
            vertices = vertices.len(),
            family = %vertices[0].base().family(),
            shape = ?vertices[0].batch_shape(),
            "built infra-polytope"
        );
        Self {
            vertices,
            quadrature_nodes: DEFAULT_NODES,
        }
    }

    /// Same polytope integrated with `n` quadrature nodes, `1 <= n <= MAX_NODES`.
    pub fn with_quadrature_nodes(mut self, n: usize) -> Result<Self> {
        self.quadrature_nodes = checked_node_count(n)?.get();
        Ok(self)
    }

    /// Same polytope integrated as `settings` prescribe.
    pub fn with_settings(self, settings: &IntegrationSettings) -> Result<Self> {
        ib_config::validate_settings(settings)?;
        self.with_quadrature_nodes(settings.quadrature.nodes)
    }

    pub fn vertices(&self) -> &[SaMeasure] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn batch_size(&self) -> usize {
        self.vertices.len()
    }

    /// Batch shape carried by every vertex.
    pub fn vertex_shape(&self) -> &[usize] {
        self.vertices[0].batch_shape()
    }

    pub fn quadrature_nodes(&self) -> usize {
        self.quadrature_nodes
    }

    /// Expectation of `f` under each vertex, in vertex order.
    pub fn vertex_expectations(&self, f: &dyn Fn(&Batch) -> Batch) -> Result<Vec<Batch>> {
        self.vertices
            .iter()
            .map(|v| v.expectation_with_nodes(f, self.quadrature_nodes))
            .collect()
    }

    /// Polytope with every vertex scaled by `k`.
    pub fn multiply_scalar(&self, k: impl Into<Batch>) -> Result<Self> {
        let k = k.into();
        self.map_vertices(|v| v.multiply_scalar(k.clone()))
    }

    /// Polytope with `c` added to every vertex.
    pub fn add_constant(&self, c: impl Into<Batch>) -> Result<Self> {
        let c = c.into();
        self.map_vertices(|v| v.add_constant(c.clone()))
    }

    fn map_vertices(&self, op: impl Fn(&SaMeasure) -> Result<SaMeasure>) -> Result<Self> {
        let vertices = self.vertices.iter().map(op).collect::<Result<Vec<_>>>()?;
        Ok(Self {
            vertices,
            quadrature_nodes: self.quadrature_nodes,
        })
    }
}

fn check_vertex_count(count: usize) -> Result<()> {
    if count < 2 {
        return Err(rejected(format!(
            "a polytope needs at least two vertices, got {}",
            count
        )));
    }
    Ok(())
}

fn rejected(reason: String) -> Error {
    tracing::debug!(
        event = event_names::POLYTOPE_REJECTED,
        stage = %Stage::Construct,
        reason = %reason,
        "rejected infra-polytope"
    );
    Error::Shape(reason)
}

/// Elementwise reduction of per-vertex batches.
fn reduce(
    parts: Vec<Batch>,
    op: impl Fn(&Batch, &Batch) -> std::result::Result<Batch, ib_math::ShapeError>,
) -> Result<Batch> {
    let mut parts = parts.into_iter();
    let first = parts
        .next()
        .ok_or_else(|| Error::shape("cannot reduce over zero vertices"))?;
    Ok(parts.try_fold(first, |acc, next| op(&acc, &next))?)
}

impl InfraDistribution for InfraPolytope {
    /// Elementwise minimum of vertex expectations. NaN in any vertex yields
    /// NaN at that position.
    fn expectation(&self, f: &dyn Fn(&Batch) -> Batch) -> Result<Batch> {
        let worst = reduce(self.vertex_expectations(f)?, Batch::elementwise_min)?;
        tracing::trace!(
            event = event_names::EXPECTATION_REDUCED,
            stage = %Stage::Reduce,
            vertices = self.vertices.len(),
            nodes = self.quadrature_nodes,
            "reduced expectation by minimum"
        );
        Ok(worst)
    }

    /// Elementwise maximum of vertex base entropies.
    fn entropy(&self) -> Result<Batch> {
        let entropies = self.vertices.iter().map(SaMeasure::entropy).collect();
        let best = reduce(entropies, Batch::elementwise_max)?;
        tracing::trace!(
            event = event_names::ENTROPY_REDUCED,
            stage = %Stage::Reduce,
            vertices = self.vertices.len(),
            "reduced entropy by maximum"
        );
        Ok(best)
    }
}

impl TryFrom<ProbabilityMeasure> for InfraPolytope {
    type Error = Error;

    fn try_from(measure: ProbabilityMeasure) -> Result<Self> {
        Self::from_measure(measure)
    }
}

impl TryFrom<SaMeasure> for InfraPolytope {
    type Error = Error;

    fn try_from(measure: SaMeasure) -> Result<Self> {
        Self::from_sa_measure(measure)
    }
}

impl TryFrom<Vec<SaMeasure>> for InfraPolytope {
    type Error = Error;

    fn try_from(vertices: Vec<SaMeasure>) -> Result<Self> {
        Self::from_vertices(vertices)
    }
}

impl fmt::Display for InfraPolytope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "InfraPolytope({} vertices, shape={:?}, nodes={})",
            self.vertices.len(),
            self.vertex_shape(),
            self.quadrature_nodes
        )?;
        for (i, v) in self.vertices.iter().enumerate() {
            writeln!(f, "  [{}] {}", i, v)?;
        }
        Ok(())
    }
}
