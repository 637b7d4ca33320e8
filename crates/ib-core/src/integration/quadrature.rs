//! Gauss-Hermite expectation for continuous measures.

use crate::logging::{event_names, Stage};
use crate::measure::{Family, ProbabilityMeasure};
use ib_common::{Error, Result};
use ib_math::{Batch, GaussHermiteRule};
use std::borrow::Cow;
use std::f64::consts::SQRT_2;
use std::num::NonZeroUsize;
use std::sync::OnceLock;

/// Node count used when none is configured.
pub const DEFAULT_NODES: usize = ib_config::DEFAULT_QUADRATURE_NODES;

/// Largest accepted node count, shared with settings validation.
pub const MAX_NODES: usize = ib_config::MAX_QUADRATURE_NODES;

static DEFAULT_RULE: OnceLock<GaussHermiteRule> = OnceLock::new();

/// The default-size rule, computed once per process.
pub fn default_rule() -> Result<&'static GaussHermiteRule> {
    if let Some(rule) = DEFAULT_RULE.get() {
        return Ok(rule);
    }
    let rule = build_rule(NonZeroUsize::new(DEFAULT_NODES).unwrap_or(NonZeroUsize::MIN))?;
    Ok(DEFAULT_RULE.get_or_init(|| rule))
}

/// Rule with `n` nodes, `1 <= n <= MAX_NODES`. The default size is served
/// from the cache.
pub fn hermite_rule(n: usize) -> Result<Cow<'static, GaussHermiteRule>> {
    let n = checked_node_count(n)?;
    if n.get() == DEFAULT_NODES {
        return Ok(Cow::Borrowed(default_rule()?));
    }
    Ok(Cow::Owned(build_rule(n)?))
}

/// Validate a requested node count.
pub fn checked_node_count(n: usize) -> Result<NonZeroUsize> {
    match NonZeroUsize::new(n) {
        Some(n) if n.get() <= MAX_NODES => Ok(n),
        _ => Err(Error::invalid_argument(
            "n",
            format!("quadrature nodes must be in 1..={}, got {}", MAX_NODES, n),
        )),
    }
}

fn build_rule(n: NonZeroUsize) -> Result<GaussHermiteRule> {
    let rule = GaussHermiteRule::new(n)?;
    tracing::debug!(
        event = event_names::QUADRATURE_RULE_BUILT,
        stage = %Stage::Integrate,
        nodes = n.get(),
        weight_total = rule.weight_total(),
        "built Gauss-Hermite rule"
    );
    Ok(rule)
}

/// `E[f(X)]` for a continuous measure using an `n`-node Gauss-Hermite rule.
///
/// `f` is called once with a batch of shape `[n, *batch_shape]` holding the
/// mapped nodes `mean + √2·std·z`; its output is broadcast back to that
/// shape and contracted against the normalized weights. The result has the
/// measure's batch shape. Exact for polynomials of degree up to `2n - 1`.
pub fn quadrature_expectation(
    measure: &ProbabilityMeasure,
    f: &dyn Fn(&Batch) -> Batch,
    n: usize,
) -> Result<Batch> {
    let bell = match measure {
        ProbabilityMeasure::ContinuousBell(bell) => bell,
        ProbabilityMeasure::TwoPoint(_) => {
            return Err(Error::unsupported_distribution(
                Family::TwoPoint.as_str(),
                "quadrature",
            ))
        }
    };
    let rule = hermite_rule(n)?;

    let spread = bell.std() * SQRT_2;
    let points = rule
        .nodes()
        .iter()
        .map(|&z| bell.mean().checked_add(&(&spread * z)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let points = Batch::stack(&points)?;

    let values = f(&points).broadcast_to(points.shape())?;
    Ok(values.weighted_sum_axis0(&rule.normalized_weights())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ib_math::gaussian_raw_moment;

    fn standard() -> ProbabilityMeasure {
        ProbabilityMeasure::continuous_bell(0.0, 1.0).unwrap()
    }

    #[test]
    fn default_rule_is_cached() {
        let a = default_rule().unwrap() as *const GaussHermiteRule;
        let b = default_rule().unwrap() as *const GaussHermiteRule;
        assert_eq!(a, b);
        assert_eq!(default_rule().unwrap().len(), DEFAULT_NODES);
        assert!(matches!(hermite_rule(DEFAULT_NODES).unwrap(), Cow::Borrowed(_)));
        assert!(matches!(hermite_rule(5).unwrap(), Cow::Owned(_)));
    }

    #[test]
    fn zero_nodes_is_invalid_argument() {
        let err = quadrature_expectation(&standard(), &|x| x.clone(), 0).unwrap_err();
        assert_eq!(err.code(), 30);
    }

    #[test]
    fn node_count_above_cap_is_invalid_argument() {
        assert!(hermite_rule(MAX_NODES).is_ok());
        let err = hermite_rule(MAX_NODES + 1).unwrap_err();
        assert_eq!(err.code(), 30);
        let err = quadrature_expectation(&standard(), &|x| x.clone(), MAX_NODES + 1).unwrap_err();
        assert_eq!(err.code(), 30);
    }

    #[test]
    fn largest_rule_integrates_polynomials() {
        let m = ProbabilityMeasure::continuous_bell(vec![0.0, 1.0], 1.0).unwrap();
        let out = quadrature_expectation(&m, &|x| x.powi(2), MAX_NODES).unwrap();
        assert!((out.as_slice()[0] - 1.0).abs() < 1e-9);
        assert!((out.as_slice()[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn two_point_is_unsupported() {
        let m = ProbabilityMeasure::two_point(0.5).unwrap();
        let err = quadrature_expectation(&m, &|x| x.clone(), 10).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDistribution { .. }));
    }

    #[test]
    fn second_moment_of_standard_normal() {
        let out = quadrature_expectation(&standard(), &|x| x.powi(2), DEFAULT_NODES).unwrap();
        assert!(out.is_scalar());
        assert!((out.item().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_integrand_broadcasts() {
        let m = ProbabilityMeasure::continuous_bell(vec![0.0, 5.0], 2.0).unwrap();
        let out = quadrature_expectation(&m, &|_| Batch::scalar(3.0), 4).unwrap();
        assert_eq!(out.shape(), &[2]);
        for v in out.iter() {
            assert!((v - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn batched_moments_match_closed_form() {
        let means = [-1.0, 0.0, 2.0];
        let stds = [0.1, 1.0, 3.0];
        let m = ProbabilityMeasure::continuous_bell(means.to_vec(), stds.to_vec()).unwrap();
        let out = quadrature_expectation(&m, &|x| x.powi(3), 2).unwrap();
        for i in 0..3 {
            let expected = gaussian_raw_moment(means[i], stds[i], 3);
            assert!((out.as_slice()[i] - expected).abs() < 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn integrand_with_wrong_shape_is_shape_error() {
        let m = ProbabilityMeasure::continuous_bell(vec![0.0, 1.0], 1.0).unwrap();
        let err = quadrature_expectation(&m, &|_| Batch::from_vec(vec![1.0, 2.0, 3.0]), 3)
            .unwrap_err();
        assert!(err.is_shape());
    }
}
