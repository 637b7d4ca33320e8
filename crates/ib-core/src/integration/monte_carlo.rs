//! Sampling estimator for expectations.
//!
//! Works for both families. Used to cross-check quadrature in tests; the
//! estimate carries `O(1/√n)` noise.

use crate::logging::{event_names, Stage};
use crate::measure::ProbabilityMeasure;
use ib_common::{Error, Result};
use ib_config::MonteCarloSettings;
use ib_math::Batch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Sample mean of `f` over `n` draws from `measure`.
///
/// `f` receives a batch of shape `[n, *batch_shape]`.
pub fn monte_carlo_expectation<R: Rng + ?Sized>(
    measure: &ProbabilityMeasure,
    f: &dyn Fn(&Batch) -> Batch,
    n: usize,
    rng: &mut R,
) -> Result<Batch> {
    if n == 0 {
        return Err(Error::invalid_argument(
            "n",
            "Monte Carlo needs at least one sample, got 0",
        ));
    }

    let samples = draw(measure, n, rng)?;
    let values = f(&samples).broadcast_to(samples.shape())?;
    let estimate = values.mean_axis0()?;

    tracing::trace!(
        event = event_names::MONTECARLO_SAMPLED,
        stage = %Stage::Integrate,
        family = %measure.family(),
        samples = n,
        "Monte Carlo estimate"
    );
    Ok(estimate)
}

/// [`monte_carlo_expectation`] with a `StdRng` seeded from `seed`.
pub fn monte_carlo_expectation_seeded(
    measure: &ProbabilityMeasure,
    f: &dyn Fn(&Batch) -> Batch,
    n: usize,
    seed: u64,
) -> Result<Batch> {
    let mut rng = StdRng::seed_from_u64(seed);
    monte_carlo_expectation(measure, f, n, &mut rng)
}

/// [`monte_carlo_expectation`] driven by configured sample count and seed.
///
/// Without a seed the thread-local generator is used.
pub fn monte_carlo_with_settings(
    measure: &ProbabilityMeasure,
    f: &dyn Fn(&Batch) -> Batch,
    settings: &MonteCarloSettings,
) -> Result<Batch> {
    match settings.seed {
        Some(seed) => monte_carlo_expectation_seeded(measure, f, settings.samples, seed),
        None => monte_carlo_expectation(measure, f, settings.samples, &mut rand::rng()),
    }
}

/// `n` i.i.d. draws stacked along a new leading axis.
fn draw<R: Rng + ?Sized>(measure: &ProbabilityMeasure, n: usize, rng: &mut R) -> Result<Batch> {
    let mut shape = Vec::with_capacity(measure.batch_shape().len() + 1);
    shape.push(n);
    shape.extend_from_slice(measure.batch_shape());

    let mut data = Vec::with_capacity(shape.iter().product());
    match measure {
        ProbabilityMeasure::TwoPoint(m) => {
            for _ in 0..n {
                data.extend(
                    m.probs()
                        .iter()
                        .map(|&p| if rng.random_bool(p) { 1.0 } else { 0.0 }),
                );
            }
        }
        ProbabilityMeasure::ContinuousBell(m) => {
            for _ in 0..n {
                for (mean, std) in m.mean().iter().zip(m.std().iter()) {
                    let z: f64 = StandardNormal.sample(rng);
                    data.push(mean + std * z);
                }
            }
        }
    }
    Ok(Batch::from_shape_vec(shape, data)?)
}
