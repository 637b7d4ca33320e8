//! End-to-end tests over real measures and polytopes (no mocks).
//!
//! Covers:
//! - Quadrature against the Monte Carlo oracle
//! - The uncertain-predictor reference scenario
//! - Polytope reductions, algebra and error paths
//! - Thread sharing

use ib_core::integration::{monte_carlo_expectation_seeded, quadrature_expectation};
use ib_core::{
    Batch, Error, InfraDistribution, InfraPolytope, ProbabilityMeasure, SaMeasure,
};
use ib_math::{binary_entropy, gaussian_entropy};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

fn bell_batch() -> ProbabilityMeasure {
    ProbabilityMeasure::continuous_bell(Batch::linspace(-1.0, 1.0, 5), Batch::linspace(0.1, 1.0, 5))
        .unwrap()
}

fn step(threshold: f64, above: f64, below: f64) -> impl Fn(&Batch) -> Batch {
    move |x: &Batch| x.map(|v| if v > threshold { above } else { below })
}

// ============================================================================
// Quadrature vs Monte Carlo
// ============================================================================

#[test]
fn quadrature_agrees_with_monte_carlo_on_powers() {
    let measure = bell_batch();
    for exponent in 1..=3 {
        let f = move |x: &Batch| x.powi(exponent);
        let quad = quadrature_expectation(&measure, &f, 20).unwrap();
        let mc = monte_carlo_expectation_seeded(&measure, &f, 400_000, 42 + exponent as u64)
            .unwrap();
        assert_eq!(quad.shape(), &[5]);
        let diff = quad.max_abs_diff(&mc).unwrap();
        assert!(diff < 0.05, "x^{}: quadrature {} vs MC {} (diff {})", exponent, quad, mc, diff);
    }
}

#[test]
fn standard_normal_second_moment() {
    let measure = ProbabilityMeasure::continuous_bell(0.0, 1.0).unwrap();
    let f = |x: &Batch| x.powi(2);
    let quad = quadrature_expectation(&measure, &f, 20).unwrap().item().unwrap();
    let mc = monte_carlo_expectation_seeded(&measure, &f, 100_000, 5)
        .unwrap()
        .item()
        .unwrap();
    assert!((quad - 1.0).abs() < 1e-12);
    assert!((quad - mc).abs() < 0.05);
}

#[test]
fn two_point_closed_form_matches_monte_carlo() {
    let measure = ProbabilityMeasure::two_point(vec![0.1, 0.5, 0.9]).unwrap();
    let f = |x: &Batch| &(x * 3.0) - 1.0;
    let exact = SaMeasure::new(measure.clone()).expectation(&f).unwrap();
    let mc = monte_carlo_expectation_seeded(&measure, &f, 100_000, 17).unwrap();
    assert!(exact.max_abs_diff(&mc).unwrap() < 0.05);
}

// ============================================================================
// Reference scenario: predictor of uncertain accuracy
// ============================================================================

#[test]
fn one_box_worst_case() {
    let accuracy = ProbabilityMeasure::two_point(vec![0.8, 0.9, 0.95]).unwrap();
    let polytope = InfraPolytope::from_measure(accuracy).unwrap();
    let one_box = step(0.5, 1_000_000.0, 0.0);
    let worst = polytope.expectation(&one_box).unwrap();
    assert!((worst.item().unwrap() - 800_000.0).abs() < 1e-6);
}

#[test]
fn two_box_worst_case() {
    let accuracy = ProbabilityMeasure::two_point(vec![0.8, 0.9, 0.95]).unwrap();
    let polytope = InfraPolytope::from_measure(accuracy).unwrap();
    let two_box = step(0.5, 1_001_000.0, 1_000.0);
    let worst = polytope.expectation(&two_box).unwrap();
    assert!((worst.item().unwrap() - 801_000.0).abs() < 1e-6);

    let per_vertex = polytope.vertex_expectations(&two_box).unwrap();
    assert_eq!(per_vertex.len(), 3);
    let min = per_vertex
        .iter()
        .map(|b| b.item().unwrap())
        .fold(f64::INFINITY, f64::min);
    assert_eq!(min, worst.item().unwrap());
}

// ============================================================================
// Polytope reductions
// ============================================================================

#[test]
fn expectation_is_elementwise_min_over_batched_vertices() {
    // 3 vertices, each a batch of 4 bell measures
    let means = Batch::from_shape_vec(
        vec![3, 4],
        vec![0.0, 1.0, 2.0, 3.0, 1.0, 0.0, 3.0, 2.0, -1.0, 2.0, 1.0, 0.0],
    )
    .unwrap();
    let measure = ProbabilityMeasure::continuous_bell(means, 0.5).unwrap();
    let polytope = InfraPolytope::from_measure(measure).unwrap();
    assert_eq!(polytope.vertex_shape(), &[4]);

    let f = |x: &Batch| x.clone();
    let worst = polytope.expectation(&f).unwrap();
    for (got, want) in worst.iter().zip([-1.0, 0.0, 1.0, 0.0]) {
        assert!((got - want).abs() < 1e-10);
    }

    let parts = polytope.vertex_expectations(&f).unwrap();
    let mut expected = parts[0].clone();
    for part in &parts[1..] {
        expected = expected.elementwise_min(part).unwrap();
    }
    assert_eq!(worst, expected);
}

#[test]
fn entropy_is_max_of_base_entropies_for_both_families() {
    let coins = InfraPolytope::from_measure(
        ProbabilityMeasure::two_point(vec![0.1, 0.5, 0.7]).unwrap(),
    )
    .unwrap();
    assert_eq!(coins.entropy().unwrap().item(), Some(binary_entropy(0.5)));

    let bells = InfraPolytope::from_measure(
        ProbabilityMeasure::continuous_bell(0.0, vec![0.5, 2.0, 1.0]).unwrap(),
    )
    .unwrap();
    assert_eq!(bells.entropy().unwrap().item(), Some(gaussian_entropy(2.0)));
}

#[test]
fn entropy_unaffected_by_scale_and_bias() {
    let polytope = InfraPolytope::from_measure(
        ProbabilityMeasure::continuous_bell(vec![0.0, 1.0], vec![1.0, 3.0]).unwrap(),
    )
    .unwrap();
    let moved = polytope
        .multiply_scalar(-4.0)
        .unwrap()
        .add_constant(10.0)
        .unwrap();
    assert_eq!(polytope.entropy().unwrap(), moved.entropy().unwrap());
}

#[test]
fn polytope_algebra_shifts_worst_case() {
    let polytope = InfraPolytope::from_measure(
        ProbabilityMeasure::two_point(vec![0.2, 0.6]).unwrap(),
    )
    .unwrap();
    let f = |x: &Batch| x.clone();
    let base = polytope.expectation(&f).unwrap().item().unwrap();
    let scaled = polytope.multiply_scalar(10.0).unwrap();
    assert!((scaled.expectation(&f).unwrap().item().unwrap() - 10.0 * base).abs() < 1e-12);
    let shifted = scaled.add_constant(1.0).unwrap();
    assert!((shifted.expectation(&f).unwrap().item().unwrap() - (10.0 * base + 1.0)).abs() < 1e-12);

    // Negative scale flips which vertex is worst
    let flipped = polytope.multiply_scalar(-1.0).unwrap();
    assert!((flipped.expectation(&f).unwrap().item().unwrap() + 0.6).abs() < 1e-12);
}

#[test]
fn batched_scale_is_split_with_vertices() {
    let base = ProbabilityMeasure::two_point(vec![0.5, 0.5]).unwrap();
    let sa = SaMeasure::with_transform(base, Some(Batch::from_vec(vec![1.0, 4.0])), None).unwrap();
    let polytope = InfraPolytope::from_sa_measure(sa).unwrap();
    let values: Vec<f64> = polytope
        .vertex_expectations(&|x| x.clone())
        .unwrap()
        .iter()
        .map(|b| b.item().unwrap())
        .collect();
    assert_eq!(values, vec![0.5, 2.0]);
}

#[test]
fn polytope_from_explicit_vertices_of_mixed_families() {
    let vertices = vec![
        SaMeasure::new(ProbabilityMeasure::two_point(0.5).unwrap()),
        SaMeasure::new(ProbabilityMeasure::continuous_bell(0.2, 1.0).unwrap()),
    ];
    let polytope = InfraPolytope::from_vertices(vertices).unwrap();
    let worst = polytope.expectation(&|x| x.clone()).unwrap().item().unwrap();
    assert!((worst - 0.2).abs() < 1e-12);
}

// ============================================================================
// Error paths
// ============================================================================

#[test]
fn construction_errors_are_shape_errors() {
    let unbatched = ProbabilityMeasure::continuous_bell(0.0, 1.0).unwrap();
    assert!(matches!(
        InfraPolytope::from_measure(unbatched),
        Err(Error::Shape(_))
    ));
    let single = ProbabilityMeasure::continuous_bell(vec![0.0], vec![1.0]).unwrap();
    assert!(matches!(InfraPolytope::from_measure(single), Err(Error::Shape(_))));
}

#[test]
fn sa_measure_addition_is_unsupported() {
    let a = SaMeasure::new(ProbabilityMeasure::two_point(0.3).unwrap());
    let b = SaMeasure::new(ProbabilityMeasure::continuous_bell(0.0, 1.0).unwrap());
    assert!(matches!(a.add(&b), Err(Error::UnsupportedOperation(_))));
    assert!(matches!(b.add(&a), Err(Error::UnsupportedOperation(_))));
}

#[test]
fn integrand_shape_errors_surface_through_polytope() {
    let polytope = InfraPolytope::from_measure(bell_batch()).unwrap();
    let err = polytope
        .expectation(&|_| Batch::from_vec(vec![1.0, 2.0]))
        .unwrap_err();
    assert!(err.is_shape());
}

#[test]
fn quadrature_rejects_two_point() {
    let coin = ProbabilityMeasure::two_point(0.4).unwrap();
    let err = quadrature_expectation(&coin, &|x| x.clone(), 20).unwrap_err();
    assert!(matches!(err, Error::UnsupportedDistribution { .. }));
}

// ============================================================================
// Concurrency
// ============================================================================

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn value_types_are_send_and_sync() {
    assert_send_sync::<Batch>();
    assert_send_sync::<ProbabilityMeasure>();
    assert_send_sync::<SaMeasure>();
    assert_send_sync::<InfraPolytope>();
    assert_send_sync::<Error>();
}

#[test]
fn polytope_shared_across_threads() {
    let polytope = Arc::new(InfraPolytope::from_measure(bell_batch()).unwrap());
    let expected = polytope.expectation(&|x| x.powi(2)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let polytope = Arc::clone(&polytope);
            std::thread::spawn(move || polytope.expectation(&|x| x.powi(2)).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
