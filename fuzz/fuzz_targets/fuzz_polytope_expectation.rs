//! Fuzz target for polytope construction and reduction.
//!
//! Arbitrary probabilities and node counts must produce either a value or an
//! error, and any value must be bounded by the vertex expectations.

#![no_main]

use arbitrary::Arbitrary;
use ib_core::{Batch, InfraDistribution, InfraPolytope, ProbabilityMeasure};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    probs: Vec<f64>,
    means: Vec<f64>,
    std: f64,
    nodes: u8,
}

fuzz_target!(|input: Input| {
    let f = |x: &Batch| x.map(|v| v.sin() + v);

    if let Ok(measure) = ProbabilityMeasure::two_point(input.probs) {
        if let Ok(polytope) = InfraPolytope::from_measure(measure) {
            let worst = polytope.expectation(&f).expect("two-point expectation");
            for part in polytope.vertex_expectations(&f).expect("vertex expectations") {
                assert!(worst.item() <= part.item() || worst.item().is_some_and(f64::is_nan));
            }
        }
    }

    let Ok(measure) = ProbabilityMeasure::continuous_bell(input.means, input.std) else {
        return;
    };
    let Ok(polytope) = InfraPolytope::from_measure(measure) else {
        return;
    };
    if let Ok(polytope) = polytope.with_quadrature_nodes(input.nodes as usize) {
        let _ = polytope.expectation(&f);
        let _ = polytope.entropy();
    }
});
