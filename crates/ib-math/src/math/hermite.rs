//! Gauss-Hermite quadrature rules.
//!
//! An `n`-point rule approximates
//!
//! ```text
//! ∫ f(z) exp(-z²) dz ≈ Σᵢ wᵢ f(zᵢ)
//! ```
//!
//! and is exact when `f` is a polynomial of degree at most `2n - 1`. With the
//! substitution `x = μ + √2·σ·z` and weights divided by √π the same rule
//! computes `E[f(X)]` for `X ~ N(μ, σ²)`.
//!
//! Rules are built with the Golub-Welsch algorithm. The physicists' Hermite
//! recurrence has the symmetric tridiagonal Jacobi matrix
//!
//! ```text
//! J[i, i] = 0,   J[i, i+1] = J[i+1, i] = √((i+1)/2)
//! ```
//!
//! whose eigenvalues are the nodes. The weight of node `i` is `√π·vᵢ₀²`, where
//! `vᵢ₀` is the first component of its normalized eigenvector. Only those
//! first components are carried through the implicit QL sweeps.

use std::f64::consts::PI;
use std::num::NonZeroUsize;
use thiserror::Error;

/// QL sweeps allowed per eigenvalue before giving up.
const MAX_SWEEPS: usize = 60;

/// Relative tolerance on the weight total after construction.
const MASS_TOL: f64 = 1e-10;

/// A rule that could not be built to full accuracy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("eigenvalue iteration did not converge for a {nodes}-node rule")]
    NoConvergence { nodes: usize },

    #[error("{nodes}-node rule lost accuracy: weights sum to {weight_total}")]
    Inaccurate { nodes: usize, weight_total: f64 },
}

impl RuleError {
    /// Size of the rule that failed.
    pub fn nodes(&self) -> usize {
        match self {
            RuleError::NoConvergence { nodes } | RuleError::Inaccurate { nodes, .. } => *nodes,
        }
    }
}

/// Nodes and weights of an `n`-point Gauss-Hermite rule.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussHermiteRule {
    /// Roots of `Hₙ`, ascending and symmetric about zero.
    nodes: Vec<f64>,
    /// Weights for the `exp(-z²)` kernel; they sum to √π.
    weights: Vec<f64>,
}

impl GaussHermiteRule {
    /// Compute the `n`-point rule.
    ///
    /// Fails rather than returning a rule whose nodes are out of order or
    /// whose weights no longer carry the kernel mass.
    pub fn new(n: NonZeroUsize) -> Result<Self, RuleError> {
        let n = n.get();
        let mut diag = vec![0.0f64; n];
        let mut off_diag: Vec<f64> = (0..n)
            .map(|i| if i + 1 < n { ((i + 1) as f64 / 2.0).sqrt() } else { 0.0 })
            .collect();
        let mut first = vec![0.0f64; n];
        first[0] = 1.0;

        tridiagonal_ql(&mut diag, &mut off_diag, &mut first)
            .ok_or(RuleError::NoConvergence { nodes: n })?;

        let mut pairs: Vec<(f64, f64)> = diag
            .into_iter()
            .zip(first)
            .map(|(z, v)| (z, kernel_mass() * v * v))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Fold each node onto its mirror image so the rule is exactly symmetric.
        let mut nodes = vec![0.0f64; n];
        let mut weights = vec![0.0f64; n];
        for i in 0..n {
            let j = n - 1 - i;
            nodes[i] = 0.5 * (pairs[i].0 - pairs[j].0);
            weights[i] = 0.5 * (pairs[i].1 + pairs[j].1);
        }
        if n % 2 == 1 {
            nodes[n / 2] = 0.0;
        }

        let rule = Self { nodes, weights };
        rule.check(n)?;
        Ok(rule)
    }

    fn check(&self, n: usize) -> Result<(), RuleError> {
        let weight_total = self.weight_total();
        let ordered = self.nodes.windows(2).all(|w| w[0] < w[1]);
        let finite = self
            .nodes
            .iter()
            .chain(&self.weights)
            .all(|v| v.is_finite());
        if !(ordered && finite && (weight_total / kernel_mass() - 1.0).abs() <= MASS_TOL) {
            return Err(RuleError::Inaccurate {
                nodes: n,
                weight_total,
            });
        }
        Ok(())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a rule has at least one node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weights rescaled to sum to 1 (probability weights for `N(0, 1/2)`).
    pub fn normalized_weights(&self) -> Vec<f64> {
        let total = self.weight_total();
        self.weights.iter().map(|w| w / total).collect()
    }

    /// Nodes mapped to the support of `N(mean, std²)`: `mean + √2·std·z`.
    pub fn gaussian_nodes(&self, mean: f64, std: f64) -> impl Iterator<Item = f64> + '_ {
        let spread = std::f64::consts::SQRT_2 * std;
        self.nodes.iter().map(move |z| mean + spread * z)
    }

    /// `E[f(X)]` for scalar `X ~ N(mean, std²)`.
    pub fn gaussian_expectation(&self, mean: f64, std: f64, f: impl Fn(f64) -> f64) -> f64 {
        self.gaussian_nodes(mean, std)
            .zip(&self.weights)
            .map(|(x, w)| w * f(x))
            .sum::<f64>()
            / self.weight_total()
    }

    /// Sum of the raw weights. Equals √π up to rounding.
    pub fn weight_total(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Eigen-decomposition of a symmetric tridiagonal matrix by implicit QL with
/// Wilkinson-style shifts.
///
/// `diag` is overwritten with the eigenvalues (unordered). `off_diag[i]`
/// couples rows `i` and `i + 1`; its last entry is scratch. `first` starts as
/// the first row of the identity and ends as the first component of each
/// eigenvector. Returns `None` if an eigenvalue fails to converge.
fn tridiagonal_ql(diag: &mut [f64], off_diag: &mut [f64], first: &mut [f64]) -> Option<()> {
    let n = diag.len();
    for l in 0..n {
        let mut sweeps = 0;
        loop {
            let mut m = l;
            while m + 1 < n {
                let scale = diag[m].abs() + diag[m + 1].abs();
                if off_diag[m].abs() <= f64::EPSILON * scale {
                    break;
                }
                m += 1;
            }
            if m == l {
                break;
            }
            sweeps += 1;
            if sweeps > MAX_SWEEPS {
                return None;
            }

            let mut g = (diag[l + 1] - diag[l]) / (2.0 * off_diag[l]);
            let mut r = g.hypot(1.0);
            g = diag[m] - diag[l] + off_diag[l] / (g + r.copysign(g));
            let (mut s, mut c, mut p) = (1.0f64, 1.0f64, 0.0f64);
            let mut deflated = false;

            for i in (l..m).rev() {
                let f = s * off_diag[i];
                let b = c * off_diag[i];
                r = f.hypot(g);
                off_diag[i + 1] = r;
                if r == 0.0 {
                    diag[i + 1] -= p;
                    off_diag[m] = 0.0;
                    deflated = true;
                    break;
                }
                s = f / r;
                c = g / r;
                g = diag[i + 1] - p;
                r = (diag[i] - g) * s + 2.0 * c * b;
                p = s * r;
                diag[i + 1] = g + p;
                g = c * r - b;

                let t = first[i + 1];
                first[i + 1] = s * first[i] + c * t;
                first[i] = c * first[i] - s * t;
            }
            if deflated {
                continue;
            }
            diag[l] -= p;
            off_diag[l] = g;
            off_diag[m] = 0.0;
        }
    }
    Some(())
}

/// √π, the total mass of the `exp(-z²)` kernel.
pub fn kernel_mass() -> f64 {
    PI.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Largest rule size exercised here; matches the configured node cap.
    const LARGEST: usize = 200;

    fn rule(n: usize) -> GaussHermiteRule {
        GaussHermiteRule::new(NonZeroUsize::new(n).unwrap()).unwrap()
    }

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn one_point_rule() {
        let r = rule(1);
        assert_eq!(r.len(), 1);
        assert_eq!(r.nodes()[0], 0.0);
        assert!(approx_eq(r.weights()[0], PI.sqrt(), 1e-12));
    }

    #[test]
    fn two_point_rule_known_values() {
        let r = rule(2);
        let z = 0.5f64.sqrt();
        assert!(approx_eq(r.nodes()[0], -z, 1e-12));
        assert!(approx_eq(r.nodes()[1], z, 1e-12));
        assert!(approx_eq(r.weights()[0], PI.sqrt() / 2.0, 1e-12));
        assert!(approx_eq(r.weights()[1], PI.sqrt() / 2.0, 1e-12));
    }

    #[test]
    fn three_point_rule_known_values() {
        let r = rule(3);
        let z = 1.5f64.sqrt();
        assert!(approx_eq(r.nodes()[0], -z, 1e-12));
        assert_eq!(r.nodes()[1], 0.0);
        assert!(approx_eq(r.nodes()[2], z, 1e-12));
        assert!(approx_eq(r.weights()[1], 2.0 * PI.sqrt() / 3.0, 1e-12));
        assert!(approx_eq(r.weights()[0], PI.sqrt() / 6.0, 1e-12));
    }

    #[test]
    fn every_size_up_to_cap_is_accurate() {
        for n in 1..=LARGEST {
            let r = rule(n);
            assert_eq!(r.len(), n);
            assert!(
                approx_eq(r.weight_total(), kernel_mass(), 1e-10),
                "n={} total={}",
                n,
                r.weight_total()
            );
            for pair in r.nodes().windows(2) {
                assert!(pair[0] < pair[1], "n={} nodes out of order", n);
            }
            for i in 0..n {
                assert_eq!(r.nodes()[i], -r.nodes()[n - 1 - i]);
                assert_eq!(r.weights()[i], r.weights()[n - 1 - i]);
            }
            if n >= 2 {
                let second = r.gaussian_expectation(0.0, 1.0, |x| x * x);
                assert!(approx_eq(second, 1.0, 1e-9), "n={} E[x^2]={}", n, second);
            }
            if n >= 3 {
                let fourth = r.gaussian_expectation(0.0, 1.0, |x| x.powi(4));
                assert!(approx_eq(fourth, 3.0, 1e-8), "n={} E[x^4]={}", n, fourth);
            }
        }
    }

    #[test]
    fn largest_rule_spans_known_extreme_root() {
        // Largest root of H_200 is about 19.339.
        let r = rule(LARGEST);
        let top = r.nodes()[LARGEST - 1];
        assert!((top - 19.339_248_7).abs() < 1e-6, "top={}", top);
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        let w = rule(20).normalized_weights();
        assert!(approx_eq(w.iter().sum::<f64>(), 1.0, 1e-14));
        assert!(w.iter().all(|&x| x > 0.0));
    }

    #[test]
    fn gaussian_expectation_recovers_variance() {
        let r = rule(20);
        let var = r.gaussian_expectation(0.0, 1.0, |x| x * x);
        assert!(approx_eq(var, 1.0, 1e-12));
        let fourth = r.gaussian_expectation(0.0, 2.0, |x| x.powi(4));
        assert!(approx_eq(fourth, 3.0 * 16.0, 1e-9));
    }

    #[test]
    fn gaussian_nodes_shift_and_scale() {
        let r = rule(2);
        let xs: Vec<f64> = r.gaussian_nodes(3.0, 2.0).collect();
        assert!(approx_eq(xs[0], 1.0, 1e-12));
        assert!(approx_eq(xs[1], 5.0, 1e-12));
    }

    #[test]
    fn rule_error_reports_size() {
        let err = RuleError::Inaccurate {
            nodes: 7,
            weight_total: 0.0,
        };
        assert_eq!(err.nodes(), 7);
        assert!(err.to_string().contains("7-node"));
    }
}
