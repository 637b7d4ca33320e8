//! Closed-form entropies (in nats) for the supported measure families.

use std::f64::consts::PI;

/// 0.5 * (1 + ln(2π)), the entropy of a unit-variance Gaussian.
#[allow(clippy::excessive_precision)]
const GAUSSIAN_UNIT_ENTROPY: f64 = 1.418_938_533_204_672_7;

/// `x * ln(x)` with the continuous extension `0 * ln(0) = 0`.
pub fn xlogx(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    x * x.ln()
}

/// Entropy of a Bernoulli(p) variable.
///
/// Zero at `p = 0` and `p = 1`, maximal (`ln 2`) at `p = 0.5`. NaN outside
/// `[0, 1]`.
pub fn binary_entropy(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    -(xlogx(p) + xlogx(1.0 - p))
}

/// Entropy of N(mean, std²): `0.5 + 0.5·ln(2π) + ln(std)`.
///
/// Independent of the mean. NaN for non-positive `std`.
pub fn gaussian_entropy(std: f64) -> f64 {
    if std.is_nan() || std <= 0.0 {
        return f64::NAN;
    }
    GAUSSIAN_UNIT_ENTROPY + std.ln()
}

/// Upper bound on [`binary_entropy`].
pub fn max_binary_entropy() -> f64 {
    std::f64::consts::LN_2
}

/// `0.5 * ln(2πe)`, computed rather than tabulated.
pub fn gaussian_unit_entropy() -> f64 {
    0.5 * (2.0 * PI * std::f64::consts::E).ln()
}
