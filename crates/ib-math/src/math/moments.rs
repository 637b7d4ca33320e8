//! Closed-form raw moments of the Gaussian.
//!
//! Used as the reference when checking quadrature exactness:
//!
//! ```text
//! E[Xᵏ] = Σ_{j even, j ≤ k} C(k, j) · μ^(k-j) · σʲ · (j-1)!!
//! ```

/// Binomial coefficient as `f64`. Exact for the small `k` used here.
pub fn binomial_coefficient(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * f64::from(n - i) / f64::from(i + 1))
}

/// Double factorial `(m)!!`, with `(-1)!! = 0!! = 1`.
pub fn double_factorial(m: i64) -> f64 {
    let mut acc = 1.0;
    let mut i = m;
    while i > 1 {
        acc *= i as f64;
        i -= 2;
    }
    acc
}

/// `E[Xᵏ]` for `X ~ N(mean, std²)`.
pub fn gaussian_raw_moment(mean: f64, std: f64, k: u32) -> f64 {
    (0..=k)
        .step_by(2)
        .map(|j| {
            binomial_coefficient(k, j)
                * mean.powi((k - j) as i32)
                * std.powi(j as i32)
                * double_factorial(i64::from(j) - 1)
        })
        .sum()
}

/// `E[Xᵏ]` for `X ~ Bernoulli(p)`: `p` for every `k ≥ 1`, 1 for `k = 0`.
pub fn bernoulli_raw_moment(p: f64, k: u32) -> f64 {
    if k == 0 {
        1.0
    } else {
        p
    }
}
