//! Shapiro–Wilk normality test
//!
//! Royston's approximation (AS R94): coefficients from expected normal order
//! statistics with polynomial corrections for the two extreme weights, and a
//! normalizing transform of `W` for the p-value. Valid for 3 ≤ n ≤ 5000.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Smallest sample the test is defined for
pub const MIN_SAMPLES: usize = 3;

/// Largest sample the approximation is calibrated for
pub const MAX_SAMPLES: usize = 5000;

/// Outcome of a normality test on one sample set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalityResult {
    Computed {
        statistic: f64,
        p_value: f64,
        is_normal: bool,
    },
    NotComputed {
        reason: String,
    },
}

impl NormalityResult {
    /// Run the test on at most the first `limit` samples
    pub fn evaluate(samples: &[f64], limit: usize, alpha: f64) -> Self {
        let window = &samples[..samples.len().min(limit).min(MAX_SAMPLES)];
        match shapiro_wilk(window) {
            Ok((statistic, p_value)) => Self::Computed {
                statistic,
                p_value,
                is_normal: p_value > alpha,
            },
            Err(reason) => Self::NotComputed { reason },
        }
    }

    /// Whether a statistic is available
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed { .. })
    }
}

// Royston's polynomial in u = 1/√n
fn poly(coeffs: &[f64], u: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * u + c)
}

/// `(W, p)` for `samples`
pub fn shapiro_wilk(samples: &[f64]) -> Result<(f64, f64), String> {
    let n = samples.len();
    if n < MIN_SAMPLES {
        return Err(format!("need at least {} samples, got {}", MIN_SAMPLES, n));
    }
    if n > MAX_SAMPLES {
        return Err(format!("at most {} samples supported, got {}", MAX_SAMPLES, n));
    }
    if samples.iter().any(|x| !x.is_finite()) {
        return Err("samples contain non-finite values".to_string());
    }

    let mut x = samples.to_vec();
    x.sort_by(|a, b| a.total_cmp(b));
    if x[n - 1] - x[0] <= f64::EPSILON * x[n - 1].abs().max(1.0) {
        return Err("all samples are identical".to_string());
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| e.to_string())?;
    let nf = n as f64;

    let a = if n == 3 {
        let w = std::f64::consts::FRAC_1_SQRT_2;
        vec![-w, 0.0, w]
    } else {
        let m: Vec<f64> = (1..=n)
            .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (nf + 0.25)))
            .collect();
        let mm: f64 = m.iter().map(|v| v * v).sum();
        let u = 1.0 / nf.sqrt();

        let an = m[n - 1] / mm.sqrt()
            + poly(&[0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056], u);

        let mut a = vec![0.0; n];
        if n > 5 {
            let an1 = m[n - 2] / mm.sqrt()
                + poly(&[0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633], u);
            let phi = (mm - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
                / (1.0 - 2.0 * an.powi(2) - 2.0 * an1.powi(2));
            for i in 2..n - 2 {
                a[i] = m[i] / phi.sqrt();
            }
            a[0] = -an;
            a[1] = -an1;
            a[n - 2] = an1;
            a[n - 1] = an;
        } else {
            let phi = (mm - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * an.powi(2));
            for i in 1..n - 1 {
                a[i] = m[i] / phi.sqrt();
            }
            a[0] = -an;
            a[n - 1] = an;
        }
        a
    };

    let mean = x.iter().sum::<f64>() / nf;
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let num: f64 = a.iter().zip(x.iter()).map(|(ai, xi)| ai * xi).sum();
    let w = (num * num / ss).min(1.0);

    let p = if n == 3 {
        let p = 6.0 / std::f64::consts::PI * (w.sqrt().asin() - 0.75f64.sqrt().asin());
        p.clamp(0.0, 1.0)
    } else {
        // W = 1 would send ln(1 − W) to −∞
        let one_minus_w = (1.0 - w).max(f64::MIN_POSITIVE);
        let (y, mu, sigma) = if n <= 11 {
            let gamma = -2.273 + 0.459 * nf;
            let mu = 0.5440 - 0.39978 * nf + 0.025054 * nf.powi(2) - 0.0006714 * nf.powi(3);
            let sigma =
                (1.3822 - 0.77857 * nf + 0.062767 * nf.powi(2) - 0.0020322 * nf.powi(3)).exp();
            let inner = gamma - one_minus_w.ln();
            if inner <= 0.0 {
                return Ok((w, 0.0));
            }
            (-inner.ln(), mu, sigma)
        } else {
            let ln = nf.ln();
            let mu = 0.0038915 * ln.powi(3) - 0.083751 * ln.powi(2) - 0.31082 * ln - 1.5861;
            let sigma = (0.0030302 * ln.powi(2) - 0.082676 * ln - 0.4803).exp();
            (one_minus_w.ln(), mu, sigma)
        };
        let z = (y - mu) / sigma;
        (1.0 - normal.cdf(z)).clamp(0.0, 1.0)
    };

    Ok((w, p))
}
