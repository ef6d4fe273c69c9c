//! Descriptive statistics and the Welch t-test
//!
//! All functions take samples in seconds as `f64`. Standard deviations are
//! sample (n − 1) deviations; quartiles interpolate linearly between order
//! statistics.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Arithmetic mean, 0 for an empty slice
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample variance around `mean`, 0 when fewer than two samples
pub fn variance(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let ss: f64 = samples
        .iter()
        .map(|&t| {
            let d = t - mean;
            d * d
        })
        .sum();
    ss / (samples.len() as f64 - 1.0)
}

/// Sample standard deviation
pub fn stdev(samples: &[f64]) -> f64 {
    variance(samples, mean(samples)).sqrt()
}

/// `stdev / mean × 100`, `None` when the mean is zero
pub fn coefficient_of_variation(mean: f64, stdev: f64) -> Option<f64> {
    if mean == 0.0 {
        None
    } else {
        Some(stdev / mean * 100.0)
    }
}

/// Linearly interpolated quantile of sorted data, `p` in `[0, 1]`
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Mean, deviation and range of one sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize `samples`. An empty slice yields all zeros.
    pub fn from_samples(samples: &[f64]) -> Self {
        let mean = mean(samples);
        Self {
            count: samples.len(),
            mean,
            stdev: variance(samples, mean).sqrt(),
            min: samples.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max: samples.iter().copied().reduce(f64::max).unwrap_or(0.0),
        }
    }
}

/// Samples outside `[q1 − f·iqr, q3 + f·iqr]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub count: usize,
    /// Share of all samples, in `[0, 100]`
    pub percentage: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

/// Count IQR outliers with fence multiplier `factor`
pub fn iqr_outliers(samples: &[f64], factor: f64) -> OutlierSummary {
    let sorted = sorted_copy(samples);
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - factor * iqr;
    let upper_fence = q3 + factor * iqr;

    let count = samples
        .iter()
        .filter(|&&t| t < lower_fence || t > upper_fence)
        .count();
    let percentage = if samples.is_empty() {
        0.0
    } else {
        count as f64 / samples.len() as f64 * 100.0
    };

    OutlierSummary {
        count,
        percentage,
        lower_fence,
        upper_fence,
    }
}

/// Result of comparing two timing distributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    pub mean_a: f64,
    pub mean_b: f64,
    /// Absolute Welch t statistic
    pub t_statistic: f64,
    /// Welch–Satterthwaite degrees of freedom
    pub degrees_of_freedom: f64,
    /// Two-tailed p-value from the Student t distribution
    pub p_value: f64,
    pub cohens_d: f64,
    pub effect_size: String,
}

/// Welch's unequal-variance t-test between `a` and `b`.
///
/// Fails when either side has fewer than two samples or both variances are
/// zero.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<WelchTest, String> {
    if a.len() < 2 || b.len() < 2 {
        return Err(format!(
            "need at least 2 samples per side, got {} and {}",
            a.len(),
            b.len()
        ));
    }

    let mean_a = mean(a);
    let mean_b = mean(b);
    let var_a = variance(a, mean_a);
    let var_b = variance(b, mean_b);
    let n_a = a.len() as f64;
    let n_b = b.len() as f64;

    let term_a = var_a / n_a;
    let term_b = var_b / n_b;
    if term_a + term_b == 0.0 {
        return Err("both sample sets have zero variance".to_string());
    }

    // Welch's t-test formula
    let t_statistic = (mean_a - mean_b).abs() / (term_a + term_b).sqrt();

    // Welch-Satterthwaite equation
    let degrees_of_freedom =
        (term_a + term_b).powi(2) / (term_a.powi(2) / (n_a - 1.0) + term_b.powi(2) / (n_b - 1.0));

    let pooled_std_dev =
        ((var_a * (n_a - 1.0) + var_b * (n_b - 1.0)) / (n_a + n_b - 2.0)).sqrt();
    let cohens_d = if pooled_std_dev > 0.0 {
        (mean_a - mean_b).abs() / pooled_std_dev
    } else {
        f64::INFINITY
    };

    Ok(WelchTest {
        mean_a,
        mean_b,
        t_statistic,
        degrees_of_freedom,
        p_value: p_value(t_statistic, degrees_of_freedom),
        cohens_d,
        effect_size: interpret_effect_size(cohens_d).to_string(),
    })
}

/// Two-tailed p-value of `t_stat` under Student's t with `df` degrees of
/// freedom
pub fn p_value(t_stat: f64, df: f64) -> f64 {
    if df < 1.0 || !df.is_finite() {
        return fallback_p_value(t_stat);
    }

    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t_stat.abs()))).clamp(0.0, 1.0),
        Err(_) => fallback_p_value(t_stat),
    }
}

// Coarse table for when the distribution cannot be built
fn fallback_p_value(t_stat: f64) -> f64 {
    match t_stat.abs() {
        t if t < 0.1 => 0.92,
        t if t < 0.5 => 0.68,
        t if t < 1.0 => 0.45,
        t if t < 1.5 => 0.25,
        t if t < 2.0 => 0.12,
        t if t < 2.5 => 0.05,
        t if t < 3.0 => 0.02,
        _ => 0.01,
    }
}

/// Conventional reading of Cohen's d
pub fn interpret_effect_size(d: f64) -> &'static str {
    match d {
        d if d < 0.2 => "Negligible effect",
        d if d < 0.5 => "Small effect",
        d if d < 0.8 => "Medium effect",
        d if d < 1.2 => "Large effect",
        _ => "Very large effect",
    }
}
