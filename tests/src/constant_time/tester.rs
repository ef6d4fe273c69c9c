// src/constant_time/tester.rs
use kemscope_timing::stats::{self, iqr_outliers, welch_t_test};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::time::Instant;

use super::config::TestConfig;

// Structure to hold the results of timing analysis
#[derive(Debug)]
pub struct TimingAnalysis {
    pub mean_a: f64,
    pub mean_b: f64,
    pub std_dev_a: f64,
    pub std_dev_b: f64,
    pub mean_ratio: f64,
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    pub combined_score: f64,
    pub is_constant_time: bool,
    pub cohens_d: f64,
    pub effect_size_interpretation: String,
    pub confidence_interval: (f64, f64),
}

pub struct TimingTester {
    pub num_samples: usize,
    pub num_iterations: usize,
}

impl TimingTester {
    pub fn new(num_samples: usize, num_iterations: usize) -> Self {
        Self {
            num_samples,
            num_iterations,
        }
    }

    pub fn from_config(config: &TestConfig) -> Self {
        Self::new(config.num_samples, config.num_iterations)
    }

    /// Average nanoseconds per call, one entry per sample
    pub fn measure<F>(&self, mut f: F) -> Vec<f64>
    where
        F: FnMut(),
    {
        let mut times = Vec::with_capacity(self.num_samples);
        for _ in 0..self.num_samples {
            let start = Instant::now();
            for _ in 0..self.num_iterations {
                f();
            }
            let elapsed = start.elapsed().as_nanos() as f64;
            times.push(elapsed / self.num_iterations as f64);
        }
        times
    }

    // Remove outliers using the analyzer's IQR fences
    pub fn remove_outliers(times: &[f64]) -> Vec<f64> {
        if times.len() < 4 {
            return times.to_vec();
        }
        let fences = iqr_outliers(times, 1.5);
        times
            .iter()
            .copied()
            .filter(|&t| t >= fences.lower_fence && t <= fences.upper_fence)
            .collect()
    }

    pub fn t_critical_value(df: f64, confidence_level: f64) -> f64 {
        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => {
                let alpha = 1.0 - confidence_level;
                dist.inverse_cdf(1.0 - alpha / 2.0)
            }
            Err(_) => match confidence_level {
                c if c >= 0.99 => 2.58,
                c if c >= 0.98 => 2.33,
                c if c >= 0.95 => 1.96,
                c if c >= 0.90 => 1.64,
                _ => 1.28,
            },
        }
    }

    // Weighted blend of mean ratio, t-statistic and relative deviation
    pub fn combined_score(
        mean_ratio: f64,
        t_stat: f64,
        rel_std_dev_a: f64,
        rel_std_dev_b: f64,
    ) -> f64 {
        let max_rel_std_dev = f64::max(rel_std_dev_a, rel_std_dev_b);

        let weight_mean_ratio = 0.5;
        let weight_t_stat = 0.2;
        let weight_std_dev = 0.3;

        let score = 1.0
            + (mean_ratio - 1.0) * weight_mean_ratio
            + (t_stat / 10.0) * weight_t_stat
            + max_rel_std_dev * weight_std_dev;

        if score.is_nan() || score.is_infinite() || score < 1.0 {
            mean_ratio
        } else {
            score
        }
    }

    pub fn analyze_constant_time(
        &self,
        times_a: &[f64],
        times_b: &[f64],
        config: &TestConfig,
    ) -> Result<TimingAnalysis, String> {
        let clean_a = Self::remove_outliers(times_a);
        let clean_b = Self::remove_outliers(times_b);

        if clean_a.len() < 2 || clean_b.len() < 2 {
            return Err("After outlier removal, not enough data points remain".to_string());
        }

        let welch = welch_t_test(&clean_a, &clean_b)?;
        let std_dev_a = stats::stdev(&clean_a);
        let std_dev_b = stats::stdev(&clean_b);

        let mean_ratio = if welch.mean_a > welch.mean_b {
            welch.mean_a / welch.mean_b
        } else {
            welch.mean_b / welch.mean_a
        };

        let combined_score = Self::combined_score(
            mean_ratio,
            welch.t_statistic,
            std_dev_a / welch.mean_a,
            std_dev_b / welch.mean_b,
        );

        // 95% interval for the absolute mean difference
        let t_critical = Self::t_critical_value(welch.degrees_of_freedom, 0.95);
        let standard_error = (std_dev_a.powi(2) / clean_a.len() as f64
            + std_dev_b.powi(2) / clean_b.len() as f64)
            .sqrt();
        let margin_of_error = t_critical * standard_error;
        let mean_diff = (welch.mean_a - welch.mean_b).abs();

        Ok(TimingAnalysis {
            mean_a: welch.mean_a,
            mean_b: welch.mean_b,
            std_dev_a,
            std_dev_b,
            mean_ratio,
            t_statistic: welch.t_statistic,
            degrees_of_freedom: welch.degrees_of_freedom,
            p_value: welch.p_value,
            combined_score,
            is_constant_time: combined_score <= config.combined_score_threshold
                && mean_ratio <= config.mean_ratio_max,
            cohens_d: welch.cohens_d,
            effect_size_interpretation: welch.effect_size,
            confidence_interval: (
                (mean_diff - margin_of_error).max(0.0),
                mean_diff + margin_of_error,
            ),
        })
    }
}

/// Short human-readable diagnosis of one comparison
pub fn generate_test_insights(analysis: &TimingAnalysis, subject: &str) -> String {
    let mut insights = String::new();

    let mean_diff = (analysis.mean_a - analysis.mean_b).abs();
    let timing_difference_percent =
        (mean_diff / f64::min(analysis.mean_a, analysis.mean_b)) * 100.0;

    if analysis.is_constant_time {
        insights.push_str(&format!(
            "PASS: {} shows no input-dependent timing.\n",
            subject
        ));
        return insights;
    }

    insights.push_str(&format!("FAIL: {} timing depends on input.\n", subject));
    insights.push_str(&format!(
        "  Mean: {:.0} ns vs {:.0} ns (diff: {:.1}%)\n",
        analysis.mean_a, analysis.mean_b, timing_difference_percent
    ));
    insights.push_str(&format!(
        "  Stats: t={:.1}, p={:.2e}, d={:.1} ({})\n",
        analysis.t_statistic,
        analysis.p_value,
        analysis.cohens_d,
        analysis.effect_size_interpretation
    ));

    if timing_difference_percent > 40.0 && analysis.cohens_d > 5.0 {
        insights.push_str("  Pattern: early return, work is skipped for some inputs\n");
    } else if analysis.mean_ratio > 1.5 && analysis.p_value < 0.001 {
        insights.push_str("  Pattern: data-dependent branching\n");
    } else {
        insights.push_str("  Pattern: general timing inconsistency\n");
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_outliers_drops_spike() {
        let mut times = vec![100.0; 20];
        times.push(10_000.0);
        let clean = TimingTester::remove_outliers(&times);
        assert_eq!(clean.len(), 20);
    }

    #[test]
    fn test_identical_distributions_are_constant_time() {
        let a: Vec<f64> = (0..40).map(|i| 100.0 + (i % 5) as f64).collect();
        let b: Vec<f64> = (0..40).map(|i| 100.0 + ((i + 2) % 5) as f64).collect();
        let tester = TimingTester::new(40, 1);
        let analysis = tester
            .analyze_constant_time(&a, &b, &TestConfig::default())
            .unwrap();
        assert!(analysis.mean_ratio < 1.01);
        assert!(analysis.is_constant_time);
        assert!(generate_test_insights(&analysis, "x").starts_with("PASS"));
    }

    #[test]
    fn test_separated_distributions_are_flagged() {
        let a: Vec<f64> = (0..40).map(|i| 100.0 + (i % 5) as f64).collect();
        let b: Vec<f64> = (0..40).map(|i| 300.0 + (i % 5) as f64).collect();
        let tester = TimingTester::new(40, 1);
        let analysis = tester
            .analyze_constant_time(&a, &b, &TestConfig::default())
            .unwrap();
        assert!(!analysis.is_constant_time);
        assert!(analysis.p_value < 0.001);
        assert!(generate_test_insights(&analysis, "x").starts_with("FAIL"));
    }

    #[test]
    fn test_too_few_samples() {
        let tester = TimingTester::new(1, 1);
        assert!(tester
            .analyze_constant_time(&[1.0], &[2.0], &TestConfig::default())
            .is_err());
    }
}
