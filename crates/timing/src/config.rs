//! Analyzer configuration
//!
//! Every knob has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! num_samples = 5000
//! seed = 7
//!
//! [verdict]
//! moderate_cv_percent = 4.0
//! ```

use kemscope_api::{error::ConfigResult, Error};
use serde::{Deserialize, Serialize};

use crate::verdict::VerdictPolicy;

/// Settings of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Measured trials
    pub num_samples: usize,
    /// Trials run and discarded before measuring
    pub num_warmup: usize,
    /// Only the first this many samples enter the normality test
    pub normality_sample_limit: usize,
    /// Significance level below which a distribution is reported non-normal
    pub normality_alpha: f64,
    /// IQR multiplier for the outlier fences
    pub outlier_iqr_factor: f64,
    /// Log progress every this many trials, 0 disables progress logging
    pub progress_interval: usize,
    /// Seed for the analyzer's own randomness; entropy when absent
    pub seed: Option<u64>,
    /// CV thresholds for the verdict
    pub verdict: VerdictPolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            num_samples: 1000,
            num_warmup: 10,
            normality_sample_limit: 5000,
            normality_alpha: 0.05,
            outlier_iqr_factor: 1.5,
            progress_interval: 100,
            seed: None,
            verdict: VerdictPolicy::default(),
        }
    }
}

// Builder methods for easy customization
impl AnalyzerConfig {
    pub fn with_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = num_samples;
        self
    }

    pub fn with_warmup(mut self, num_warmup: usize) -> Self {
        self.num_warmup = num_warmup;
        self
    }

    pub fn with_normality(mut self, sample_limit: usize, alpha: f64) -> Self {
        self.normality_sample_limit = sample_limit;
        self.normality_alpha = alpha;
        self
    }

    pub fn with_outlier_factor(mut self, factor: f64) -> Self {
        self.outlier_iqr_factor = factor;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_verdict(mut self, verdict: VerdictPolicy) -> Self {
        self.verdict = verdict;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// Predefined configurations
impl AnalyzerConfig {
    /// Few samples, no warm-up. For smoke tests.
    pub fn quick() -> Self {
        Self::default()
            .with_samples(100)
            .with_warmup(0)
            .with_progress_interval(0)
    }

    /// Large sample for publishable numbers
    pub fn thorough() -> Self {
        Self::default()
            .with_samples(10_000)
            .with_warmup(100)
            .with_progress_interval(1000)
    }
}

impl AnalyzerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| Error::config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Reject settings no run could use
    pub fn validate(&self) -> ConfigResult<()> {
        if self.num_samples == 0 {
            return Err(Error::config("num_samples must be at least 1"));
        }
        if self.normality_sample_limit < 3 {
            return Err(Error::config("normality_sample_limit must be at least 3"));
        }
        if !(self.normality_alpha > 0.0 && self.normality_alpha < 1.0) {
            return Err(Error::config(format!(
                "normality_alpha must be in (0, 1), got {}",
                self.normality_alpha
            )));
        }
        if !(self.outlier_iqr_factor.is_finite() && self.outlier_iqr_factor >= 0.0) {
            return Err(Error::config(format!(
                "outlier_iqr_factor must be finite and non-negative, got {}",
                self.outlier_iqr_factor
            )));
        }
        self.verdict.validate()
    }
}
