// src/constant_time/config.rs

// Default configuration with thresholds
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub mean_ratio_min: f64,
    pub mean_ratio_max: f64,
    pub t_stat_threshold: f64,
    pub combined_score_threshold: f64,
    pub num_warmup: usize,
    pub num_samples: usize,
    pub num_iterations: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            mean_ratio_min: 0.80,
            mean_ratio_max: 1.25,
            t_stat_threshold: 1.7,
            combined_score_threshold: 1.8,
            num_warmup: 1000,
            num_samples: 25,
            num_iterations: 1000,
        }
    }
}

// Builder methods for easy customization
impl TestConfig {
    pub fn with_mean_ratio_range(mut self, min: f64, max: f64) -> Self {
        self.mean_ratio_min = min;
        self.mean_ratio_max = max;
        self
    }

    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.num_warmup = warmup;
        self
    }

    pub fn with_samples_and_iterations(mut self, samples: usize, iterations: usize) -> Self {
        self.num_samples = samples;
        self.num_iterations = iterations;
        self
    }

    pub fn with_t_stat_threshold(mut self, threshold: f64) -> Self {
        self.t_stat_threshold = threshold;
        self
    }

    pub fn with_combined_score_threshold(mut self, threshold: f64) -> Self {
        self.combined_score_threshold = threshold;
        self
    }
}

// Predefined configurations
impl TestConfig {
    /// Byte-string comparison: cheap, so many iterations per sample
    pub fn for_comparison() -> Self {
        Self::default()
            .with_samples_and_iterations(50, 2000)
            .with_t_stat_threshold(1.7)
            .with_combined_score_threshold(1.8)
    }

    /// Full decapsulation: expensive, fewer iterations and a wider band
    pub fn for_decapsulation() -> Self {
        Self::default()
            .with_mean_ratio_range(0.75, 1.35)
            .with_warmup(20)
            .with_samples_and_iterations(30, 20)
            .with_t_stat_threshold(2.2)
            .with_combined_score_threshold(2.2)
    }
}
