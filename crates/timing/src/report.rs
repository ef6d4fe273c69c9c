//! Report data model
//!
//! Everything here is plain data, built once at the end of a run and
//! serializable to JSON.

use std::collections::BTreeMap;
use std::fmt;

use kemscope_kem::Countermeasures;
use kemscope_params::ParameterSet;
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::normality::NormalityResult;
use crate::stats::{self, OutlierSummary, Summary, WelchTest};
use crate::verdict::Verdict;

/// Timed operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Keygen,
    Encaps,
    Decaps,
    /// Decapsulation of a random ciphertext
    DecapsInvalid,
}

impl Operation {
    /// All kinds in trial order
    pub const ALL: [Operation; 4] = [
        Operation::Keygen,
        Operation::Encaps,
        Operation::Decaps,
        Operation::DecapsInvalid,
    ];

    /// Kinds whose variation feeds the verdict
    pub const VERDICT: [Operation; 3] = [Operation::Keygen, Operation::Encaps, Operation::Decaps];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keygen => "keygen",
            Self::Encaps => "encaps",
            Self::Decaps => "decaps",
            Self::DecapsInvalid => "decaps_invalid",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered durations of one operation kind, in seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingSampleSet {
    samples: Vec<f64>,
}

impl TimingSampleSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Append one measurement
    pub fn push(&mut self, seconds: f64) {
        self.samples.push(seconds);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }
}

impl From<Vec<f64>> for TimingSampleSet {
    fn from(samples: Vec<f64>) -> Self {
        Self { samples }
    }
}

/// Mean side-channel counters observed after each call of one operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterSummary {
    pub mean_memory_accesses: f64,
    pub mean_conditional_branches: f64,
}

/// Statistics of one operation kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalReport {
    #[serde(flatten)]
    pub summary: Summary,
    /// `stdev / mean × 100`, absent when the mean is zero
    pub coefficient_of_variation: Option<f64>,
    pub normality: NormalityResult,
    pub outliers: OutlierSummary,
    pub counters: CounterSummary,
    /// Raw samples, omitted from compact JSON
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub samples: Option<TimingSampleSet>,
}

impl StatisticalReport {
    /// Compute every statistic `config` asks for
    pub fn from_samples(
        samples: TimingSampleSet,
        counters: CounterSummary,
        config: &AnalyzerConfig,
    ) -> Self {
        let data = samples.as_slice();
        let summary = Summary::from_samples(data);
        Self {
            coefficient_of_variation: stats::coefficient_of_variation(summary.mean, summary.stdev),
            normality: NormalityResult::evaluate(
                data,
                config.normality_sample_limit,
                config.normality_alpha,
            ),
            outliers: stats::iqr_outliers(data, config.outlier_iqr_factor),
            summary,
            counters,
            samples: Some(samples),
        }
    }
}

/// Valid vs invalid decapsulation timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Differential {
    Computed(WelchTest),
    NotComputed { reason: String },
}

/// Parameters as recorded in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSummary {
    pub name: String,
    pub n: usize,
    pub k: usize,
    pub q: u32,
    pub eta1: u8,
    pub eta2: u8,
    pub du: usize,
    pub dv: usize,
}

impl From<&ParameterSet> for ParameterSummary {
    fn from(params: &ParameterSet) -> Self {
        Self {
            name: params.name.to_string(),
            n: params.n,
            k: params.k,
            q: params.q,
            eta1: params.eta1,
            eta2: params.eta2,
            du: params.du,
            dv: params.dv,
        }
    }
}

/// Everything one analysis run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub parameter_set: ParameterSummary,
    pub countermeasures: Countermeasures,
    pub requested_trials: usize,
    /// Smaller than `requested_trials` when the run was stopped early
    pub completed_trials: usize,
    pub operations: BTreeMap<Operation, StatisticalReport>,
    pub differential: Differential,
    pub verdict: Verdict,
}

impl AnalysisReport {
    pub fn operation(&self, op: Operation) -> Option<&StatisticalReport> {
        self.operations.get(&op)
    }

    /// Whether the run stopped before all requested trials
    pub fn is_partial(&self) -> bool {
        self.completed_trials < self.requested_trials
    }

    /// Drop raw samples, keeping only statistics
    pub fn without_samples(mut self) -> Self {
        for report in self.operations.values_mut() {
            report.samples = None;
        }
        self
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Hardened vs unhardened maximum variation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunComparison {
    pub hardened_max_cv: Option<f64>,
    pub unhardened_max_cv: Option<f64>,
    /// `(unhardened − hardened) / unhardened × 100`
    pub improvement_percent: Option<f64>,
}

/// Compare the verdict CVs of two runs
pub fn compare_runs(hardened: &AnalysisReport, unhardened: &AnalysisReport) -> RunComparison {
    let hardened_max_cv = hardened.verdict.max_cv_percent;
    let unhardened_max_cv = unhardened.verdict.max_cv_percent;
    let improvement_percent = match (hardened_max_cv, unhardened_max_cv) {
        (Some(h), Some(u)) if u != 0.0 => Some((u - h) / u * 100.0),
        _ => None,
    };
    RunComparison {
        hardened_max_cv,
        unhardened_max_cv,
        improvement_percent,
    }
}
