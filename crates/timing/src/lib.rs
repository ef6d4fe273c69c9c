//! Statistical timing analysis for the instrumented KEM
//!
//! A [`TimingAnalyzer`] drives a [`KemCore`](kemscope_kem::KemCore) through
//! repeated keygen / encapsulate / decapsulate trials, then summarizes each
//! operation's durations: descriptive statistics, coefficient of variation,
//! Shapiro–Wilk normality, IQR outliers and, for decapsulation, a Welch
//! t-test between valid and invalid ciphertexts. A [`VerdictPolicy`] turns
//! the largest coefficient of variation into a [`LeakageLevel`].
//!
//! The crate performs no file I/O. Reports render to text with
//! [`render_text`] and serialize with serde.

#![forbid(unsafe_code)]

pub mod analyzer;
pub mod config;
pub mod normality;
pub mod render;
pub mod report;
pub mod stats;
pub mod verdict;

pub use analyzer::TimingAnalyzer;
pub use config::AnalyzerConfig;
pub use normality::{shapiro_wilk, NormalityResult};
pub use render::{render_comparison, render_text};
pub use report::{
    compare_runs, AnalysisReport, CounterSummary, Differential, Operation, RunComparison,
    StatisticalReport, TimingSampleSet,
};
pub use stats::{welch_t_test, OutlierSummary, Summary, WelchTest};
pub use verdict::{LeakageLevel, Verdict, VerdictPolicy};
