//! Two-input timing micro-harness
//!
//! Runs a closure under input class A and input class B, then compares the
//! two timing distributions with a Welch t-test.

pub mod config;
pub mod tester;

pub use config::TestConfig;
pub use tester::{generate_test_insights, TimingAnalysis, TimingTester};
