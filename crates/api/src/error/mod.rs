//! Error handling for the harness
//!
//! Only configuration problems are errors. The KEM operations themselves
//! have no failure path and statistical failures are recorded in reports.

pub mod types;

pub use types::{Error, Result};

/// Specialized result for configuration loading and validation
pub type ConfigResult<T> = Result<T>;
