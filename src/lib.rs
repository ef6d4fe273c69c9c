//! # kemscope
//!
//! A side-channel resistance testing harness for a lattice-based key
//! encapsulation mechanism.
//!
//! ## Usage
//!
//! ```no_run
//! use kemscope::prelude::*;
//!
//! let mut kem = KemCore::from_name("ML-KEM-768", Countermeasures::Enabled)?;
//! let mut analyzer = TimingAnalyzer::new(AnalyzerConfig::default().with_samples(500))?;
//! let report = analyzer.run(&mut kem);
//! println!("{}", render_text(&report));
//! # Ok::<(), kemscope::api::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`kemscope-api`]: Error taxonomy, byte containers and the `Kem` trait
//! - [`kemscope-common`]: Side-channel counters and secret wrappers
//! - [`kemscope-internal`]: Constant-time primitives
//! - [`kemscope-params`]: Parameter-set registry
//! - [`kemscope-algorithms`]: XOF, masking, samplers and the butterfly transform
//! - [`kemscope-kem`]: The instrumented KEM core
//! - [`kemscope-timing`]: Statistical timing analyzer and reports

pub use kemscope_algorithms as algorithms;
pub use kemscope_api as api;
pub use kemscope_common as common;
pub use kemscope_internal as internal;
pub use kemscope_kem as kem;
pub use kemscope_params as params;
pub use kemscope_timing as timing;

/// Common imports for kemscope users
pub mod prelude {
    pub use crate::api::{Error, Result};

    pub use crate::api::{Ciphertext, Kem, KeyPair, PublicKey, SecretKey, SharedSecret};

    pub use crate::common::SideChannelCounters;

    pub use crate::kem::{Countermeasures, KemCore};

    pub use crate::params::ParameterSet;

    pub use crate::timing::{
        compare_runs, render_comparison, render_text, AnalysisReport, AnalyzerConfig,
        LeakageLevel, Operation, TimingAnalyzer,
    };
}
