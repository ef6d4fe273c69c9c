//! Shared helpers for the kemscope integration tests
pub mod constant_time;

use kemscope_kem::{Countermeasures, KemCore};
use kemscope_params::ParameterSet;

/// Seeded KEM instance for every registered set under one setting
pub fn seeded_instances(countermeasures: Countermeasures, seed: u64) -> Vec<KemCore> {
    ParameterSet::all()
        .iter()
        .map(|params| KemCore::with_seed(params, countermeasures, seed))
        .collect()
}
