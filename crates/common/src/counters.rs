//! Side-channel instrumentation owned by a single KEM instance
//!
//! These counters are diagnostics, not cryptographic state. Each KEM core
//! owns exactly one set, hands it by `&mut` to the routines it calls, and
//! resets it at the start of every public operation. Counters are never
//! shared or aggregated across instances.

use std::time::Duration;

/// Observable events recorded during one public operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideChannelCounters {
    /// Element reads performed by the transform
    pub memory_accesses: u64,

    /// Accept/reject decisions taken by the uniform sampler
    pub conditional_branches: u64,

    /// Wall-clock durations: one per transform call, plus the whole operation
    pub timing_samples: Vec<Duration>,
}

/// Copy of the scalar counters, cheap to keep per trial
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterSnapshot {
    pub memory_accesses: u64,
    pub conditional_branches: u64,
    pub timing_samples: usize,
}

impl SideChannelCounters {
    /// Fresh, zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything. Called on entry to keygen, encapsulate, decapsulate.
    pub fn reset(&mut self) {
        self.memory_accesses = 0;
        self.conditional_branches = 0;
        self.timing_samples.clear();
    }

    /// Count `n` element reads
    #[inline(always)]
    pub fn record_memory_access(&mut self, n: u64) {
        self.memory_accesses += n;
    }

    /// Count one accept/reject decision
    #[inline(always)]
    pub fn record_branch(&mut self) {
        self.conditional_branches += 1;
    }

    /// Append a wall-clock duration
    pub fn record_timing(&mut self, elapsed: Duration) {
        self.timing_samples.push(elapsed);
    }

    /// Scalar view of the current state
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            memory_accesses: self.memory_accesses,
            conditional_branches: self.conditional_branches,
            timing_samples: self.timing_samples.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let mut counters = SideChannelCounters::new();
        counters.record_memory_access(2);
        counters.record_memory_access(2);
        counters.record_branch();
        counters.record_timing(Duration::from_micros(5));

        assert_eq!(
            counters.snapshot(),
            CounterSnapshot {
                memory_accesses: 4,
                conditional_branches: 1,
                timing_samples: 1,
            }
        );

        counters.reset();
        assert_eq!(counters, SideChannelCounters::default());
    }
}
