//! Countermeasure strategy and execution randomization

use core::fmt;
use core::hint::black_box;

use kemscope_algorithms::masking::MaskingScheme;
use kemscope_algorithms::poly::mul_mod;
use kemscope_algorithms::{RejectionPolicy, TransformMode};
use rand::{Rng, RngCore};

/// Bounds on the number of dummy multiplications per operation
const DUMMY_OPS_MIN: usize = 10;
const DUMMY_OPS_MAX: usize = 50;

/// Whether a [`KemCore`](super::KemCore) runs hardened. Fixed at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Countermeasures {
    /// Constant-time compare and select, masked transform, select-then-pop
    /// sampling and execution randomization
    Enabled,
    /// Direct comparisons and branches everywhere
    Disabled,
}

impl Countermeasures {
    /// Both settings, hardened first
    pub const ALL: [Countermeasures; 2] = [Countermeasures::Enabled, Countermeasures::Disabled];

    /// Map a boolean toggle
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    /// Whether countermeasures are active
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }

    /// Short label used in reports and file names
    pub fn label(self) -> &'static str {
        match self {
            Self::Enabled => "hardened",
            Self::Disabled => "unhardened",
        }
    }

    pub(crate) fn rejection_policy(self) -> RejectionPolicy {
        match self {
            Self::Enabled => RejectionPolicy::SelectThenPop,
            Self::Disabled => RejectionPolicy::Branching,
        }
    }

    pub(crate) fn transform_mode(self, scheme: MaskingScheme) -> TransformMode {
        match self {
            Self::Enabled => TransformMode::Masked(scheme),
            Self::Disabled => TransformMode::Plain,
        }
    }
}

impl fmt::Display for Countermeasures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Run 10 to 50 throwaway modular multiplications on fresh random operands.
///
/// Returns the number of operations performed. The results are discarded.
pub(crate) fn randomize_execution<R: RngCore>(rng: &mut R, q: u32) -> usize {
    let ops = rng.gen_range(DUMMY_OPS_MIN..=DUMMY_OPS_MAX);
    for _ in 0..ops {
        let value = rng.gen_range(0..q);
        let factor = rng.gen_range(1..=100u32);
        black_box(mul_mod(value, factor, q));
    }
    ops
}
