//! ntt.rs - Butterfly transform over a flat polynomial vector
//!
//! The transform is a stand-in for the number-theoretic transform: it has the
//! same memory-access shape (log-many layers of stride-doubling butterflies)
//! but no twiddle factors. That is enough to give the harness a data-parallel
//! hot loop to time and instrument.
//!
//! ## Layout
//! The input has length `L = k · n`. Layer strides are `1, 2, 4, ...` while
//! the stride is below `L`, so there are `⌈log2 L⌉` layers. When `L` is not a
//! power of two a butterfly whose partner index falls outside the array is
//! skipped. The skip depends only on `L`.

use std::time::Instant;

use kemscope_common::SideChannelCounters;
use rand::RngCore;

use super::{add_mod, sub_mod};
use crate::masking::MaskingScheme;

/// How butterfly operands are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    /// Butterflies operate on the coefficients directly
    Plain,
    /// Each operand is masked before the butterfly. Masks are not carried
    /// through, so the output differs from the plain transform.
    Masked(MaskingScheme),
}

/// Forward butterfly transform mod q
#[derive(Debug, Clone, Copy)]
pub struct ButterflyTransform {
    q: u32,
    mode: TransformMode,
}

impl ButterflyTransform {
    /// Transform in the given mode
    pub fn new(q: u32, mode: TransformMode) -> Self {
        Self { q, mode }
    }

    /// Unmasked transform
    pub fn plain(q: u32) -> Self {
        Self::new(q, TransformMode::Plain)
    }

    /// Transform masking every operand with `scheme`
    pub fn masked(q: u32, scheme: MaskingScheme) -> Self {
        Self::new(q, TransformMode::Masked(scheme))
    }

    /// Operand handling of this transform
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    /// Transform `coeffs` in place. Coefficients must be in `[0, q)`.
    ///
    /// Every butterfly records two memory accesses and the duration of the
    /// whole call is appended to `counters`. Randomness is drawn only in
    /// masked mode.
    pub fn forward<R: RngCore>(
        &self,
        coeffs: &mut [u32],
        counters: &mut SideChannelCounters,
        rng: &mut R,
    ) {
        let start = Instant::now();
        let len = coeffs.len();
        let q = self.q;

        let mut stride = 1usize;
        while stride < len {
            for block in (0..len).step_by(stride << 1) {
                for j in 0..stride {
                    let a = block + j;
                    let b = a + stride;
                    if b >= len {
                        break;
                    }

                    let (u, v) = match self.mode {
                        TransformMode::Plain => (coeffs[a], coeffs[b]),
                        TransformMode::Masked(scheme) => (
                            scheme.mask(coeffs[a], q, rng).masked_value,
                            scheme.mask(coeffs[b], q, rng).masked_value,
                        ),
                    };
                    counters.record_memory_access(2);

                    coeffs[a] = add_mod(u, v, q);
                    coeffs[b] = sub_mod(u, v, q);
                }
            }
            stride <<= 1;
        }

        counters.record_timing(start.elapsed());
    }
}

/// Number of butterflies [`ButterflyTransform::forward`] performs on `len`
/// coefficients
pub fn butterfly_count(len: usize) -> usize {
    let mut count = 0;
    let mut stride = 1usize;
    while stride < len {
        for block in (0..len).step_by(stride << 1) {
            count += stride.min(len.saturating_sub(block + stride));
        }
        stride <<= 1;
    }
    count
}
