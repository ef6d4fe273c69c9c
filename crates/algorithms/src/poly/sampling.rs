//! sampling.rs - Seed-driven coefficient samplers
//!
//! Both samplers expand a seed with [`CounterXof`] and are fully
//! deterministic in that seed.

use kemscope_common::SideChannelCounters;
use kemscope_internal::constant_time::{lt_bit, reduce_mod, select};
use kemscope_internal::endian::u24_from_le_bytes;

use crate::xof::{CounterXof, ExtendableOutputFunction};

/// Candidate width of the uniform sampler
const CANDIDATE_BYTES: usize = 3;
const CANDIDATE_MASK: u32 = 0x00FF_FFFF;

/// How the uniform sampler handles a rejected candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionPolicy {
    /// Append only accepted candidates, behind a data-dependent branch
    Branching,
    /// Append `select(valid, candidate, 0)` for every candidate, then pop the
    /// entry again if the candidate was rejected. The pop is still a branch
    /// on the candidate, so this only narrows the leak.
    SelectThenPop,
}

/// Rejection-sample coefficients in `[0, q)` from `seed`.
///
/// The seed is expanded to `3 · len` bytes, each 3-byte little-endian chunk
/// is masked to 24 bits and accepted iff it is below `q`. With `q = 3329`
/// most candidates are rejected, so the result is usually far shorter than
/// `len`. One branch is counted per candidate.
pub fn sample_uniform(
    seed: &[u8],
    len: usize,
    q: u32,
    policy: RejectionPolicy,
    counters: &mut SideChannelCounters,
) -> Vec<u32> {
    let stream = CounterXof::generate(seed, len * CANDIDATE_BYTES);
    let mut out = Vec::with_capacity(len);

    for chunk in stream.chunks_exact(CANDIDATE_BYTES) {
        let candidate = u24_from_le_bytes(chunk) & CANDIDATE_MASK;
        counters.record_branch();

        match policy {
            RejectionPolicy::Branching => {
                if candidate < q {
                    out.push(candidate);
                }
            }
            RejectionPolicy::SelectThenPop => {
                let valid = lt_bit(candidate, q);
                out.push(select(valid, candidate, 0));
                if valid == 0 {
                    out.pop();
                }
            }
        }
    }

    out
}

/// Sample `len` small coefficients from `seed`, reduced into `[0, q)`.
///
/// Each XOF byte `b` maps to `(b mod (2·eta + 1)) − eta`. The map is not a
/// centered binomial and is slightly biased; it only has to produce small
/// values.
pub fn sample_centered(seed: &[u8], len: usize, eta: u8, q: u32) -> Vec<u32> {
    let width = 2 * eta as i64 + 1;
    CounterXof::generate(seed, len)
        .into_iter()
        .map(|b| reduce_mod((b as i64 % width) - eta as i64, q))
        .collect()
}
