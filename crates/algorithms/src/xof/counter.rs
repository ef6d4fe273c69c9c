//! Counter-mode SHA-256 expander
//!
//! Block `i` of the output is `SHA-256(input ‖ le32(i))`. This emulates a
//! variable-length hash with a fixed-output one. Any true XOF could replace
//! it as long as output stays a deterministic function of the input.

use kemscope_internal::endian::u32_to_le_bytes;
use sha2::{Digest, Sha256};

use super::ExtendableOutputFunction;
use crate::hash::HASH_BYTES;

/// SHA-256 based extendable output
#[derive(Clone, Debug, Default)]
pub struct CounterXof {
    input: Vec<u8>,
    counter: u32,
    block: [u8; HASH_BYTES],
    offset: usize,
    squeezing: bool,
}

impl CounterXof {
    fn next_block(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(&self.input);
        hasher.update(u32_to_le_bytes(self.counter));
        self.block = hasher.finalize().into();
        self.counter = self.counter.wrapping_add(1);
        self.offset = 0;
    }
}

impl ExtendableOutputFunction for CounterXof {
    fn new() -> Self {
        Self {
            offset: HASH_BYTES,
            ..Self::default()
        }
    }

    fn update(&mut self, data: &[u8]) {
        debug_assert!(!self.squeezing, "CounterXof::update after squeeze");
        self.input.extend_from_slice(data);
    }

    fn squeeze(&mut self, output: &mut [u8]) {
        self.squeezing = true;
        let mut written = 0;
        while written < output.len() {
            if self.offset == HASH_BYTES {
                self.next_block();
            }
            let take = (HASH_BYTES - self.offset).min(output.len() - written);
            output[written..written + take]
                .copy_from_slice(&self.block[self.offset..self.offset + take]);
            self.offset += take;
            written += take;
        }
    }
}
