//! Extendable Output Functions (XOF)
//!
//! The harness only needs a deterministic byte expander: the same input must
//! always yield the same stream, and a shorter request must be a prefix of a
//! longer one. [`CounterXof`] provides that by hashing `input ‖ counter`
//! block by block.

mod counter;

pub use counter::CounterXof;

/// Trait for extendable output functions
pub trait ExtendableOutputFunction {
    /// Creates a new instance of the XOF
    fn new() -> Self;

    /// Absorbs more input. Must be called before the first squeeze.
    fn update(&mut self, data: &[u8]);

    /// Squeezes output bytes into the provided buffer, continuing the stream
    fn squeeze(&mut self, output: &mut [u8]);

    /// Squeezes the specified number of output bytes into a new vector
    fn squeeze_into_vec(&mut self, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        self.squeeze(&mut out);
        out
    }

    /// Convenience method to generate output in a single call
    fn generate(data: &[u8], len: usize) -> Vec<u8>
    where
        Self: Sized,
    {
        let mut xof = Self::new();
        xof.update(data);
        xof.squeeze_into_vec(len)
    }
}

/// One-shot expansion of the concatenation of `parts` with [`CounterXof`]
pub fn expand(parts: &[&[u8]], len: usize) -> Vec<u8> {
    let mut xof = CounterXof::new();
    for part in parts {
        xof.update(part);
    }
    xof.squeeze_into_vec(len)
}
