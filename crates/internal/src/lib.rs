//! Internal utilities for kemscope
//!
//! Branch-free selection, comparison and reduction used by every higher layer,
//! plus the little-endian readers the samplers and the XOF need.

pub mod constant_time;
pub mod endian;
