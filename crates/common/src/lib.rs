//! Common implementations and shared functionality for kemscope
//!
//! This crate holds the per-instance side-channel instrumentation and the
//! zeroizing buffers used for seeds and intermediate secrets.

pub mod counters;
pub mod security;

pub use counters::{CounterSnapshot, SideChannelCounters};
pub use security::{SecretBuffer, SecretVec};
