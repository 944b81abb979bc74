//! Runtime adapters implementing the timer and clock traits.
#[cfg(feature = "embassy-time")]
pub mod embassy;
