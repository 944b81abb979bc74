//! Clock abstraction used to stamp ticks.

/// Monotonic millisecond clock.
pub trait TickClock {
    /// Current reading in milliseconds. Must never go backwards.
    fn now_ms(&self) -> u64;
}
