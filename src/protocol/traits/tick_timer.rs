//! Asynchronous timer abstraction providing the delay primitive behind every
//! periodic and one-shot tick.

/// Timer trait abstraction; must remain thread-safe when applicable.
///
/// One instance is owned by each producer, so implementations may keep
/// per-timer state (a hardware alarm, a counter in tests).
pub trait TickTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(
        &'a mut self,
        millis: u32,
    ) -> impl core::future::Future<Output = ()> + 'a;
}
