//! Pull-based asynchronous iteration contract consumed by the query-execution
//! layer: `next` awaits one step, `close` (the protocol's `return`) and `throw`
//! end iteration early.
use core::fmt::Debug;
use core::future::Future;

use crate::core::IterStep;
use crate::error::BridgeError;

/// Asynchronous pull iterator with early-termination hooks.
///
/// Calls are sequential: `next` takes `&mut self`, so a new pull can only start
/// once the previous one has been observed.
pub trait PullIterator {
    /// Value type carried by [`IterStep::Yielded`].
    type Item;

    /// Await the next step. Resolves to [`IterStep::Done`] once terminated.
    fn next<'a>(&'a mut self) -> impl Future<Output = IterStep<Self::Item>> + 'a;

    /// Stop iteration. Idempotent; always returns [`IterStep::Done`].
    fn close(&mut self) -> IterStep<Self::Item>;

    /// Stop iteration because of an external failure and hand the failure back.
    ///
    /// # Errors
    ///
    /// Always returns [`BridgeError::ExternalCancellation`] carrying `error`.
    fn throw<E: Debug>(&mut self, error: E) -> Result<IterStep<Self::Item>, BridgeError<E>>;
}
