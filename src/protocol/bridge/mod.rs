//! Interval iterator bridge: turns the push-based firings of a periodic timer
//! into pull-based asynchronous iteration for exactly one consumer.
//!
//! [`subscribe`] validates the period, creates one bridge and arms it. It hands
//! back two halves:
//!
//! * [`TickIterator`], the consumer side (`next` / `close` / `throw`);
//! * [`TickProducer`], the runner owning the timer. Its [`drive`](TickProducer::drive)
//!   future must be polled by the caller's executor, next to the consumer.
//!
//! Both queues (buffered ticks and suspended `next` calls) and the lifecycle
//! phase sit behind one [`embassy_sync`] blocking mutex. Deliveries, withdrawals
//! and the `Running → Stopped` transition all happen inside that critical
//! section, so at most one of the two queues is ever non-empty and a firing that
//! races a shutdown is either delivered whole or discarded whole.

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use core::cell::RefCell;
use core::fmt::Debug;

use embassy_sync::{
    blocking_mutex::{
        raw::{CriticalSectionRawMutex, RawMutex},
        Mutex,
    },
    signal::Signal,
};
use futures_util::{
    future::{select, Either},
    pin_mut, Stream,
};

use crate::core::{BridgePhase, IterStep, Period, StopCause, Tick};
use crate::error::BridgeError;
use crate::protocol::traits::{
    pull_iterator::PullIterator, tick_clock::TickClock, tick_timer::TickTimer,
};

//==================================================================================SUBSCRIBE
/// Validate `period` (milliseconds) and arm a bridge using the default
/// critical-section mutex.
///
/// # Errors
///
/// [`BridgeError::InvalidArgument`] when the period is absent or not a
/// positive `u32` millisecond count. Nothing is armed in that case.
pub fn subscribe<T: TickTimer, C: TickClock>(
    period: Option<i64>,
    timer: T,
    clock: C,
) -> Result<SubscriptionParts<T, C>, BridgeError> {
    subscribe_with_mutex::<CriticalSectionRawMutex, T, C>(period, timer, clock)
}

/// Same as [`subscribe`] with a caller-chosen raw mutex flavour
/// (e.g. `NoopRawMutex` on a single-threaded executor).
pub fn subscribe_with_mutex<M: RawMutex, T: TickTimer, C: TickClock>(
    period: Option<i64>,
    timer: T,
    clock: C,
) -> Result<SubscriptionParts<T, C, M>, BridgeError> {
    let period = Period::from_arg(period, u32::MAX)?;
    Ok(arm(period, timer, clock))
}

/// Arm a bridge for an already validated period.
pub fn arm<M: RawMutex, T: TickTimer, C: TickClock>(
    period: Period,
    timer: T,
    clock: C,
) -> SubscriptionParts<T, C, M> {
    let shared = Arc::new(Shared::new(period));
    shared.arm();

    SubscriptionParts {
        ticks: TickIterator {
            shared: shared.clone(),
        },
        producer: TickProducer {
            shared,
            timer,
            clock,
        },
    }
}

/// Bundle returned by [`subscribe`].
pub struct SubscriptionParts<T, C, M = CriticalSectionRawMutex>
where
    T: TickTimer,
    C: TickClock,
    M: RawMutex,
{
    pub ticks: TickIterator<M>,
    pub producer: TickProducer<T, C, M>,
}

impl<T, C, M> SubscriptionParts<T, C, M>
where
    T: TickTimer,
    C: TickClock,
    M: RawMutex,
{
    /// Split into consumer and producer halves.
    pub fn into_parts(self) -> (TickIterator<M>, TickProducer<T, C, M>) {
        (self.ticks, self.producer)
    }
}

//==================================================================================SHARED_STATE
/// What a suspended `next` call is woken with.
enum Delivery {
    Tick(Tick),
    Finished,
}

type Request<M> = Arc<Signal<M, Delivery>>;

/// State guarded by the bridge mutex.
struct Rendezvous<M: RawMutex> {
    phase: BridgePhase,
    stop_cause: Option<StopCause>,
    /// Ticks fired while no request was waiting.
    values: VecDeque<Tick>,
    /// Suspended `next` calls, oldest first.
    requests: VecDeque<Request<M>>,
    fired: u64,
}

/// Outcome of starting a `next` call.
enum Claim<M: RawMutex> {
    Ready(IterStep<Tick>),
    Parked(Request<M>),
}

/// State shared by the consumer, the producer and any [`BridgeHandle`].
struct Shared<M: RawMutex> {
    period: Period,
    inner: Mutex<M, RefCell<Rendezvous<M>>>,
    /// Wakes the producer loop on shutdown.
    halt: Signal<M, ()>,
}

impl<M: RawMutex> Shared<M> {
    fn new(period: Period) -> Self {
        Self {
            period,
            inner: Mutex::new(RefCell::new(Rendezvous {
                phase: BridgePhase::Idle,
                stop_cause: None,
                values: VecDeque::new(),
                requests: VecDeque::new(),
                fired: 0,
            })),
            halt: Signal::new(),
        }
    }

    /// `Idle → Running`. No effect in any other phase.
    fn arm(&self) -> bool {
        self.inner.lock(|cell| {
            let mut state = cell.borrow_mut();
            if state.phase != BridgePhase::Idle {
                return false;
            }
            state.phase = BridgePhase::Running;

            #[cfg(feature = "defmt")]
            defmt::debug!("tick bridge armed: period={}ms", self.period.as_millis());
            true
        })
    }

    /// Producer side of one timer firing.
    ///
    /// Returns `false` when the bridge is no longer running and the firing was
    /// discarded.
    fn fire(&self, at_ms: u64) -> bool {
        self.inner.lock(|cell| {
            let mut state = cell.borrow_mut();
            if state.phase != BridgePhase::Running {
                #[cfg(feature = "defmt")]
                defmt::trace!("tick bridge: firing ignored, bridge not running");
                return false;
            }

            state.fired += 1;
            let tick = Tick {
                at_ms,
                sequence: state.fired,
            };

            // Direct hand-off keeps the value queue empty while someone waits.
            match state.requests.pop_front() {
                Some(request) => request.signal(Delivery::Tick(tick)),
                None => state.values.push_back(tick),
            }
            true
        })
    }

    /// Consumer side of `next`: take a buffered tick or register a request.
    fn claim(&self) -> Claim<M> {
        self.inner.lock(|cell| {
            let mut state = cell.borrow_mut();
            if state.phase != BridgePhase::Running {
                return Claim::Ready(IterStep::Done);
            }
            if let Some(tick) = state.values.pop_front() {
                return Claim::Ready(IterStep::Yielded(tick));
            }

            let request = Arc::new(Signal::new());
            state.requests.push_back(request.clone());
            Claim::Parked(request)
        })
    }

    /// Undo a request whose `next` future was dropped before completing.
    ///
    /// A tick already handed to it goes back to the head of the line so the
    /// firing is not lost.
    fn withdraw(&self, request: &Request<M>) {
        self.inner.lock(|cell| {
            let mut state = cell.borrow_mut();
            let position = state
                .requests
                .iter()
                .position(|pending| Arc::ptr_eq(pending, request));
            if let Some(position) = position {
                state.requests.remove(position);
                return;
            }

            if let Some(Delivery::Tick(tick)) = request.try_take() {
                if state.phase != BridgePhase::Running {
                    return;
                }
                match state.requests.pop_front() {
                    Some(next) => next.signal(Delivery::Tick(tick)),
                    None => state.values.push_front(tick),
                }
            }
        })
    }

    /// `Running → Stopped` (or `Idle → Stopped`). Idempotent.
    ///
    /// Returns `true` only for the call that performed the transition.
    fn shutdown(&self, cause: StopCause) -> bool {
        let stopped = self.inner.lock(|cell| {
            let mut state = cell.borrow_mut();
            if state.phase == BridgePhase::Stopped {
                return false;
            }
            state.phase = BridgePhase::Stopped;
            state.stop_cause = Some(cause);
            state.values.clear();
            for request in state.requests.drain(..) {
                request.signal(Delivery::Finished);
            }

            #[cfg(feature = "defmt")]
            defmt::debug!(
                "tick bridge stopped: cause={}, fired={}",
                cause,
                state.fired
            );
            true
        });

        if stopped {
            self.halt.signal(());
        }
        stopped
    }

    fn is_running(&self) -> bool {
        self.inner
            .lock(|cell| cell.borrow().phase == BridgePhase::Running)
    }

    fn status(&self) -> BridgeStatus {
        self.inner.lock(|cell| {
            let state = cell.borrow();
            BridgeStatus {
                phase: state.phase,
                stop_cause: state.stop_cause,
                period: self.period,
                pending_values: state.values.len(),
                pending_requests: state.requests.len(),
                fired: state.fired,
            }
        })
    }
}

//==================================================================================STATUS
/// Point-in-time snapshot of a bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BridgeStatus {
    pub phase: BridgePhase,
    /// Set once the bridge has stopped.
    pub stop_cause: Option<StopCause>,
    pub period: Period,
    /// Ticks buffered for the consumer.
    pub pending_values: usize,
    /// Suspended `next` calls.
    pub pending_requests: usize,
    /// Firings accepted while running.
    pub fired: u64,
}

//==================================================================================CONSUMER
/// Consumer half of a subscription.
///
/// Dropping the iterator stops the bridge ([`StopCause::ConsumerDropped`]).
pub struct TickIterator<M: RawMutex = CriticalSectionRawMutex> {
    shared: Arc<Shared<M>>,
}

impl<M: RawMutex> TickIterator<M> {
    /// Await the next tick.
    ///
    /// Returns a buffered tick immediately when one is waiting, otherwise
    /// suspends until the timer fires or the bridge stops. Once stopped, every
    /// call resolves immediately to [`IterStep::Done`].
    ///
    /// Dropping the returned future before it completes withdraws the request
    /// without losing a tick.
    pub async fn next(&mut self) -> IterStep<Tick> {
        let request = match self.shared.claim() {
            Claim::Ready(step) => return step,
            Claim::Parked(request) => request,
        };

        let mut pending = PendingRequest {
            shared: &self.shared,
            request,
            settled: false,
        };
        let delivery = pending.request.wait().await;
        pending.settled = true;

        match delivery {
            Delivery::Tick(tick) => IterStep::Yielded(tick),
            Delivery::Finished => IterStep::Done,
        }
    }

    /// The protocol's `return`: stop the bridge and finish iteration.
    ///
    /// Idempotent. Buffered ticks are discarded and any suspended `next` call
    /// resolves to [`IterStep::Done`]. When this returns the producer can no
    /// longer deliver anything.
    pub fn close(&mut self) -> IterStep<Tick> {
        self.shared.shutdown(StopCause::Returned);
        IterStep::Done
    }

    /// Stop the bridge because of an external failure and hand the failure back.
    ///
    /// # Errors
    ///
    /// Always [`BridgeError::ExternalCancellation`] wrapping `error`.
    pub fn throw<E: Debug>(&mut self, error: E) -> Result<IterStep<Tick>, BridgeError<E>> {
        self.shared.shutdown(StopCause::Thrown);
        Err(BridgeError::ExternalCancellation(error))
    }

    /// Producer-active indicator for this subscription.
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    pub fn status(&self) -> BridgeStatus {
        self.shared.status()
    }

    /// Observer / cancellation handle usable after the iterator has been moved.
    pub fn handle(&self) -> BridgeHandle<M> {
        BridgeHandle {
            shared: self.shared.clone(),
        }
    }

    /// Adapt into a [`Stream`] ending when the bridge stops.
    pub fn into_stream(self) -> impl Stream<Item = Tick> {
        futures_util::stream::unfold(self, |mut ticks| async move {
            ticks.next().await.value().map(|tick| (tick, ticks))
        })
    }
}

impl<M: RawMutex> Drop for TickIterator<M> {
    fn drop(&mut self) {
        self.shared.shutdown(StopCause::ConsumerDropped);
    }
}

impl<M: RawMutex> PullIterator for TickIterator<M> {
    type Item = Tick;

    fn next<'a>(&'a mut self) -> impl core::future::Future<Output = IterStep<Tick>> + 'a {
        TickIterator::next(self)
    }

    fn close(&mut self) -> IterStep<Tick> {
        TickIterator::close(self)
    }

    fn throw<E: Debug>(&mut self, error: E) -> Result<IterStep<Tick>, BridgeError<E>> {
        TickIterator::throw(self, error)
    }
}

/// Drop guard for a suspended `next` call.
struct PendingRequest<'a, M: RawMutex> {
    shared: &'a Shared<M>,
    request: Request<M>,
    settled: bool,
}

impl<M: RawMutex> Drop for PendingRequest<'_, M> {
    fn drop(&mut self) {
        if !self.settled {
            self.shared.withdraw(&self.request);
        }
    }
}

//==================================================================================HANDLE
/// Cloneable handle for observers and upstream cancellation.
pub struct BridgeHandle<M: RawMutex = CriticalSectionRawMutex> {
    shared: Arc<Shared<M>>,
}

impl<M: RawMutex> Clone for BridgeHandle<M> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<M: RawMutex> BridgeHandle<M> {
    /// Producer-active indicator.
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    pub fn status(&self) -> BridgeStatus {
        self.shared.status()
    }

    /// Stop the subscription from upstream (e.g. the client disconnected).
    ///
    /// Returns `true` if this call stopped the bridge, `false` if it was
    /// already stopped.
    pub fn cancel(&self) -> bool {
        self.shared.shutdown(StopCause::Cancelled)
    }
}

//==================================================================================PRODUCER
/// Producer half: owns the timer and the clock.
///
/// Dropping it stops the bridge ([`StopCause::ProducerDropped`]) so a waiting
/// consumer is finished instead of stranded.
pub struct TickProducer<T, C, M = CriticalSectionRawMutex>
where
    T: TickTimer,
    C: TickClock,
    M: RawMutex,
{
    shared: Arc<Shared<M>>,
    timer: T,
    clock: C,
}

impl<T, C, M> TickProducer<T, C, M>
where
    T: TickTimer,
    C: TickClock,
    M: RawMutex,
{
    /// Fire once per period until the bridge stops.
    ///
    /// Each wait races the timer against the halt signal, so a shutdown ends
    /// the loop on its next poll and the timer is dropped with `self`.
    pub async fn drive(mut self) {
        let period = self.shared.period.as_millis();

        loop {
            let fired = {
                let delay = self.timer.delay_ms(period);
                let halted = self.shared.halt.wait();
                pin_mut!(delay);
                pin_mut!(halted);

                matches!(select(delay, halted).await, Either::Left(_))
            };
            if !fired {
                break;
            }

            let at_ms = self.clock.now_ms();
            if !self.shared.fire(at_ms) {
                break;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("tick producer exiting");
    }

    pub fn period(&self) -> Period {
        self.shared.period
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }
}

impl<T, C, M> Drop for TickProducer<T, C, M>
where
    T: TickTimer,
    C: TickClock,
    M: RawMutex,
{
    fn drop(&mut self) {
        self.shared.shutdown(StopCause::ProducerDropped);
    }
}
