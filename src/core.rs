//! Core data types shared by the bridge, the resolve-once path and the field
//! adapter: tick values, validated periods, lifecycle phases and iteration steps.
use crate::error::PeriodError;

//==================================================================================TICK
/// One value produced by a timer firing.
///
/// Ticks are immutable once produced. Ordering follows the clock reading first,
/// then the per-subscription sequence number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// Clock reading (milliseconds) taken when the timer fired.
    pub at_ms: u64,
    /// Position of the firing within its subscription, starting at 1.
    pub sequence: u64,
}

//==================================================================================PERIOD
/// Validated timer period in milliseconds. Always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Period(u32);

impl Period {
    /// Build a period from a raw millisecond count.
    pub fn from_millis(millis: u32) -> Result<Self, PeriodError> {
        if millis == 0 {
            return Err(PeriodError::NonPositive { period: 0 });
        }
        Ok(Self(millis))
    }

    /// Validate a loosely typed period as handed over by a caller.
    ///
    /// `None` maps to [`PeriodError::Missing`]; values outside `1..=max_ms`
    /// are rejected.
    pub fn from_arg(period: Option<i64>, max_ms: u32) -> Result<Self, PeriodError> {
        let period = period.ok_or(PeriodError::Missing)?;
        if period <= 0 {
            return Err(PeriodError::NonPositive { period });
        }
        if period > i64::from(max_ms) {
            return Err(PeriodError::TooLarge {
                period,
                max: max_ms,
            });
        }
        // In range of `u32` after the upper bound check.
        Ok(Self(period as u32))
    }

    /// Period as milliseconds, the unit expected by [`TickTimer`](crate::protocol::traits::tick_timer::TickTimer).
    pub fn as_millis(&self) -> u32 {
        self.0
    }
}

//==================================================================================PHASE
/// Lifecycle of a bridge. `Stopped` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgePhase {
    /// Created, timer not armed yet.
    Idle,
    /// Timer armed; firings are delivered.
    Running,
    /// Timer revoked; nothing will ever be delivered again.
    Stopped,
}

/// What moved a bridge into [`BridgePhase::Stopped`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopCause {
    /// The consumer called `close` (the `return` half of the protocol).
    Returned,
    /// The consumer called `throw` with an external failure.
    Thrown,
    /// An upstream [`BridgeHandle`](crate::protocol::bridge::BridgeHandle) cancelled the subscription.
    Cancelled,
    /// The consumer handle was dropped without closing.
    ConsumerDropped,
    /// The producer half was dropped and can no longer fire.
    ProducerDropped,
}

//==================================================================================ITER_STEP
/// Result of one pull: either a value (`done = false`) or the terminal marker
/// (`done = true`, no value).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IterStep<T> {
    /// A value was produced.
    Yielded(T),
    /// Iteration is over.
    Done,
}

impl<T> IterStep<T> {
    /// `true` for the terminal step.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The carried value, absent on the terminal step.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Yielded(value) => Some(value),
            Self::Done => None,
        }
    }
}

impl<T> From<Option<T>> for IterStep<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Yielded(value),
            None => Self::Done,
        }
    }
}
