//! Direct (non-subscription) resolution of a single tick: wait one period,
//! then stamp the value. Same timer primitive as the bridge, no queues.
use crate::core::{Period, Tick};
use crate::protocol::traits::{tick_clock::TickClock, tick_timer::TickTimer};

/// Resolve one tick after `period` has elapsed.
///
/// There is exactly one producer event and one consumer, so the value is
/// returned straight from the delay; its sequence number is always 1.
pub async fn resolve_once<T: TickTimer, C: TickClock>(
    timer: &mut T,
    clock: &C,
    period: Period,
) -> Tick {
    #[cfg(feature = "defmt")]
    defmt::trace!("resolving one tick after {}ms", period.as_millis());

    timer.delay_ms(period.as_millis()).await;
    Tick {
        at_ms: clock.now_ms(),
        sequence: 1,
    }
}
