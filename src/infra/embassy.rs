//! `embassy-time` backed timer and clock.
//!
//! Both read the global embassy time driver, so the final binary must link one
//! (as any embassy application does).
use embassy_time::{Instant, Timer};

use crate::protocol::traits::{tick_clock::TickClock, tick_timer::TickTimer};

/// Delay primitive on top of [`embassy_time::Timer`].
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyTimer;

impl TickTimer for EmbassyTimer {
    async fn delay_ms(&mut self, millis: u32) {
        Timer::after_millis(u64::from(millis)).await;
    }
}

/// Monotonic clock reading [`embassy_time::Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyClock;

impl TickClock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
