// Test doubles to drive the bridge with real time during integration tests.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tick_bridge::protocol::traits::{tick_clock::TickClock, tick_timer::TickTimer};
use tokio::time::{sleep, Duration};

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Timer based on `tokio::time::sleep`; counts every delay it starts.
pub struct MockTimer {
    delays: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of delays started so far, across clones.
    pub fn delays(&self) -> usize {
        self.delays.load(Ordering::SeqCst)
    }
}

impl TickTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        self.delays.fetch_add(1, Ordering::SeqCst);
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

#[derive(Clone)]
#[allow(dead_code)]
/// Monotonic clock counting milliseconds since its creation.
pub struct StdClock {
    origin: Instant,
}

#[allow(dead_code)]
impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TickClock for StdClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
