//! # Quickstart Example
//!
//! Minimal example demonstrating the basics of tick-bridge:
//! - Subscribe to a clock with a validated period
//! - Pull a few ticks while the producer runs next to the consumer
//! - Return early and observe the terminal state
//! - Resolve a single tick without a subscription
//!
//! This example uses `std` and tokio for a quick trial run.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use std::time::Instant;

use tick_bridge::protocol::field::{ArgValue, ClockField, FieldArgs};
use tick_bridge::protocol::traits::{tick_clock::TickClock, tick_timer::TickTimer};
use tick_bridge::{subscribe, IterStep};
use tokio::time::{sleep, Duration};

#[derive(Clone, Copy)]
struct TokioTimer;

impl TickTimer for TokioTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

#[derive(Clone, Copy)]
struct WallClock(Instant);

impl TickClock for WallClock {
    fn now_ms(&self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== tick-bridge Quickstart ===\n");
    let clock = WallClock(Instant::now());

    // ======================================================================
    // 1. Subscribe with a 100 ms period
    // ======================================================================
    println!("1. Subscribing every 100 ms");

    let (mut ticks, producer) = match subscribe(Some(100), TokioTimer, clock) {
        Ok(parts) => parts.into_parts(),
        Err(e) => {
            eprintln!("   Subscription refused: {}", e);
            return;
        }
    };
    println!("   Producer running: {}\n", ticks.is_running());

    // ======================================================================
    // 2. Pull five ticks, then return
    // ======================================================================
    println!("2. Pulling five ticks");

    let driver = producer.drive();
    tokio::pin!(driver);

    let consumer = async {
        for _ in 0..5 {
            match ticks.next().await {
                IterStep::Yielded(tick) => {
                    println!("   tick #{} at {} ms", tick.sequence, tick.at_ms)
                }
                IterStep::Done => break,
            }
        }
        ticks.close();
    };
    tokio::join!(&mut driver, consumer);

    println!("   Producer running: {}", ticks.is_running());
    println!("   Next after return: {:?}\n", ticks.next().await);

    // ======================================================================
    // 3. Invalid period
    // ======================================================================
    println!("3. Subscribing without a period");

    if let Err(e) = subscribe(None, TokioTimer, clock) {
        println!("   Error: {}\n", e);
    }

    // ======================================================================
    // 4. One-shot resolution through the field adapter
    // ======================================================================
    println!("4. Resolving one tick after 250 ms");

    let field = ClockField::new(TokioTimer, clock);
    let args = [("period", ArgValue::Int(250))];
    match field.resolve(&FieldArgs::new(&args)).await {
        Ok(tick) => println!("   Resolved at {} ms\n", tick.at_ms),
        Err(e) => eprintln!("   Resolution error: {}\n", e),
    }

    // ======================================================================
    println!("Quickstart complete.");
}
