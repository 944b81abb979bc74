//! Field adapter driven by execution-layer style arguments.
mod helpers {
    include!("helpers/mod.rs");
}

use helpers::{MockTimer, StdClock};
use tick_bridge::protocol::field::{ArgValue, ClockField, ClockFieldConfig, FieldArgs};
use tick_bridge::{BridgeError, IterStep, PeriodError};
use tokio::time::{timeout, Duration, Instant};

#[tokio::test]
/// A subscription built from arguments streams ticks until returned.
async fn subscription_from_arguments() {
    let timer = MockTimer::new();
    let field = ClockField::new(timer.clone(), StdClock::new());
    let args = [("period", ArgValue::Int(25))];

    let (mut ticks, producer) = field
        .subscribe(&FieldArgs::new(&args))
        .expect("period argument is valid")
        .into_parts();

    let driver = producer.drive();
    tokio::pin!(driver);

    let consumer = async {
        for sequence in 1..=3u64 {
            let step = ticks.next().await;
            assert_eq!(step.value().map(|tick| tick.sequence), Some(sequence));
        }
        ticks.close();
    };

    timeout(Duration::from_secs(5), async { tokio::join!(&mut driver, consumer) })
        .await
        .expect("field subscription must finish");

    assert!(!ticks.is_running());
    assert_eq!(ticks.next().await, IterStep::Done);
    assert!(timer.delays() >= 3);
}

#[tokio::test]
/// The same field answers a plain query with one tick after the period.
async fn direct_query_from_arguments() {
    let field = ClockField::new(MockTimer::new(), StdClock::new());
    let args = [("period", ArgValue::Int(40))];

    let started = Instant::now();
    let tick = field
        .resolve(&FieldArgs::new(&args))
        .await
        .expect("period argument is valid");

    assert!(started.elapsed() >= Duration::from_millis(40));
    assert_eq!(tick.sequence, 1);
}

#[tokio::test]
/// Configuration renames and caps the period argument.
async fn configured_argument_and_cap() {
    let config = ClockFieldConfig::builder()
        .argument("every")
        .max_period_ms(1_000)
        .build();
    let timer = MockTimer::new();
    let field = ClockField::with_config(config, timer.clone(), StdClock::new());

    let too_slow = [("every", ArgValue::Int(60_000))];
    let result = field.subscribe(&FieldArgs::new(&too_slow));
    assert!(matches!(
        result,
        Err(BridgeError::InvalidArgument(PeriodError::TooLarge { period: 60_000, max: 1_000 }))
    ));

    let wrong_type = [("every", ArgValue::Str("fast"))];
    let result = field.resolve(&FieldArgs::new(&wrong_type)).await;
    assert!(matches!(
        result,
        Err(BridgeError::InvalidArgument(PeriodError::NotAnInteger))
    ));

    assert_eq!(timer.delays(), 0);
}
