//! Clock field tests: argument extraction, configuration and both entry points.
use super::*;

use core::future::Future;
use core::pin::pin;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use core::task::{Context, Poll};
use std::sync::Arc;

use futures_util::task::noop_waker_ref;

use crate::core::IterStep;

/// Timer completing at once and recording every requested delay.
#[derive(Clone, Default)]
struct RecordingTimer {
    last_delay_ms: Arc<AtomicU32>,
    delays: Arc<AtomicUsize>,
}

impl TickTimer for RecordingTimer {
    async fn delay_ms(&mut self, millis: u32) {
        self.last_delay_ms.store(millis, Ordering::SeqCst);
        self.delays.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
struct FixedClock(u64);

impl TickClock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

fn poll_once<F: Future>(future: core::pin::Pin<&mut F>) -> Poll<F::Output> {
    let mut cx = Context::from_waker(noop_waker_ref());
    future.poll(&mut cx)
}

//==================================================================================ARGS
#[test]
/// Period extraction accepts positive integers only.
fn test_period_from_args() {
    let config = ClockFieldConfig::default();

    let args = [("period", ArgValue::Int(50))];
    assert_eq!(
        period_from_args(&FieldArgs::new(&args), &config).map(|p| p.as_millis()),
        Ok(50)
    );

    assert_eq!(
        period_from_args(&FieldArgs::empty(), &config),
        Err(PeriodError::Missing)
    );

    let null = [("period", ArgValue::Null)];
    assert_eq!(
        period_from_args(&FieldArgs::new(&null), &config),
        Err(PeriodError::Missing)
    );

    let float = [("period", ArgValue::Float(50.0))];
    assert_eq!(
        period_from_args(&FieldArgs::new(&float), &config),
        Err(PeriodError::NotAnInteger)
    );

    let text = [("period", ArgValue::Str("50"))];
    assert_eq!(
        period_from_args(&FieldArgs::new(&text), &config),
        Err(PeriodError::NotAnInteger)
    );

    let zero = [("period", ArgValue::Int(0))];
    assert_eq!(
        period_from_args(&FieldArgs::new(&zero), &config),
        Err(PeriodError::NonPositive { period: 0 })
    );
}

#[test]
/// Duplicate names resolve to the first occurrence; other arguments are ignored.
fn test_field_args_lookup() {
    let entries = [
        ("label", ArgValue::Str("clock")),
        ("period", ArgValue::Int(20)),
        ("period", ArgValue::Int(99)),
        ("verbose", ArgValue::Bool(true)),
    ];
    let args = FieldArgs::new(&entries);

    assert_eq!(args.len(), 4);
    assert!(!args.is_empty());
    assert_eq!(args.get("period"), Some(&ArgValue::Int(20)));
    assert_eq!(args.get("missing"), None);
    assert!(FieldArgs::empty().is_empty());
}

//==================================================================================CONFIG
#[test]
fn test_config_builder() {
    let config = ClockFieldConfig::builder()
        .argument("interval")
        .max_period_ms(10_000)
        .build();
    assert_eq!(config.argument, "interval");
    assert_eq!(config.max_period_ms, 10_000);

    let floor = ClockFieldConfig::builder().max_period_ms(0).build();
    assert_eq!(floor.max_period_ms, 1);
    assert_eq!(ClockFieldConfig::default().argument, DEFAULT_PERIOD_ARGUMENT);
}

#[test]
/// A renamed argument is the only one consulted.
fn test_custom_argument_name() {
    let config = ClockFieldConfig::builder()
        .argument("interval")
        .max_period_ms(1_000)
        .build();

    let legacy = [("period", ArgValue::Int(50))];
    assert_eq!(
        period_from_args(&FieldArgs::new(&legacy), &config),
        Err(PeriodError::Missing)
    );

    let renamed = [("interval", ArgValue::Int(5_000))];
    assert_eq!(
        period_from_args(&FieldArgs::new(&renamed), &config),
        Err(PeriodError::TooLarge {
            period: 5_000,
            max: 1_000
        })
    );
}

//==================================================================================CLOCK_FIELD
#[test]
/// Each subscription arms its own bridge.
fn test_subscribe_arms_independent_bridges() {
    let field = ClockField::new(RecordingTimer::default(), FixedClock(0));
    let args = [("period", ArgValue::Int(25))];

    let first = field.subscribe(&FieldArgs::new(&args)).unwrap();
    let mut second = field.subscribe(&FieldArgs::new(&args)).unwrap();
    assert!(first.ticks.is_running());
    assert!(second.ticks.is_running());
    assert_eq!(first.producer.period().as_millis(), 25);

    second.ticks.close();
    assert!(first.ticks.is_running());
    assert!(!second.ticks.is_running());
}

#[test]
/// Invalid arguments never reach the timer.
fn test_subscribe_without_period_fails() {
    let timer = RecordingTimer::default();
    let field = ClockField::new(timer.clone(), FixedClock(0));

    let result = field.subscribe(&FieldArgs::empty());
    assert!(matches!(
        result,
        Err(BridgeError::InvalidArgument(PeriodError::Missing))
    ));

    let resolved = poll_once(pin!(field.resolve(&FieldArgs::empty())));
    assert!(matches!(
        resolved,
        Poll::Ready(Err(BridgeError::InvalidArgument(PeriodError::Missing)))
    ));
    assert_eq!(timer.delays.load(Ordering::SeqCst), 0);
}

#[test]
/// Direct resolution waits exactly one period, then stamps a single tick.
fn test_resolve_waits_one_period() {
    let timer = RecordingTimer::default();
    let field = ClockField::new(timer.clone(), FixedClock(1_234));
    let args = [("period", ArgValue::Int(75))];

    let resolved = poll_once(pin!(field.resolve(&FieldArgs::new(&args))));
    match resolved {
        Poll::Ready(Ok(tick)) => {
            assert_eq!(tick.at_ms, 1_234);
            assert_eq!(tick.sequence, 1);
        }
        other => panic!("unexpected resolution: {other:?}"),
    }
    assert_eq!(timer.last_delay_ms.load(Ordering::SeqCst), 75);
    assert_eq!(timer.delays.load(Ordering::SeqCst), 1);
}

#[test]
/// The producer of a field subscription asks its timer for the parsed period.
fn test_subscription_producer_uses_period() {
    let timer = RecordingTimer::default();
    let field = ClockField::new(timer.clone(), FixedClock(500));
    let args = [("period", ArgValue::Int(40))];
    let (mut ticks, producer) = field.subscribe(&FieldArgs::new(&args)).unwrap().into_parts();

    // The recording timer completes at once; stop first so a single poll
    // performs one delay, finds the bridge stopped and exits.
    ticks.handle().cancel();
    assert_eq!(poll_once(pin!(producer.drive())), Poll::Ready(()));

    assert_eq!(timer.last_delay_ms.load(Ordering::SeqCst), 40);
    assert_eq!(timer.delays.load(Ordering::SeqCst), 1);
    assert_eq!(poll_once(pin!(ticks.next())), Poll::Ready(IterStep::Done));
    assert_eq!(ticks.status().fired, 0);
}
