//! Clock field adapter: the glue between a query-execution entry point and
//! the bridge.
//!
//! The execution layer hands the field its arguments as a borrowed
//! name/value list. A subscription pulls ticks through
//! [`ClockField::subscribe`]; a plain query awaits a single tick through
//! [`ClockField::resolve`].
use core::marker::PhantomData;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};

use crate::core::{Period, Tick};
use crate::error::{BridgeError, PeriodError};
use crate::protocol::bridge::{self, SubscriptionParts};
use crate::protocol::resolve::resolve_once;
use crate::protocol::traits::{tick_clock::TickClock, tick_timer::TickTimer};

/// Argument carrying the period unless configured otherwise.
pub const DEFAULT_PERIOD_ARGUMENT: &str = "period";

//==================================================================================ARGS
/// Argument value as received from the execution layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArgValue<'a> {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(&'a str),
}

/// Borrowed view over the arguments of one field invocation.
#[derive(Clone, Copy, Debug)]
pub struct FieldArgs<'a> {
    entries: &'a [(&'a str, ArgValue<'a>)],
}

impl<'a> FieldArgs<'a> {
    pub const fn new(entries: &'a [(&'a str, ArgValue<'a>)]) -> Self {
        Self { entries }
    }

    /// Invocation without arguments.
    pub const fn empty() -> FieldArgs<'static> {
        FieldArgs { entries: &[] }
    }

    /// Look up an argument by name. The first occurrence wins.
    pub fn get(&self, name: &str) -> Option<&ArgValue<'a>> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract and validate the period argument.
///
/// Absent and `Null` both count as missing; anything other than an integer is
/// rejected, as are values outside `1..=config.max_period_ms`.
pub fn period_from_args(
    args: &FieldArgs<'_>,
    config: &ClockFieldConfig,
) -> Result<Period, PeriodError> {
    match args.get(config.argument) {
        None | Some(ArgValue::Null) => Err(PeriodError::Missing),
        Some(ArgValue::Int(period)) => Period::from_arg(Some(*period), config.max_period_ms),
        Some(_) => Err(PeriodError::NotAnInteger),
    }
}

//==================================================================================CONFIG
/// Runtime configuration of a [`ClockField`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockFieldConfig {
    /// Name of the argument carrying the period.
    pub argument: &'static str,
    /// Largest accepted period in milliseconds.
    pub max_period_ms: u32,
}

impl Default for ClockFieldConfig {
    fn default() -> Self {
        Self {
            argument: DEFAULT_PERIOD_ARGUMENT,
            max_period_ms: u32::MAX,
        }
    }
}

impl ClockFieldConfig {
    pub fn builder() -> ClockFieldConfigBuilder {
        ClockFieldConfigBuilder::new()
    }
}

#[derive(Debug)]
/// Fluent builder for [`ClockFieldConfig`].
pub struct ClockFieldConfigBuilder {
    config: ClockFieldConfig,
}

impl ClockFieldConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClockFieldConfig::default(),
        }
    }

    /// Read the period from `name` instead of [`DEFAULT_PERIOD_ARGUMENT`].
    pub fn argument(mut self, name: &'static str) -> Self {
        self.config.argument = name;
        self
    }

    /// Cap accepted periods. Zero is raised to 1 ms.
    pub fn max_period_ms(mut self, millis: u32) -> Self {
        self.config.max_period_ms = millis.max(1);
        self
    }

    pub fn build(self) -> ClockFieldConfig {
        self.config
    }
}

impl Default for ClockFieldConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================CLOCK_FIELD
/// Clock tick field: one bridge per subscription, one delay per resolution.
///
/// The timer and clock are prototypes cloned for every invocation, so
/// subscriptions never share a timer.
pub struct ClockField<T, C, M = CriticalSectionRawMutex> {
    config: ClockFieldConfig,
    timer: T,
    clock: C,
    _mutex: PhantomData<M>,
}

impl<T, C> ClockField<T, C>
where
    T: TickTimer + Clone,
    C: TickClock + Clone,
{
    /// Field with the default configuration.
    pub fn new(timer: T, clock: C) -> Self {
        Self::with_mutex(ClockFieldConfig::default(), timer, clock)
    }

    pub fn with_config(config: ClockFieldConfig, timer: T, clock: C) -> Self {
        Self::with_mutex(config, timer, clock)
    }
}

impl<T, C, M> ClockField<T, C, M>
where
    T: TickTimer + Clone,
    C: TickClock + Clone,
    M: RawMutex,
{
    /// Field whose bridges use the raw mutex `M`.
    pub fn with_mutex(config: ClockFieldConfig, timer: T, clock: C) -> Self {
        Self {
            config,
            timer,
            clock,
            _mutex: PhantomData,
        }
    }

    pub fn config(&self) -> &ClockFieldConfig {
        &self.config
    }

    /// Start a live subscription.
    ///
    /// # Errors
    ///
    /// [`BridgeError::InvalidArgument`] when the period argument is missing or
    /// invalid. No bridge is created and no timer is cloned in that case.
    pub fn subscribe(
        &self,
        args: &FieldArgs<'_>,
    ) -> Result<SubscriptionParts<T, C, M>, BridgeError> {
        let period = period_from_args(args, &self.config)?;
        Ok(bridge::arm(period, self.timer.clone(), self.clock.clone()))
    }

    /// Resolve a single tick one period from now.
    ///
    /// # Errors
    ///
    /// [`BridgeError::InvalidArgument`] when the period argument is missing or
    /// invalid, before any delay starts.
    pub async fn resolve(&self, args: &FieldArgs<'_>) -> Result<Tick, BridgeError> {
        let period = period_from_args(args, &self.config)?;
        let mut timer = self.timer.clone();
        Ok(resolve_once(&mut timer, &self.clock, period).await)
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
