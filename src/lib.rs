//! `tick-bridge` library: a timer-backed asynchronous pull iterator for
//! clock-tick subscriptions in a `no_std` + `alloc` environment. The crate
//! exposes the core data types, the bridge between a periodic timer and a
//! single pull-based consumer, the one-shot resolution path, and a field
//! adapter for a query-execution layer.
#![cfg_attr(not(test), no_std)]
//==================================================================================
extern crate alloc;
//==================================================================================
/// Core data types: ticks, validated periods, lifecycle phases and iteration steps.
pub mod core;
/// Argument validation and bridge errors.
pub mod error;
/// Timer and clock adapters for concrete runtimes.
pub mod infra;
/// Bridge, one-shot resolution, field adapter and the traits at their edges.
pub mod protocol;
//==================================================================================
pub use crate::core::{BridgePhase, IterStep, Period, StopCause, Tick};
pub use crate::error::{BridgeError, PeriodError};
pub use crate::protocol::bridge::{
    subscribe, subscribe_with_mutex, BridgeHandle, BridgeStatus, SubscriptionParts, TickIterator,
    TickProducer,
};
pub use crate::protocol::resolve::resolve_once;
//==================================================================================
