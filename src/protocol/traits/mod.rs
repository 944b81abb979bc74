//! Abstraction traits at the edges of the bridge: the timer it arms, the clock
//! it stamps ticks with, and the pull protocol it exposes to consumers.
pub mod pull_iterator;
pub mod tick_clock;
pub mod tick_timer;
