//! Clock-tick subscription protocol: the interval bridge, direct one-shot
//! resolution, the field adapter facing the execution layer, and the traits
//! injected at their edges.
pub mod bridge;
pub mod field;
pub mod resolve;
pub mod traits;
