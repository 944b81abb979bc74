//! Error definitions shared across library modules.
//! Every failure surfaces to the immediate caller of the failing operation;
//! nothing here is logged and dropped by the bridge.
use core::convert::Infallible;
use core::fmt::Debug;

use thiserror_no_std::Error;

//==================================================================================PERIOD_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Reasons a supplied period cannot arm a timer.
pub enum PeriodError {
    /// No period was supplied.
    #[error("Period is required")]
    Missing,
    /// The argument exists but is not an integer.
    #[error("Period must be an integer number of milliseconds")]
    NotAnInteger,
    /// Zero or negative period.
    #[error("Period must be positive, got {period}")]
    NonPositive { period: i64 },
    /// Period larger than the configured maximum.
    #[error("Period {period} exceeds the maximum of {max} ms")]
    TooLarge { period: i64, max: u32 },
}

//==================================================================================BRIDGE_ERROR
#[derive(Error, Debug)]
/// Errors returned by the bridge operations.
///
/// `E` is the caller's failure type forwarded through `throw`; operations that
/// cannot be cancelled externally use the default `Infallible`.
pub enum BridgeError<E: Debug = Infallible> {
    /// Missing or invalid period, raised before any timer is armed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] PeriodError),
    /// The consumer stopped the subscription because of an external failure.
    #[error("Subscription cancelled by external error: {0:?}")]
    ExternalCancellation(E),
}

impl<E: Debug> BridgeError<E> {
    /// `true` when the error stems from argument validation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Recover the forwarded external error, if any.
    pub fn into_external(self) -> Option<E> {
        match self {
            Self::ExternalCancellation(err) => Some(err),
            Self::InvalidArgument(_) => None,
        }
    }
}

impl BridgeError {
    /// Re-type a validation error for an operation that forwards `E`.
    pub fn widen<E: Debug>(self) -> BridgeError<E> {
        match self {
            Self::InvalidArgument(err) => BridgeError::InvalidArgument(err),
            Self::ExternalCancellation(never) => match never {},
        }
    }
}
