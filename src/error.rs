use thiserror::Error;

/// Shorthand result type for fallible kernel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of a kernel error.
///
/// Every error is a precondition violation: either an argument lay outside
/// the operation's domain, or the operation was issued against kernel state
/// that cannot serve it. Nothing is retried or swallowed; errors surface
/// synchronously from the call that caused them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An argument was outside the operation's domain.
    InvalidArgument,
    /// The kernel state cannot serve the operation.
    InvalidState,
}

/// The error type of the simulation kernel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The delay until an event was negative, NaN or infinite.
    #[error("the delay until an event must be finite and non-negative")]
    InvalidDelay,

    /// A facility identifier did not name a facility of this kernel.
    #[error("the identifier does not name a facility of this kernel")]
    UnknownFacility,

    /// A facility was requested with zero servers.
    #[error("a facility must have at least one server")]
    NoServers,

    /// A random number stream outside `1..=15` was selected.
    #[error("random number streams are numbered 1 through 15")]
    InvalidStream,

    /// A distribution was sampled with a lower bound above its upper bound.
    #[error("the lower bound must not exceed the upper bound")]
    BadRange,

    /// The Erlang distribution needs a standard deviation no larger than
    /// its mean.
    #[error("the Erlang standard deviation must not exceed the mean")]
    ErlangDeviation,

    /// The hyperexponential distribution needs a standard deviation
    /// strictly larger than its mean.
    #[error("the hyperexponential standard deviation must exceed the mean")]
    HyperxDeviation,

    /// `release` was called with a token that holds no server.
    #[error("no server of the facility is reserved by the token")]
    NoReservation,

    /// A preemption victim had no pending event to suspend.
    #[error("no event is scheduled for the token")]
    NoScheduledEvent,
}

impl Error {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoReservation | Error::NoScheduledEvent => ErrorKind::InvalidState,
            _ => ErrorKind::InvalidArgument,
        }
    }
}
