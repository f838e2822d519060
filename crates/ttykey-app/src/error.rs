//! Runtime errors.

use thiserror::Error;

/// Errors that end [`Runtime::run`](crate::Runtime::run) without a shutdown
/// reason.
#[derive(Error, Debug)]
pub enum RuntimeError<E>
where
    E: std::error::Error + 'static,
{
    /// The driver failed to handle a batch
    #[error("driver error: {0}")]
    Driver(#[source] E),

    /// The session was configured with a zero tick interval
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,

    /// The runtime already stopped its driver
    #[error("runtime already stopped")]
    Stopped,
}
