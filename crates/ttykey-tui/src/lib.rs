//! Key echo tool
//!
//! A thin shell over [`ttykey_app::Driver`] that puts the terminal into raw
//! mode and prints every decoded key. All orchestration logic lives in the
//! generic [`ttykey_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod echo;
pub mod terminal;

use std::{future::Future, io};

use tokio::signal::unix::{SignalKind, signal};
use ttykey_app::{Runtime, TerminationRequest};
use ttykey_core::{SessionConfig, ShutdownReason};

pub use echo::EchoDriver;
pub use terminal::{RawModeGuard, TerminalError};

/// Echo keys typed on the controlling terminal until Ctrl-Q, a signal or
/// end of input.
///
/// The terminal mode is restored before this returns, on every path.
///
/// # Errors
///
/// Fails if stdin/stdout are not terminals, if the terminal mode cannot be
/// changed, if writing to stdout fails, or if reading stdin failed.
pub async fn run(config: SessionConfig) -> Result<ShutdownReason, TerminalError> {
    let guard = RawModeGuard::enter()?;
    let termination = termination()?;

    let mut driver = EchoDriver::new(io::stdout());
    driver.start()?;

    let mut runtime = Runtime::new(tokio::io::stdin(), driver, config, guard.erase_key());
    let reason = runtime.run(termination).await?;
    drop(guard);

    tracing::info!(%reason, "key echo finished");
    match reason {
        ShutdownReason::ReadFailed { error } => Err(TerminalError::ReadFailed(error)),
        reason => Ok(reason),
    }
}

/// Resolves on the first SIGINT or SIGTERM.
fn termination() -> io::Result<impl Future<Output = TerminationRequest>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => TerminationRequest::new("SIGINT"),
            _ = terminate.recv() => TerminationRequest::new("SIGTERM"),
        }
    })
}
