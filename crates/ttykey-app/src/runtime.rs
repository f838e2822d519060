//! Generic runtime for terminal input.
//!
//! The Runtime drives one [`InputSession`] from three sources:
//! - an external termination request (signal, shutdown of the host)
//! - chunks read from the byte source
//! - a periodic tick that lets the session flush idle input
//!
//! Only one read is outstanding at a time, and the next read starts after
//! the previous chunk's keys have been forwarded to the [`Driver`].

use std::future::Future;

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    time::{Instant, MissedTickBehavior},
};
use ttykey_core::{InputSession, SessionAction, SessionConfig, ShutdownReason};

use crate::{Driver, Flow, RuntimeError};

/// Bytes requested per read.
const READ_BUFFER_SIZE: usize = 1024;

/// External request to end the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationRequest {
    /// Where the request came from, for example `"SIGINT"`
    pub source: &'static str,
}

impl TerminationRequest {
    /// Request originating from `source`.
    pub fn new(source: &'static str) -> Self {
        Self { source }
    }
}

/// Event loop that feeds a byte source through an [`InputSession`] into a
/// [`Driver`].
///
/// # Type Parameters
///
/// - `R`: Byte source (a terminal, a pipe, an in-memory duplex in tests)
/// - `D`: Consumer of decoded keys
pub struct Runtime<R, D>
where
    R: AsyncRead + Unpin,
    D: Driver,
{
    reader: R,
    driver: D,
    session: InputSession,
    stopped: bool,
}

impl<R, D> Runtime<R, D>
where
    R: AsyncRead + Unpin,
    D: Driver,
{
    /// Create a runtime. `backspace` is the terminal's erase character.
    pub fn new(reader: R, driver: D, config: SessionConfig, backspace: u8) -> Self {
        Self { reader, driver, session: InputSession::new(config, backspace), stopped: false }
    }

    /// Run until the session shuts down.
    ///
    /// Termination takes priority over pending input, and input over ticks.
    /// Read errors are not retried. [`Driver::stop`] runs exactly once, on
    /// every path out of the first run, including a rejected configuration.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::Driver`] if the driver fails to handle a batch
    /// - [`RuntimeError::ZeroTickInterval`] if the configured tick interval
    ///   is zero
    /// - [`RuntimeError::Stopped`] if a previous run already stopped the
    ///   driver
    pub async fn run<F>(&mut self, termination: F) -> Result<ShutdownReason, RuntimeError<D::Error>>
    where
        F: Future<Output = TerminationRequest>,
    {
        if self.stopped {
            return Err(RuntimeError::Stopped);
        }

        let period = self.session.config().tick_interval;
        if period.is_zero() {
            self.stop();
            return Err(RuntimeError::ZeroTickInterval);
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(termination);
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        tracing::debug!(
            tick = ?period,
            idle = ?self.session.config().idle_threshold,
            backspace = self.session.decoder().backspace(),
            "input runtime started"
        );

        loop {
            let actions = tokio::select! {
                biased;

                request = &mut termination => self.session.handle_termination(request.source),

                result = self.reader.read(&mut buf) => match result {
                    Ok(0) => self.session.handle_end_of_input(),
                    Ok(n) => self.session.handle_input(buf.get(..n).unwrap_or_default()),
                    Err(e) => {
                        tracing::warn!("input read failed: {}", e);
                        self.session.handle_read_error(e.to_string())
                    },
                },

                _ = ticker.tick() => self.session.handle_tick(period),
            };

            if let Some(reason) = self.process_actions(actions)? {
                return Ok(reason);
            }
        }
    }

    /// Execute session actions in order.
    ///
    /// Returns the shutdown reason once the session has stopped.
    fn process_actions(
        &mut self,
        initial_actions: Vec<SessionAction>,
    ) -> Result<Option<ShutdownReason>, RuntimeError<D::Error>> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    SessionAction::Forward(batch) => match self.driver.forward(&batch) {
                        Ok(Flow::Continue) => {},
                        Ok(Flow::Quit) => {
                            pending_actions.extend(self.session.handle_consumer_quit());
                        },
                        Err(e) => {
                            self.stop();
                            return Err(RuntimeError::Driver(e));
                        },
                    },
                    SessionAction::Shutdown { reason } => {
                        self.stop();
                        return Ok(Some(reason));
                    },
                }
            }
        }

        Ok(None)
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.driver.stop();
        }
    }

    /// Session state, including idle time and pending bytes.
    pub fn session(&self) -> &InputSession {
        &self.session
    }

    /// Get a reference to the driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Consume the runtime and return the driver.
    pub fn into_driver(self) -> D {
        self.driver
    }
}
