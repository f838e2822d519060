//! Input session state machine.
//!
//! Owns the [`KeyDecoder`] for one terminal input stream and decides when a
//! held-back sequence has waited long enough to be flushed. Uses the action
//! pattern: handlers take input bytes, elapsed time or lifecycle events and
//! return actions for the runtime to execute. No I/O happens here.
//!
//! # State Machine
//!
//! ```text
//! ┌────────┐  end of input / read error /   ┌─────────────┐
//! │ Active │───────────────────────────────>│ Terminating │
//! └────────┘  termination / consumer quit   └─────────────┘
//!   │    ↑
//!   └────┘ input, tick
//! ```
//!
//! `Terminating` is absorbing. The transition emits exactly one
//! [`SessionAction::Shutdown`].

use std::{fmt, time::Duration};

use ttykey_proto::KeyEvent;

use crate::KeyDecoder;

/// Interval at which the runtime reports elapsed time.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(25);

/// Idle time after which held-back bytes are flushed.
///
/// A lone ESC is reported as Escape once no byte has arrived for longer
/// than this.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_millis(50);

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How often the runtime calls [`InputSession::handle_tick`]
    pub tick_interval: Duration,
    /// Idle time that must be exceeded before pending bytes are flushed
    pub idle_threshold: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { tick_interval: DEFAULT_TICK_INTERVAL, idle_threshold: DEFAULT_IDLE_THRESHOLD }
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Decoding input
    Active,
    /// Shutdown emitted; all further input is ignored
    Terminating,
}

/// Events handed to the consumer in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyBatch {
    /// Result of one chunk of input. Forwarded even when no key completed.
    Input {
        /// Raw bytes of the chunk
        bytes: Vec<u8>,
        /// Keys completed by the chunk
        events: Vec<KeyEvent>,
    },
    /// Keys resolved by an idle flush. Never empty.
    Flushed {
        /// Keys resolved from held-back bytes
        events: Vec<KeyEvent>,
    },
}

impl KeyBatch {
    /// Decoded keys.
    pub fn events(&self) -> &[KeyEvent] {
        match self {
            Self::Input { events, .. } | Self::Flushed { events } => events,
        }
    }

    /// Raw input bytes, for input batches.
    pub fn input(&self) -> Option<&[u8]> {
        match self {
            Self::Input { bytes, .. } => Some(bytes),
            Self::Flushed { .. } => None,
        }
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// The byte source reported end of input
    EndOfInput,
    /// Reading from the byte source failed
    ReadFailed {
        /// Error description
        error: String,
    },
    /// An external termination request arrived (for example a signal)
    Terminated {
        /// Origin of the request
        source: &'static str,
    },
    /// The consumer asked to stop
    ConsumerQuit,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfInput => f.write_str("end of input"),
            Self::ReadFailed { error } => write!(f, "read failed: {error}"),
            Self::Terminated { source } => write!(f, "terminated by {source}"),
            Self::ConsumerQuit => f.write_str("consumer quit"),
        }
    }
}

/// Actions returned by the session state machine.
///
/// The runtime executes these in order:
/// - `Forward`: hand the batch to the consumer
/// - `Shutdown`: stop the consumer and leave the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Hand this batch to the consumer
    Forward(KeyBatch),

    /// Run the shutdown sequence
    Shutdown {
        /// Why the session stopped
        reason: ShutdownReason,
    },
}

/// Input session state machine
///
/// Time is passed in as elapsed durations, so tests drive it without a
/// clock.
#[derive(Debug, Clone)]
pub struct InputSession {
    /// Current state
    state: SessionState,
    /// Configuration
    config: SessionConfig,
    /// Decoder with its pending bytes
    decoder: KeyDecoder,
    /// Time since the last input chunk or idle flush
    idle: Duration,
}

impl InputSession {
    /// Create a session in [`SessionState::Active`] state. `backspace` is the
    /// terminal's erase character.
    pub fn new(config: SessionConfig, backspace: u8) -> Self {
        Self {
            state: SessionState::Active,
            config,
            decoder: KeyDecoder::new(backspace),
            idle: Duration::ZERO,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Time accumulated since the last input chunk or idle flush.
    pub fn idle(&self) -> Duration {
        self.idle
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Decoder state, including pending bytes.
    pub fn decoder(&self) -> &KeyDecoder {
        &self.decoder
    }

    /// Process one chunk of input.
    ///
    /// Resets idle time and always forwards an input batch, even if the
    /// chunk only extended a pending sequence.
    pub fn handle_input(&mut self, bytes: &[u8]) -> Vec<SessionAction> {
        if self.state != SessionState::Active {
            return Vec::new();
        }

        self.idle = Duration::ZERO;
        let events = self.decoder.feed(bytes);

        vec![SessionAction::Forward(KeyBatch::Input { bytes: bytes.to_vec(), events })]
    }

    /// Account for `elapsed` time without input.
    ///
    /// Once idle time strictly exceeds the threshold, pending bytes are
    /// flushed and idle time starts over.
    pub fn handle_tick(&mut self, elapsed: Duration) -> Vec<SessionAction> {
        if self.state != SessionState::Active {
            return Vec::new();
        }

        self.idle = self.idle.saturating_add(elapsed);
        if self.idle <= self.config.idle_threshold {
            return Vec::new();
        }

        self.idle = Duration::ZERO;
        let events = self.decoder.flush();
        if events.is_empty() {
            return Vec::new();
        }

        tracing::trace!(count = events.len(), "idle flush");
        vec![SessionAction::Forward(KeyBatch::Flushed { events })]
    }

    /// The byte source reached end of input.
    pub fn handle_end_of_input(&mut self) -> Vec<SessionAction> {
        self.shutdown(ShutdownReason::EndOfInput)
    }

    /// Reading from the byte source failed. Reads are not retried.
    pub fn handle_read_error(&mut self, error: String) -> Vec<SessionAction> {
        self.shutdown(ShutdownReason::ReadFailed { error })
    }

    /// An external termination request arrived.
    pub fn handle_termination(&mut self, source: &'static str) -> Vec<SessionAction> {
        self.shutdown(ShutdownReason::Terminated { source })
    }

    /// The consumer asked to stop.
    pub fn handle_consumer_quit(&mut self) -> Vec<SessionAction> {
        self.shutdown(ShutdownReason::ConsumerQuit)
    }

    fn shutdown(&mut self, reason: ShutdownReason) -> Vec<SessionAction> {
        if self.state != SessionState::Active {
            return Vec::new();
        }

        tracing::debug!(%reason, pending = self.decoder.pending().len(), "input session shutting down");
        self.state = SessionState::Terminating;
        vec![SessionAction::Shutdown { reason }]
    }
}
