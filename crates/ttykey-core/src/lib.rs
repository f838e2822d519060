//! Sans-IO terminal input decoding.
//!
//! Turns the raw byte stream of a terminal in raw mode into [`KeyEvent`]s
//! and decides when an ambiguous prefix (most commonly a lone ESC) has
//! waited long enough to be resolved. Nothing here reads from a device or
//! looks at a clock; the runtime in `ttykey-app` supplies bytes and elapsed
//! time.
//!
//! # Components
//!
//! - [`KeyDecoder`]: incremental byte-to-key decoder (`feed`/`flush`)
//! - [`InputSession`]: idle accounting and shutdown latch around the decoder
//!
//! [`KeyEvent`]: ttykey_proto::KeyEvent

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod csi;
mod decoder;
pub mod session;
mod utf8;

pub use decoder::KeyDecoder;
pub use session::{
    DEFAULT_IDLE_THRESHOLD, DEFAULT_TICK_INTERVAL, InputSession, KeyBatch, SessionAction,
    SessionConfig, SessionState, ShutdownReason,
};
