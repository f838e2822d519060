//! Input runtime for terminal key decoding.
//!
//! Connects a byte source to the [`InputSession`] state machine and hands
//! decoded keys to a consumer. The runtime owns the event loop; everything
//! platform-specific (raw mode, output, signals) lives behind [`Driver`] and
//! the termination future.
//!
//! # Components
//!
//! - [`Driver`]: Trait for the consumer of decoded keys
//! - [`Runtime`]: Generic event loop over an `AsyncRead` source
//!
//! [`InputSession`]: ttykey_core::InputSession

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod error;
mod runtime;

pub use driver::{Driver, Flow};
pub use error::RuntimeError;
pub use runtime::{Runtime, TerminationRequest};
