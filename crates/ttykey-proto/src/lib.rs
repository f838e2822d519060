//! Key event data model for terminal input.
//!
//! Types shared by the decoder, the input runtime and every consumer of
//! decoded input. Nothing here performs I/O.
//!
//! # Components
//!
//! - [`Key`]: codepoint or named [`FunctionKey`]
//! - [`Modifiers`]: Shift/Alt/Ctrl/Super flag set
//! - [`KeyEvent`]: a key plus its modifiers

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod event;
mod key;
mod modifiers;

pub use event::KeyEvent;
pub use key::{FunctionKey, Key};
pub use modifiers::Modifiers;
