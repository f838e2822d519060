//! Raw terminal mode.
//!
//! [`RawModeGuard`] switches the controlling terminal to raw mode and puts
//! the original settings back when dropped, so every exit path restores the
//! terminal.

use std::{
    io::{self, IsTerminal},
    os::fd::AsFd,
};

use nix::sys::termios::{self, SetArg, SpecialCharacterIndices, Termios};
use thiserror::Error;
use ttykey_app::RuntimeError;

/// Erase character assumed when the terminal has none configured.
const DEFAULT_ERASE: u8 = 0x7f;

/// Terminal errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// stdin or stdout is not attached to a terminal.
    #[error("stdin/stdout is not a tty")]
    NotATerminal,

    /// Reading or changing terminal attributes failed.
    #[error("termios error: {0}")]
    Termios(#[from] nix::Error),

    /// The input runtime failed.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError<io::Error>),

    /// Reading terminal input failed.
    #[error("input read failed: {0}")]
    ReadFailed(String),
}

/// Guard that restores terminal settings on drop.
pub struct RawModeGuard {
    stdin: io::Stdin,
    original: Termios,
    erase: u8,
}

impl RawModeGuard {
    /// Enter raw terminal mode.
    ///
    /// Both stdin and stdout must be terminals. The erase character is read
    /// from the original settings before they are changed.
    pub fn enter() -> Result<Self, TerminalError> {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            return Err(TerminalError::NotATerminal);
        }

        let stdin = io::stdin();
        let original = termios::tcgetattr(stdin.as_fd())?;
        let erase = erase_key(&original);

        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(stdin.as_fd(), SetArg::TCSAFLUSH, &raw)?;

        tracing::debug!(erase, "entered raw terminal mode");
        Ok(Self { stdin, original, erase })
    }

    /// Erase character of the terminal before raw mode was entered.
    pub fn erase_key(&self) -> u8 {
        self.erase
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match termios::tcsetattr(self.stdin.as_fd(), SetArg::TCSAFLUSH, &self.original) {
            Ok(()) => tracing::debug!("restored terminal settings"),
            Err(e) => tracing::warn!("failed to restore terminal settings: {}", e),
        }
    }
}

/// `VERASE` of `settings`, or DEL when the entry is disabled.
fn erase_key(settings: &Termios) -> u8 {
    settings
        .control_chars
        .get(SpecialCharacterIndices::VERASE as usize)
        .copied()
        .filter(|&erase| erase != 0)
        .unwrap_or(DEFAULT_ERASE)
}
