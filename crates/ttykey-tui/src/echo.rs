//! Echo driver.
//!
//! Implements [`Driver`] by writing each batch as text: the raw bytes of an
//! input chunk followed by the keys decoded from it. The terminal is in raw
//! mode, so lines end in `\r\n`.

use std::io::{self, Write};

use crossterm::{
    event::{DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange},
    queue,
};
use ttykey_app::{Driver, Flow};
use ttykey_core::KeyBatch;
use ttykey_proto::{KeyEvent, Modifiers};

/// Driver that prints decoded keys to a writer.
pub struct EchoDriver<W: Write> {
    out: W,
    started: bool,
}

impl<W: Write> EchoDriver<W> {
    /// Create a driver writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, started: false }
    }

    /// Enable focus reporting and bracketed paste and print the greeting.
    pub fn start(&mut self) -> io::Result<()> {
        queue!(self.out, EnableFocusChange, EnableBracketedPaste)?;
        self.out.write_all(b"Press Ctrl-Q to exit\r\n")?;
        self.out.flush()?;
        self.started = true;
        Ok(())
    }

    /// Get a reference to the writer
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn restore(&mut self) -> io::Result<()> {
        queue!(self.out, DisableBracketedPaste, DisableFocusChange)?;
        self.out.flush()
    }
}

impl<W: Write> Driver for EchoDriver<W> {
    type Error = io::Error;

    fn forward(&mut self, batch: &KeyBatch) -> Result<Flow, Self::Error> {
        if let Some(bytes) = batch.input() {
            write!(self.out, "input: {}\r\n", format_bytes(bytes))?;
        }
        write!(self.out, "output: {}\r\n", format_events(batch.events()))?;
        self.out.flush()?;

        if batch.events().iter().any(is_quit) { Ok(Flow::Quit) } else { Ok(Flow::Continue) }
    }

    fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.started = false;
        if let Err(e) = self.restore() {
            tracing::warn!("failed to disable terminal reporting modes: {}", e);
        }
    }
}

/// Ctrl-Q, with no other modifier.
fn is_quit(event: &KeyEvent) -> bool {
    *event == KeyEvent::new('q', Modifiers::CTRL)
}

/// `[0x61, 0x1b]`
pub fn format_bytes(bytes: &[u8]) -> String {
    let items: Vec<String> = bytes.iter().map(|b| format!("{b:#x}")).collect();
    format!("[{}]", items.join(", "))
}

/// `[a, C-Up, Esc]`
pub fn format_events(events: &[KeyEvent]) -> String {
    let items: Vec<String> = events.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
