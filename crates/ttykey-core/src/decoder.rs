//! Incremental key decoder.
//!
//! Bytes arrive in arbitrary chunks. [`KeyDecoder::feed`] decodes every
//! complete key at the front of its buffer and keeps the unterminated tail;
//! [`KeyDecoder::flush`] forces a decision on that tail once the caller has
//! waited long enough for the rest of it.
//!
//! # Invariants
//!
//! - Chunking does not matter: the events of `feed(a)`, `feed(b)`, `flush()`
//!   equal those of `feed(a ++ b)`, `flush()`.
//! - After `feed`, the buffer holds only a prefix of some complete sequence.
//! - After `flush`, the buffer is empty.

use bytes::{Buf, BytesMut};
use ttykey_proto::{FunctionKey, KeyEvent, Modifiers};

use crate::{csi, utf8};

/// Escape.
const ESC: u8 = 0x1b;

/// Outcome of decoding at the front of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// One event and the number of bytes it used (at least one).
    Key(KeyEvent, usize),
    /// The slice ends inside a sequence that more bytes could complete.
    Incomplete,
}

/// Byte-to-key decoder with a pending-byte buffer.
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    buffer: BytesMut,
    backspace: u8,
}

impl KeyDecoder {
    /// Create a decoder. `backspace` is the terminal's erase character; it
    /// decodes to [`FunctionKey::Backspace`] unless the byte already has a
    /// meaning of its own (a control byte, ESC or printable ASCII).
    pub fn new(backspace: u8) -> Self {
        Self { buffer: BytesMut::new(), backspace }
    }

    /// Append `bytes` and decode every complete key.
    ///
    /// An unterminated sequence at the end stays buffered. Malformed input
    /// decodes to [`KeyEvent::INVALID`].
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<KeyEvent> {
        self.buffer.extend_from_slice(bytes);
        self.drain(false)
    }

    /// Decode everything still buffered, treating the end of the buffer as
    /// the end of input. Leaves the buffer empty.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        self.drain(true)
    }

    /// Whether bytes are held back waiting for a sequence to complete.
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Bytes held back.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Configured erase character.
    pub fn backspace(&self) -> u8 {
        self.backspace
    }

    fn drain(&mut self, at_end: bool) -> Vec<KeyEvent> {
        let (events, consumed) = decode(&self.buffer, self.backspace, at_end);
        self.buffer.advance(consumed);
        events
    }
}

/// Decode keys from the front of `input`.
///
/// Returns the events and the number of bytes they used. With `at_end`, an
/// unterminated sequence resolves on the spot (see [`decode_one`]) and a
/// sequence that still cannot complete becomes one invalid event for the
/// remaining bytes, so the whole input is used.
fn decode(input: &[u8], backspace: u8, at_end: bool) -> (Vec<KeyEvent>, usize) {
    let mut events = Vec::new();
    let mut pos = 0;

    while let Some(rest) = input.get(pos..).filter(|rest| !rest.is_empty()) {
        match decode_one(rest, backspace, at_end) {
            Step::Key(event, used) => {
                if event.is_invalid() {
                    tracing::trace!(bytes = ?rest.get(..used), "discarding undecodable input");
                }
                events.push(event);
                pos += used;
            },
            Step::Incomplete if at_end => {
                tracing::trace!(bytes = ?rest, "discarding truncated sequence");
                events.push(KeyEvent::INVALID);
                pos = input.len();
            },
            Step::Incomplete => break,
        }
    }

    (events, pos)
}

/// Decode one key at the front of non-empty `input`.
fn decode_one(input: &[u8], backspace: u8, at_end: bool) -> Step {
    if input.first() != Some(&ESC) {
        return decode_key(input, backspace);
    }

    match input.get(1) {
        None if at_end => Step::Key(KeyEvent::function(FunctionKey::Escape), 1),
        None => Step::Incomplete,
        Some(b'[') => match input.get(2..).filter(|body| !body.is_empty()) {
            Some(body) => match csi::decode(body) {
                Step::Key(event, used) => Step::Key(event, used + 2),
                Step::Incomplete => Step::Incomplete,
            },
            None if at_end => Step::Key(KeyEvent::new('[', Modifiers::ALT), 2),
            None => Step::Incomplete,
        },
        Some(b'O') => match input.get(2) {
            Some(&byte) => Step::Key(csi::decode_ss3(byte), 3),
            None if at_end => Step::Key(KeyEvent::new('O', Modifiers::ALT), 2),
            None => Step::Incomplete,
        },
        // Alt prefix. `with_modifiers` keeps an invalid key unmodified.
        Some(_) => match decode_key(input.get(1..).unwrap_or_default(), backspace) {
            Step::Key(event, used) => Step::Key(event.with_modifiers(Modifiers::ALT), used + 1),
            Step::Incomplete => Step::Incomplete,
        },
    }
}

/// Decode one key that does not start an escape sequence, except that a
/// leading ESC decodes to [`FunctionKey::Escape`] (the key after an Alt
/// prefix).
fn decode_key(input: &[u8], backspace: u8) -> Step {
    let Some(&byte) = input.first() else {
        return Step::Incomplete;
    };

    let event = match byte {
        0x00 => KeyEvent::new(FunctionKey::Space, Modifiers::CTRL),
        b'\t' => KeyEvent::function(FunctionKey::Tab),
        b'\r' => KeyEvent::function(FunctionKey::Enter),
        0x01..=0x1a => KeyEvent::new(char::from(byte | 0x60), Modifiers::CTRL),
        ESC => KeyEvent::function(FunctionKey::Escape),
        0x1c..=0x1f => KeyEvent::new(char::from(byte | 0x40), Modifiers::CTRL),
        b' ' => KeyEvent::function(FunctionKey::Space),
        0x21..=0x7e => KeyEvent::plain(char::from(byte)),
        _ if byte == backspace => KeyEvent::function(FunctionKey::Backspace),
        0x7f => KeyEvent::INVALID,
        _ => return utf8::decode(input),
    };

    Step::Key(event, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEL: u8 = 0x7f;

    fn feed(bytes: &[u8]) -> Vec<KeyEvent> {
        KeyDecoder::new(DEL).feed(bytes)
    }

    #[test]
    fn control_bytes() {
        assert_eq!(feed(&[0x00]), vec![KeyEvent::new(FunctionKey::Space, Modifiers::CTRL)]);
        assert_eq!(feed(&[0x01]), vec![KeyEvent::new('a', Modifiers::CTRL)]);
        assert_eq!(feed(&[0x11]), vec![KeyEvent::new('q', Modifiers::CTRL)]);
        assert_eq!(feed(b"\t"), vec![KeyEvent::function(FunctionKey::Tab)]);
        assert_eq!(feed(b"\r"), vec![KeyEvent::function(FunctionKey::Enter)]);
        assert_eq!(feed(b"\n"), vec![KeyEvent::new('j', Modifiers::CTRL)]);
        assert_eq!(feed(&[0x1c]), vec![KeyEvent::new('\\', Modifiers::CTRL)]);
        assert_eq!(feed(&[0x1f]), vec![KeyEvent::new('_', Modifiers::CTRL)]);
        assert_eq!(feed(b" "), vec![KeyEvent::function(FunctionKey::Space)]);
        assert_eq!(feed(&[DEL]), vec![KeyEvent::function(FunctionKey::Backspace)]);
    }

    #[test]
    fn backspace_byte_is_configurable() {
        let mut decoder = KeyDecoder::new(0xff);
        assert_eq!(decoder.backspace(), 0xff);
        assert_eq!(decoder.feed(&[0xff]), vec![KeyEvent::function(FunctionKey::Backspace)]);
        // DEL is not a key once it is not the erase character
        assert_eq!(decoder.feed(&[DEL]), vec![KeyEvent::INVALID]);
    }

    #[test]
    fn control_bytes_win_over_backspace() {
        let mut decoder = KeyDecoder::new(0x08);
        assert_eq!(decoder.feed(&[0x08]), vec![KeyEvent::new('h', Modifiers::CTRL)]);
        assert_eq!(decoder.feed(&[DEL]), vec![KeyEvent::INVALID]);

        let mut decoder = KeyDecoder::new(b'x');
        assert_eq!(decoder.feed(b"x"), vec![KeyEvent::plain('x')]);
    }

    #[test]
    fn escape_as_backspace_is_ignored() {
        let mut decoder = KeyDecoder::new(ESC);
        assert!(decoder.feed(&[ESC]).is_empty());
        assert_eq!(decoder.flush(), vec![KeyEvent::function(FunctionKey::Escape)]);
    }

    #[test]
    fn alt_prefix() {
        assert_eq!(feed(b"\x1ba"), vec![KeyEvent::new('a', Modifiers::ALT)]);
        assert_eq!(
            feed(&[ESC, 0x01]),
            vec![KeyEvent::new('a', Modifiers::CTRL | Modifiers::ALT)]
        );
        assert_eq!(
            feed(&[ESC, ESC]),
            vec![KeyEvent::new(FunctionKey::Escape, Modifiers::ALT)]
        );
        assert_eq!(feed("\x1b€".as_bytes()), vec![KeyEvent::new('€', Modifiers::ALT)]);
        // Alt on an undecodable byte is just invalid
        assert_eq!(feed(&[ESC, 0xff]), vec![KeyEvent::INVALID]);
    }

    #[test]
    fn alt_prefix_waits_for_multibyte_tail() {
        let mut decoder = KeyDecoder::new(DEL);
        assert!(decoder.feed(&[ESC, 0xe2, 0x82]).is_empty());
        assert_eq!(decoder.pending(), &[ESC, 0xe2, 0x82]);
        assert_eq!(decoder.feed(&[0xac]), vec![KeyEvent::new('€', Modifiers::ALT)]);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn introducers_resolve_on_flush() {
        let mut decoder = KeyDecoder::new(DEL);
        assert!(decoder.feed(b"\x1b[").is_empty());
        assert_eq!(decoder.flush(), vec![KeyEvent::new('[', Modifiers::ALT)]);

        assert!(decoder.feed(b"\x1bO").is_empty());
        assert_eq!(decoder.flush(), vec![KeyEvent::new('O', Modifiers::ALT)]);
    }

    #[test]
    fn partial_csi_flushes_to_one_invalid() {
        let mut decoder = KeyDecoder::new(DEL);
        assert!(decoder.feed(b"\x1b[1;5").is_empty());
        assert_eq!(decoder.flush(), vec![KeyEvent::INVALID]);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn ss3_keys() {
        assert_eq!(feed(b"\x1bOP"), vec![KeyEvent::function(FunctionKey::F1)]);
        assert_eq!(feed(b"\x1bOH"), vec![KeyEvent::function(FunctionKey::Home)]);
        assert_eq!(feed(b"\x1bOz"), vec![KeyEvent::INVALID]);
    }

    #[test]
    fn decoding_resumes_after_garbage() {
        assert_eq!(
            feed(b"\x1b[1?Ax"),
            vec![KeyEvent::INVALID, KeyEvent::plain('A'), KeyEvent::plain('x')]
        );
        assert_eq!(feed(&[0x80, b'a']), vec![KeyEvent::INVALID, KeyEvent::plain('a')]);
    }

    #[test]
    fn flush_on_empty_buffer_is_empty() {
        let mut decoder = KeyDecoder::new(DEL);
        assert!(decoder.flush().is_empty());
        decoder.feed(b"\x1b");
        assert_eq!(decoder.flush().len(), 1);
        assert!(decoder.flush().is_empty());
    }
}
