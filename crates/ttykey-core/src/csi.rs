//! Control Sequence Introducer (`ESC [`) and Single Shift 3 (`ESC O`) forms.
//!
//! Only input-direction reports are understood: cursor and function keys
//! with xterm modifier parameters, focus reports, bracketed paste markers,
//! the `~` keypad table and the kitty `u` form.

use ttykey_proto::{FunctionKey, Key, KeyEvent, Modifiers};

use crate::decoder::Step;

/// Maximum number of `;`-separated parameters.
const MAX_PARAMS: usize = 16;

/// Maximum number of `:`-separated values per parameter.
const MAX_SUBPARAMS: usize = 4;

/// Parameter section of a CSI sequence.
///
/// Missing values read as zero. Digits saturate instead of overflowing.
#[derive(Debug, Default)]
struct Params {
    values: [[u32; MAX_SUBPARAMS]; MAX_PARAMS],
    index: usize,
    sub: usize,
}

impl Params {
    /// Accumulate one byte from `0x30..=0x3f`. `false` if the byte is not
    /// acceptable at this position.
    fn push(&mut self, byte: u8) -> bool {
        if self.index >= MAX_PARAMS {
            return false;
        }

        match byte {
            b'0'..=b'9' => {
                if let Some(slot) = self.values.get_mut(self.index).and_then(|p| p.get_mut(self.sub))
                {
                    *slot = slot.saturating_mul(10).saturating_add(u32::from(byte - b'0'));
                }
                true
            },
            b':' if self.sub + 1 < MAX_SUBPARAMS => {
                self.sub += 1;
                true
            },
            b';' => {
                self.index += 1;
                self.sub = 0;
                true
            },
            // Private-use bytes (`<`, `=`, `>`, `?`) or a surplus `:`
            _ => false,
        }
    }

    fn get(&self, index: usize, sub: usize) -> u32 {
        self.values.get(index).and_then(|p| p.get(sub)).copied().unwrap_or(0)
    }

    /// Modifiers from the second parameter (`1 + mask`, absent means none).
    fn modifiers(&self) -> Modifiers {
        Modifiers::from_kitty_mask(self.get(1, 0).saturating_sub(1))
    }
}

/// Decode the bytes following `ESC [`.
///
/// `input` is non-empty. Returned byte counts are relative to `input`.
pub(crate) fn decode(input: &[u8]) -> Step {
    // Private marker is accepted and otherwise ignored
    let mut pos = usize::from(matches!(input.first(), Some(0x3c..=0x3f)));
    let mut params = Params::default();

    let mut byte = loop {
        let Some(&byte) = input.get(pos) else {
            return Step::Incomplete;
        };
        pos += 1;
        if !(0x30..=0x3f).contains(&byte) {
            break byte;
        }
        if !params.push(byte) {
            return Step::Key(KeyEvent::INVALID, pos);
        }
    };

    // Intermediate bytes carry nothing we report. `$` is one of them.
    while (0x20..=0x2f).contains(&byte) {
        let Some(&next) = input.get(pos) else {
            return Step::Incomplete;
        };
        pos += 1;
        byte = next;
    }

    if !(0x40..=0x7e).contains(&byte) {
        return Step::Key(KeyEvent::INVALID, pos);
    }

    Step::Key(dispatch(byte, &params), pos)
}

/// Map a final byte and its parameters to an event.
fn dispatch(final_byte: u8, params: &Params) -> KeyEvent {
    let modifiers = params.modifiers();
    match final_byte {
        b'A' => KeyEvent::new(FunctionKey::Up, modifiers),
        b'B' => KeyEvent::new(FunctionKey::Down, modifiers),
        b'C' => KeyEvent::new(FunctionKey::Right, modifiers),
        b'D' => KeyEvent::new(FunctionKey::Left, modifiers),
        b'F' => KeyEvent::new(FunctionKey::End, modifiers),
        b'H' => KeyEvent::new(FunctionKey::Home, modifiers),
        b'P' => KeyEvent::new(FunctionKey::F1, modifiers),
        b'Q' => KeyEvent::new(FunctionKey::F2, modifiers),
        b'R' => KeyEvent::new(FunctionKey::F3, modifiers),
        b'S' => KeyEvent::new(FunctionKey::F4, modifiers),
        b'I' => KeyEvent::function(FunctionKey::FocusIn),
        b'O' => KeyEvent::function(FunctionKey::FocusOut),
        b'u' => extended(params, modifiers),
        b'~' => tilde(params.get(0, 0), modifiers),
        _ => KeyEvent::INVALID,
    }
}

/// Kitty `CSI code[:shifted] ; mods u`.
///
/// With Shift held and a shifted key reported, the shifted key replaces the
/// base key and Shift is consumed by it.
fn extended(params: &Params, mut modifiers: Modifiers) -> KeyEvent {
    let shifted = params.get(0, 1);
    let code = if shifted != 0 && modifiers.contains(Modifiers::SHIFT) {
        modifiers.remove(Modifiers::SHIFT);
        shifted
    } else {
        params.get(0, 0)
    };
    KeyEvent::new(Key::from_code(code), modifiers)
}

/// Keypad table for `CSI n ~`.
fn tilde(n: u32, modifiers: Modifiers) -> KeyEvent {
    let key = match n {
        1 => FunctionKey::Home,
        2 => FunctionKey::Insert,
        3 => FunctionKey::Delete,
        4 => FunctionKey::End,
        5 => FunctionKey::PageUp,
        6 => FunctionKey::PageDown,
        15 => FunctionKey::F5,
        17 => FunctionKey::F6,
        18 => FunctionKey::F7,
        19 => FunctionKey::F8,
        20 => FunctionKey::F9,
        21 => FunctionKey::F10,
        23 => FunctionKey::F11,
        24 => FunctionKey::F12,
        200 => return KeyEvent::function(FunctionKey::PasteStart),
        201 => return KeyEvent::function(FunctionKey::PasteEnd),
        _ => return KeyEvent::INVALID,
    };
    KeyEvent::new(key, modifiers)
}

/// Decode the byte following `ESC O`. No parameters, no modifiers.
pub(crate) fn decode_ss3(byte: u8) -> KeyEvent {
    let key = match byte {
        b'P' => FunctionKey::F1,
        b'Q' => FunctionKey::F2,
        b'R' => FunctionKey::F3,
        b'S' => FunctionKey::F4,
        b'H' => FunctionKey::Home,
        b'F' => FunctionKey::End,
        b'A' => FunctionKey::Up,
        b'B' => FunctionKey::Down,
        b'C' => FunctionKey::Right,
        b'D' => FunctionKey::Left,
        _ => FunctionKey::Invalid,
    };
    KeyEvent::function(key)
}
