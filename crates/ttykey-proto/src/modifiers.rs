//! Modifier flags.

use std::fmt;

bitflags::bitflags! {
    /// Modifier keys held while a key was pressed.
    ///
    /// Flags are independent and combine freely (Ctrl+Alt+Left is valid).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0001;
        /// Alt / Option / Meta.
        const ALT = 0b0010;
        /// Control.
        const CTRL = 0b0100;
        /// Super / Command / Windows.
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Decode a 0-based modifier mask as used by xterm and kitty reports.
    ///
    /// The wire carries `mask + 1`; callers subtract the one. Bits above
    /// Super are ignored.
    #[must_use]
    pub fn from_kitty_mask(mask: u32) -> Self {
        Self::from_bits_truncate((mask & 0x0f) as u8)
    }
}

/// Writes the prefix form used in event display: `s-C-A-S-`.
impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, prefix) in [
            (Self::SUPER, "s-"),
            (Self::CTRL, "C-"),
            (Self::ALT, "A-"),
            (Self::SHIFT, "S-"),
        ] {
            if self.contains(flag) {
                f.write_str(prefix)?;
            }
        }
        Ok(())
    }
}
