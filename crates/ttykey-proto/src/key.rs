//! Key identities.
//!
//! A [`Key`] is either a Unicode scalar value or one of a fixed set of named
//! [`FunctionKey`]s. The two kinds are kept apart by the type system; the
//! numeric tag space of [`FunctionKey`] only exists for the extended
//! `CSI ... u` form, where a single integer parameter may name either kind.

use std::fmt;

/// Named keys and input markers that have no codepoint of their own.
///
/// Declaration order defines the tag of each variant (see
/// [`FunctionKey::tag`]) and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionKey {
    /// Insert.
    Insert,
    /// Delete (forward delete).
    Delete,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Right arrow.
    Right,
    /// Left arrow.
    Left,
    /// Home.
    Home,
    /// End.
    End,
    /// F1.
    F1,
    /// F2.
    F2,
    /// F3.
    F3,
    /// F4.
    F4,
    /// F5.
    F5,
    /// F6.
    F6,
    /// F7.
    F7,
    /// F8.
    F8,
    /// F9.
    F9,
    /// F10.
    F10,
    /// F11.
    F11,
    /// F12.
    F12,
    /// Enter/Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace (the terminal's configured erase character).
    Backspace,
    /// Tab.
    Tab,
    /// Space bar.
    Space,
    /// Terminal window gained focus.
    FocusIn,
    /// Terminal window lost focus.
    FocusOut,
    /// Start of a bracketed paste.
    PasteStart,
    /// End of a bracketed paste.
    PasteEnd,
    /// One or more input bytes could not be decoded and were discarded.
    Invalid,
}

impl FunctionKey {
    /// First tag value. Strictly above `char::MAX` so tags never collide with
    /// codepoints.
    pub const TAG_BASE: u32 = 0x11_0000;

    /// Every function key in tag order.
    pub const ALL: [Self; 32] = [
        Self::Insert,
        Self::Delete,
        Self::PageUp,
        Self::PageDown,
        Self::Up,
        Self::Down,
        Self::Right,
        Self::Left,
        Self::Home,
        Self::End,
        Self::F1,
        Self::F2,
        Self::F3,
        Self::F4,
        Self::F5,
        Self::F6,
        Self::F7,
        Self::F8,
        Self::F9,
        Self::F10,
        Self::F11,
        Self::F12,
        Self::Enter,
        Self::Escape,
        Self::Backspace,
        Self::Tab,
        Self::Space,
        Self::FocusIn,
        Self::FocusOut,
        Self::PasteStart,
        Self::PasteEnd,
        Self::Invalid,
    ];

    /// Numeric tag of this key in the extended key protocol.
    #[must_use]
    pub fn tag(self) -> u32 {
        Self::TAG_BASE + self as u32
    }

    /// Function key for a numeric tag. `None` outside the tag range.
    #[must_use]
    pub fn from_tag(tag: u32) -> Option<Self> {
        let index = tag.checked_sub(Self::TAG_BASE)?;
        Self::ALL.get(index as usize).copied()
    }

    /// Short display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Insert => "Insert",
            Self::Delete => "Delete",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Right => "Right",
            Self::Left => "Left",
            Self::Home => "Home",
            Self::End => "End",
            Self::F1 => "F1",
            Self::F2 => "F2",
            Self::F3 => "F3",
            Self::F4 => "F4",
            Self::F5 => "F5",
            Self::F6 => "F6",
            Self::F7 => "F7",
            Self::F8 => "F8",
            Self::F9 => "F9",
            Self::F10 => "F10",
            Self::F11 => "F11",
            Self::F12 => "F12",
            Self::Enter => "Enter",
            Self::Escape => "Esc",
            Self::Backspace => "Backspace",
            Self::Tab => "Tab",
            Self::Space => "Space",
            Self::FocusIn => "FocusIn",
            Self::FocusOut => "FocusOut",
            Self::PasteStart => "PasteStart",
            Self::PasteEnd => "PasteEnd",
            Self::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A Unicode scalar value.
    Codepoint(char),
    /// A named key or input marker.
    Function(FunctionKey),
}

impl Key {
    /// Resolve an integer payload from the extended key protocol.
    ///
    /// Function tags map to their key, the C0/DEL codes that have a key
    /// identity map to it, other scalar values become codepoints. Anything
    /// else is [`FunctionKey::Invalid`].
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        if let Some(function) = FunctionKey::from_tag(code) {
            return Self::Function(function);
        }
        match code {
            0x09 => Self::Function(FunctionKey::Tab),
            0x0d => Self::Function(FunctionKey::Enter),
            0x1b => Self::Function(FunctionKey::Escape),
            0x7f => Self::Function(FunctionKey::Backspace),
            _ => char::from_u32(code).map_or(Self::Function(FunctionKey::Invalid), Self::Codepoint),
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::Codepoint(c)
    }
}

impl From<FunctionKey> for Key {
    fn from(function: FunctionKey) -> Self {
        Self::Function(function)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codepoint(c) if c.is_ascii_graphic() => write!(f, "{c}"),
            Self::Codepoint(c) => write!(f, "0x{:x}", u32::from(*c)),
            Self::Function(function) => function.fmt(f),
        }
    }
}
