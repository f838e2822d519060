//! Decoded key event.

use std::fmt;

use crate::{FunctionKey, Key, Modifiers};

/// One decoded keypress or input marker.
///
/// # Invariants
///
/// - An [`FunctionKey::Invalid`] event never carries modifiers. It signals
///   that input bytes were discarded, not that a particular key was pressed.
///   Every constructor enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    key: Key,
    modifiers: Modifiers,
}

impl KeyEvent {
    /// Event for undecodable input.
    pub const INVALID: Self =
        Self { key: Key::Function(FunctionKey::Invalid), modifiers: Modifiers::empty() };

    /// Create an event. Modifiers are dropped for [`FunctionKey::Invalid`].
    #[must_use]
    pub fn new(key: impl Into<Key>, modifiers: Modifiers) -> Self {
        let key = key.into();
        if key == Key::Function(FunctionKey::Invalid) {
            return Self::INVALID;
        }
        Self { key, modifiers }
    }

    /// Unmodified key.
    #[must_use]
    pub fn plain(key: impl Into<Key>) -> Self {
        Self::new(key, Modifiers::empty())
    }

    /// Unmodified function key.
    #[must_use]
    pub fn function(function: FunctionKey) -> Self {
        Self::plain(function)
    }

    /// Same key with `modifiers` added.
    #[must_use]
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self::new(self.key, self.modifiers | modifiers)
    }

    /// Key payload.
    #[must_use]
    pub fn key(&self) -> Key {
        self.key
    }

    /// Modifier set.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether every flag in `modifiers` is set.
    #[must_use]
    pub fn has(&self, modifiers: Modifiers) -> bool {
        self.modifiers.contains(modifiers)
    }

    /// Whether this event stands for discarded input.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.key == Key::Function(FunctionKey::Invalid)
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::plain(key)
    }
}

/// Compact form used by the echo tool: `C-A-Left`, `S-F5`, `0x20ac`.
impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.modifiers, self.key)
    }
}
