//! UTF-8 multi-byte sequences.

use ttykey_proto::KeyEvent;

use crate::decoder::Step;

/// Decode a sequence starting at a byte `>= 0x80`.
///
/// A bad continuation byte is consumed together with the sequence it
/// interrupted. Overlong forms, surrogates and values above `char::MAX`
/// decode to [`KeyEvent::INVALID`].
pub(crate) fn decode(input: &[u8]) -> Step {
    let Some(&lead) = input.first() else {
        return Step::Incomplete;
    };

    let (len, bits, min) = match lead {
        0xc0..=0xdf => (2, lead & 0x1f, 0x80),
        0xe0..=0xef => (3, lead & 0x0f, 0x800),
        0xf0..=0xf7 => (4, lead & 0x07, 0x1_0000),
        // Stray continuation byte or impossible lead byte
        _ => return Step::Key(KeyEvent::INVALID, 1),
    };

    let mut codepoint = u32::from(bits);
    for i in 1..len {
        let Some(&byte) = input.get(i) else {
            return Step::Incomplete;
        };
        if byte & 0xc0 != 0x80 {
            return Step::Key(KeyEvent::INVALID, i + 1);
        }
        codepoint = (codepoint << 6) | u32::from(byte & 0x3f);
    }

    if codepoint < min {
        return Step::Key(KeyEvent::INVALID, len);
    }

    let event = char::from_u32(codepoint).map_or(KeyEvent::INVALID, KeyEvent::plain);
    Step::Key(event, len)
}
