//! Fuzz target for decoder chunk boundaries
//!
//! # Strategy
//!
//! - Arbitrary input bytes, split at arbitrary cut points
//! - Arbitrary erase character
//!
//! # Invariants
//!
//! - Chunked decoding MUST equal decoding the whole input at once
//! - Invalid events MUST NOT carry modifiers
//! - After flush, nothing MUST be pending
//! - Every event MUST consume at least one byte

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ttykey_core::KeyDecoder;
use ttykey_proto::KeyEvent;

#[derive(Debug, Arbitrary)]
struct Input {
    backspace: u8,
    bytes: Vec<u8>,
    cuts: Vec<u16>,
}

fn decode_whole(backspace: u8, bytes: &[u8]) -> Vec<KeyEvent> {
    let mut decoder = KeyDecoder::new(backspace);
    let mut events = decoder.feed(bytes);
    events.extend(decoder.flush());
    assert!(!decoder.has_pending());
    events
}

fuzz_target!(|input: Input| {
    let whole = decode_whole(input.backspace, &input.bytes);
    assert!(whole.len() <= input.bytes.len());
    for event in &whole {
        if event.is_invalid() {
            assert!(event.modifiers().is_empty());
        }
    }

    let mut cuts: Vec<usize> =
        input.cuts.iter().map(|&cut| usize::from(cut) % (input.bytes.len() + 1)).collect();
    cuts.sort_unstable();

    let mut decoder = KeyDecoder::new(input.backspace);
    let mut chunked = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunked.extend(decoder.feed(&input.bytes[start..cut]));
        start = cut;
    }
    chunked.extend(decoder.feed(&input.bytes[start..]));
    chunked.extend(decoder.flush());

    assert_eq!(chunked, whole);
    assert!(!decoder.has_pending());
});
