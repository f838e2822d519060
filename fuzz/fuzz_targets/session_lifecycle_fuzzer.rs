//! Fuzz target for the input session state machine
//!
//! # Strategy
//!
//! - Random interleaving of input chunks, ticks and lifecycle events
//!
//! # Invariants
//!
//! - Shutdown MUST be emitted at most once
//! - After shutdown, every handler MUST return no actions
//! - Flushed batches MUST NOT be empty
//! - Input batches MUST carry the chunk that produced them

#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ttykey_core::{InputSession, KeyBatch, SessionAction, SessionConfig, SessionState};

#[derive(Debug, Arbitrary)]
enum Op {
    Input(Vec<u8>),
    Tick(u8),
    EndOfInput,
    ReadError,
    Terminate,
    ConsumerQuit,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut session = InputSession::new(SessionConfig::default(), 0x7f);
    let mut shutdowns = 0;

    for op in ops {
        let terminating = session.state() == SessionState::Terminating;
        let actions = match &op {
            Op::Input(bytes) => session.handle_input(bytes),
            Op::Tick(ms) => session.handle_tick(Duration::from_millis(u64::from(*ms))),
            Op::EndOfInput => session.handle_end_of_input(),
            Op::ReadError => session.handle_read_error("fuzz".to_string()),
            Op::Terminate => session.handle_termination("fuzz"),
            Op::ConsumerQuit => session.handle_consumer_quit(),
        };

        if terminating {
            assert!(actions.is_empty());
        }

        for action in actions {
            match action {
                SessionAction::Forward(KeyBatch::Input { bytes, .. }) => {
                    assert!(matches!(&op, Op::Input(chunk) if *chunk == bytes));
                },
                SessionAction::Forward(KeyBatch::Flushed { events }) => {
                    assert!(!events.is_empty());
                },
                SessionAction::Shutdown { .. } => {
                    shutdowns += 1;
                    assert_eq!(session.state(), SessionState::Terminating);
                },
            }
        }
    }

    assert!(shutdowns <= 1);
});
