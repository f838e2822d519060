//! Integration tests for the input runtime.
//!
//! Time is paused, so idle flushes happen at exact tick boundaries:
//! - A lone ESC is reported after the idle threshold
//! - An ESC followed quickly by the rest of a sequence is merged
//! - Every exit path stops the driver exactly once

use std::{
    future, io,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use tokio::io::{AsyncRead, AsyncWriteExt, ReadBuf};
use ttykey_app::{Driver, Flow, Runtime, RuntimeError, TerminationRequest};
use ttykey_core::{KeyBatch, SessionConfig, ShutdownReason};
use ttykey_proto::{FunctionKey, KeyEvent, Modifiers};

const DEL: u8 = 0x7f;

/// Driver that records everything and quits on Ctrl-Q.
#[derive(Debug, Default)]
struct RecordingDriver {
    batches: Vec<KeyBatch>,
    stops: usize,
    fail: bool,
}

impl RecordingDriver {
    fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

impl Driver for RecordingDriver {
    type Error = io::Error;

    fn forward(&mut self, batch: &KeyBatch) -> Result<Flow, Self::Error> {
        if self.fail {
            return Err(io::Error::other("sink closed"));
        }
        self.batches.push(batch.clone());

        let quit = KeyEvent::new('q', Modifiers::CTRL);
        if batch.events().contains(&quit) { Ok(Flow::Quit) } else { Ok(Flow::Continue) }
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

/// Reader whose every read fails.
struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::other("device gone")))
    }
}

fn input(bytes: &[u8], events: Vec<KeyEvent>) -> KeyBatch {
    KeyBatch::Input { bytes: bytes.to_vec(), events }
}

fn never() -> future::Pending<TerminationRequest> {
    future::pending()
}

#[tokio::test(start_paused = true)]
async fn lone_escape_is_flushed_after_idle() {
    let (mut tx, rx) = tokio::io::duplex(64);
    tx.write_all(b"\x1b").await.expect("write");
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        drop(tx);
    });

    let mut runtime = Runtime::new(rx, RecordingDriver::default(), SessionConfig::default(), DEL);
    let reason = runtime.run(never()).await.expect("run");

    assert_eq!(reason, ShutdownReason::EndOfInput);
    let driver = runtime.into_driver();
    assert_eq!(driver.batches, vec![
        input(b"\x1b", vec![]),
        KeyBatch::Flushed { events: vec![KeyEvent::function(FunctionKey::Escape)] },
    ]);
    assert_eq!(driver.stops, 1);
}

#[tokio::test(start_paused = true)]
async fn escape_merges_with_quick_follow_up() {
    let (mut tx, rx) = tokio::io::duplex(64);
    tx.write_all(b"\x1b").await.expect("write");
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.write_all(b"[A").await.expect("write");
        tokio::time::sleep(Duration::from_millis(200)).await;
        drop(tx);
    });

    let mut runtime = Runtime::new(rx, RecordingDriver::default(), SessionConfig::default(), DEL);
    let reason = runtime.run(never()).await.expect("run");

    assert_eq!(reason, ShutdownReason::EndOfInput);
    assert_eq!(runtime.driver().batches, vec![
        input(b"\x1b", vec![]),
        input(b"[A", vec![KeyEvent::function(FunctionKey::Up)]),
    ]);
}

#[tokio::test(start_paused = true)]
async fn consumer_quit_stops_the_session() {
    let (mut tx, rx) = tokio::io::duplex(64);
    tx.write_all(b"a\x11b").await.expect("write");

    let mut runtime = Runtime::new(rx, RecordingDriver::default(), SessionConfig::default(), DEL);
    let reason = runtime.run(never()).await.expect("run");

    assert_eq!(reason, ShutdownReason::ConsumerQuit);
    assert_eq!(runtime.driver().batches, vec![input(b"a\x11b", vec![
        KeyEvent::plain('a'),
        KeyEvent::new('q', Modifiers::CTRL),
        KeyEvent::plain('b'),
    ])]);
    assert_eq!(runtime.driver().stops, 1);
    drop(tx);
}

#[tokio::test(start_paused = true)]
async fn termination_wins_over_pending_input() {
    let (mut tx, rx) = tokio::io::duplex(64);
    tx.write_all(b"abc").await.expect("write");

    let mut runtime = Runtime::new(rx, RecordingDriver::default(), SessionConfig::default(), DEL);
    let reason =
        runtime.run(future::ready(TerminationRequest::new("SIGTERM"))).await.expect("run");

    assert_eq!(reason, ShutdownReason::Terminated { source: "SIGTERM" });
    assert!(runtime.driver().batches.is_empty());
    assert_eq!(runtime.driver().stops, 1);
}

#[tokio::test(start_paused = true)]
async fn termination_while_waiting_for_input() {
    let (_tx, rx) = tokio::io::duplex(64);
    let termination = async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        TerminationRequest::new("SIGINT")
    };

    let mut runtime = Runtime::new(rx, RecordingDriver::default(), SessionConfig::default(), DEL);
    let reason = runtime.run(termination).await.expect("run");

    assert_eq!(reason, ShutdownReason::Terminated { source: "SIGINT" });
    assert_eq!(runtime.driver().stops, 1);
}

#[tokio::test(start_paused = true)]
async fn read_error_is_not_retried() {
    let mut runtime =
        Runtime::new(BrokenReader, RecordingDriver::default(), SessionConfig::default(), DEL);
    let reason = runtime.run(never()).await.expect("run");

    assert!(matches!(reason, ShutdownReason::ReadFailed { ref error } if error == "device gone"));
    assert_eq!(runtime.driver().stops, 1);
}

#[tokio::test(start_paused = true)]
async fn driver_error_aborts_and_stops() {
    let (mut tx, rx) = tokio::io::duplex(64);
    tx.write_all(b"x").await.expect("write");

    let mut runtime = Runtime::new(rx, RecordingDriver::failing(), SessionConfig::default(), DEL);
    let result = runtime.run(never()).await;

    assert!(matches!(result, Err(RuntimeError::Driver(_))));
    assert_eq!(runtime.driver().stops, 1);

    // A stopped runtime does not run again
    assert!(matches!(runtime.run(never()).await, Err(RuntimeError::Stopped)));
    assert_eq!(runtime.driver().stops, 1);
}

#[tokio::test(start_paused = true)]
async fn zero_tick_interval_is_rejected() {
    let (_tx, rx) = tokio::io::duplex(64);
    let config = SessionConfig { tick_interval: Duration::ZERO, ..SessionConfig::default() };

    let mut runtime = Runtime::new(rx, RecordingDriver::default(), config, DEL);
    assert!(matches!(runtime.run(never()).await, Err(RuntimeError::ZeroTickInterval)));
    assert_eq!(runtime.driver().stops, 1);
    assert!(matches!(runtime.run(never()).await, Err(RuntimeError::Stopped)));
    assert_eq!(runtime.driver().stops, 1);
}

#[tokio::test(start_paused = true)]
async fn configured_backspace_is_used() {
    let (mut tx, rx) = tokio::io::duplex(64);
    tx.write_all(&[0xff, 0x08, DEL]).await.expect("write");
    drop(tx);

    let mut runtime = Runtime::new(rx, RecordingDriver::default(), SessionConfig::default(), 0xff);
    runtime.run(never()).await.expect("run");

    // Control bytes keep their meaning whatever the erase character is
    assert_eq!(runtime.driver().batches, vec![input(&[0xff, 0x08, DEL], vec![
        KeyEvent::function(FunctionKey::Backspace),
        KeyEvent::new('h', Modifiers::CTRL),
        KeyEvent::INVALID,
    ])]);
}

#[tokio::test(start_paused = true)]
async fn idle_time_resets_on_input() {
    let (mut tx, rx) = tokio::io::duplex(64);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.write_all(b"\x11").await.expect("write");
    });

    let mut runtime = Runtime::new(rx, RecordingDriver::default(), SessionConfig::default(), DEL);
    let reason = runtime.run(never()).await.expect("run");

    assert_eq!(reason, ShutdownReason::ConsumerQuit);
    assert_eq!(runtime.session().idle(), Duration::ZERO);
    assert!(!runtime.session().decoder().has_pending());
}
