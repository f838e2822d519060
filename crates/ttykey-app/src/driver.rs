//! Driver trait for consuming decoded keys.
//!
//! The [`Driver`] trait decouples the input runtime from what happens to the
//! keys. The echo tool prints them; tests record them.

use ttykey_core::KeyBatch;

/// Whether the runtime keeps going after a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input
    Continue,
    /// Shut the session down
    Quit,
}

/// Consumer of decoded key batches.
///
/// The [`Runtime`](crate::Runtime) calls [`forward`](Driver::forward) for
/// every batch in input order and [`stop`](Driver::stop) exactly once when
/// the session ends, whatever the reason.
pub trait Driver {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Handle one batch of keys.
    ///
    /// # Errors
    ///
    /// An error aborts the runtime after [`stop`](Driver::stop) is called.
    fn forward(&mut self, batch: &KeyBatch) -> Result<Flow, Self::Error>;

    /// Release resources and restore whatever the driver changed.
    fn stop(&mut self);
}
