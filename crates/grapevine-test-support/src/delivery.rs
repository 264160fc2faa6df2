//! Test senders: mock `WhisperSender` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use grapevine_core::delivery::WhisperSender;
use grapevine_core::error::DomainError;
use grapevine_core::whisper::Whisper;

/// A sender that records every delivery and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingWhisperSender {
    sent: Mutex<Vec<(String, Whisper)>>,
}

impl RecordingWhisperSender {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all `(url, whisper)` deliveries.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<(String, Whisper)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl WhisperSender for RecordingWhisperSender {
    async fn send(&self, url: &str, whisper: &Whisper) -> Result<(), DomainError> {
        self.sent
            .lock()
            .unwrap()
            .push((url.to_owned(), whisper.clone()));
        Ok(())
    }
}

/// A sender whose recipients are always unreachable.
#[derive(Debug)]
pub struct FailingWhisperSender;

#[async_trait]
impl WhisperSender for FailingWhisperSender {
    async fn send(&self, url: &str, _whisper: &Whisper) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure(format!("{url} is unreachable")))
    }
}
