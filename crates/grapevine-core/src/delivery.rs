//! Outbound whisper delivery abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::whisper::Whisper;

/// Posts a whisper to the next recipient's endpoint.
///
/// Only delivery is reported; any response body is ignored.
#[async_trait]
pub trait WhisperSender: Send + Sync {
    /// Delivers `whisper` to `url`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the recipient could not be
    /// reached or rejected the whisper.
    async fn send(&self, url: &str, whisper: &Whisper) -> Result<(), DomainError>;
}
