//! HTTP whisper delivery.

use std::time::Duration;

use async_trait::async_trait;
use grapevine_core::delivery::WhisperSender;
use grapevine_core::error::DomainError;
use grapevine_core::whisper::Whisper;
use reqwest::Client;
use tracing::debug;

use crate::USER_AGENT;

/// Header that selects the inbound operation on a Grapevine endpoint.
pub const ACTION_HEADER: &str = "GrapevineAction";

/// Posts whispers as JSON to the next recipient's endpoint.
#[derive(Debug, Clone)]
pub struct HttpWhisperSender {
    client: Client,
}

impl HttpWhisperSender {
    /// Creates a sender whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be
    /// built.
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::Infrastructure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl WhisperSender for HttpWhisperSender {
    async fn send(&self, url: &str, whisper: &Whisper) -> Result<(), DomainError> {
        let response = self
            .client
            .post(url)
            .header(ACTION_HEADER, "whisper")
            .json(whisper)
            .send()
            .await
            .map_err(|e| DomainError::Infrastructure(format!("POST {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Infrastructure(format!(
                "POST {url} returned {status}"
            )));
        }

        debug!(url, %status, "whisper accepted by recipient");
        Ok(())
    }
}
