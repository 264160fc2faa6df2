//! Datamuse rhyme dictionary client.
//!
//! Queries `GET {base_url}?rel_rhy={word}`, which answers with a JSON array
//! of `{"word": ..., "score": ...}` objects ordered by relevance.

use std::time::Duration;

use async_trait::async_trait;
use grapevine_core::error::DomainError;
use grapevine_core::rhyme::RhymeLookup;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::USER_AGENT;

/// Public Datamuse endpoint.
pub const DEFAULT_DATAMUSE_URL: &str = "https://api.datamuse.com/words";

/// One entry of a Datamuse answer. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct DatamuseWord {
    word: String,
}

/// Rhyme lookup backed by the Datamuse API.
#[derive(Debug, Clone)]
pub struct DatamuseRhymeLookup {
    client: Client,
    base_url: String,
}

impl DatamuseRhymeLookup {
    /// Creates a client for `base_url` whose requests give up after
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::Infrastructure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn fetch(&self, word: &str) -> Result<Vec<DatamuseWord>, reqwest::Error> {
        self.client
            .get(&self.base_url)
            .query(&[("rel_rhy", word)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

/// Picks the best-ranked answer that is a single word, so a substitution
/// never changes the message's word count.
fn first_single_word(words: Vec<DatamuseWord>) -> Option<String> {
    words
        .into_iter()
        .map(|w| w.word)
        .find(|w| !w.is_empty() && !w.contains(char::is_whitespace))
}

#[async_trait]
impl RhymeLookup for DatamuseRhymeLookup {
    async fn lookup(&self, word: &str) -> Option<String> {
        match self.fetch(word).await {
            Ok(words) => {
                let rhyme = first_single_word(words);
                debug!(word, rhyme = ?rhyme, "rhyme lookup answered");
                rhyme
            }
            Err(err) => {
                warn!(word, error = %err, "rhyme lookup failed");
                None
            }
        }
    }
}
