//! Message mutation: select a word, look up a rhyme, swap one occurrence.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use grapevine_core::error::DomainError;
use grapevine_core::rhyme::RhymeLookup;
use grapevine_core::rng::DeterministicRng;
use tracing::{debug, warn};

use super::word_selector::{Occurrence, replace_word, select_word};

fn lock_rng<'a>(
    rng: &'a Mutex<dyn DeterministicRng + Send + 'static>,
) -> Result<MutexGuard<'a, dyn DeterministicRng + Send + 'static>, DomainError> {
    match rng.lock() {
        Ok(guard) => Ok(guard),
        Err(e) => Err(DomainError::Infrastructure(format!("RNG mutex poisoned: {e}"))),
    }
}

/// Rewrites a message by replacing one word with a rhyme.
pub struct MessageMutator {
    rhymes: Arc<dyn RhymeLookup>,
    lookup_timeout: Duration,
}

impl MessageMutator {
    /// Creates a mutator that waits at most `lookup_timeout` for a rhyme.
    #[must_use]
    pub fn new(rhymes: Arc<dyn RhymeLookup>, lookup_timeout: Duration) -> Self {
        Self {
            rhymes,
            lookup_timeout,
        }
    }

    /// Returns the mutated message.
    ///
    /// The RNG is locked only around the synchronous selection steps, never
    /// across the rhyme lookup.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoCandidateWords` for a message without words,
    /// or `DomainError::Infrastructure` if the RNG mutex is poisoned.
    pub async fn mutate(
        &self,
        message: &str,
        rng: &Mutex<dyn DeterministicRng + Send + 'static>,
    ) -> Result<String, DomainError> {
        let word = {
            let mut guard = lock_rng(rng)?;
            select_word(message, &mut *guard)?.to_owned()
        };

        let replacement = self.rhyme_for(&word).await;
        let occurrence = Occurrence::flip(&mut *lock_rng(rng)?);

        debug!(word = %word, replacement = %replacement, ?occurrence, "replacing word");
        Ok(replace_word(message, &word, &replacement, occurrence))
    }

    /// Looks up a rhyme, falling back to the word itself so the game keeps
    /// moving.
    async fn rhyme_for(&self, word: &str) -> String {
        match tokio::time::timeout(self.lookup_timeout, self.rhymes.lookup(word)).await {
            Ok(Some(rhyme)) => rhyme,
            Ok(None) => {
                warn!(word, "no rhyme found, using original word to keep the game going");
                word.to_owned()
            }
            Err(_) => {
                warn!(
                    word,
                    timeout = ?self.lookup_timeout,
                    "rhyme lookup timed out, using original word to keep the game going"
                );
                word.to_owned()
            }
        }
    }
}
