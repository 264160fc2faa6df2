//! Rhyme dictionary abstraction.

use async_trait::async_trait;

/// Looks up a word that rhymes with the given one.
///
/// The dictionary is unreliable by contract: an empty answer, a malformed
/// response and a network failure are all reported as `None`.
#[async_trait]
pub trait RhymeLookup: Send + Sync {
    /// Returns a single rhyming word, or `None` if none could be found.
    async fn lookup(&self, word: &str) -> Option<String>;
}
