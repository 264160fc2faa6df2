//! Test rhyme dictionaries: mock `RhymeLookup` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use grapevine_core::rhyme::RhymeLookup;

/// A dictionary with a fixed word table. Unknown words have no rhyme.
/// Every queried word is recorded.
#[derive(Debug, Default)]
pub struct StaticRhymeLookup {
    rhymes: HashMap<String, String>,
    queried: Mutex<Vec<String>>,
}

impl StaticRhymeLookup {
    /// Create a dictionary from `(word, rhyme)` pairs.
    #[must_use]
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            rhymes: pairs
                .into_iter()
                .map(|(word, rhyme)| (word.to_owned(), rhyme.to_owned()))
                .collect(),
            queried: Mutex::new(Vec::new()),
        }
    }

    /// Returns every word that was looked up, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn queried_words(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl RhymeLookup for StaticRhymeLookup {
    async fn lookup(&self, word: &str) -> Option<String> {
        self.queried.lock().unwrap().push(word.to_owned());
        self.rhymes.get(word).cloned()
    }
}

/// A dictionary that never finds a rhyme.
#[derive(Debug)]
pub struct NoRhymeLookup;

#[async_trait]
impl RhymeLookup for NoRhymeLookup {
    async fn lookup(&self, _word: &str) -> Option<String> {
        None
    }
}

/// A dictionary that never answers. Used to exercise lookup timeouts.
#[derive(Debug)]
pub struct PendingRhymeLookup;

#[async_trait]
impl RhymeLookup for PendingRhymeLookup {
    async fn lookup(&self, _word: &str) -> Option<String> {
        std::future::pending().await
    }
}
