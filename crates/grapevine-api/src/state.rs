//! Shared application state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use grapevine_core::clock::Clock;
use grapevine_core::delivery::WhisperSender;
use grapevine_core::rhyme::RhymeLookup;
use grapevine_core::rng::DeterministicRng;
use grapevine_core::store::BlobStore;
use grapevine_relay::application::dispatcher::RelayDispatcher;
use grapevine_relay::application::game_store::GameStore;
use grapevine_relay::domain::mutator::MessageMutator;

/// Budgets for the two outbound calls a hop makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Longest wait for a rhyme before keeping the original word.
    pub rhyme_lookup: Duration,
    /// Longest wait for the next recipient to accept a whisper.
    pub delivery: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            rhyme_lookup: Duration::from_secs(2),
            delivery: Duration::from_secs(10),
        }
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Handles inbound whispers.
    pub dispatcher: Arc<RelayDispatcher>,
    /// Archived games, for the query actions.
    pub games: GameStore,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        blobs: Arc<dyn BlobStore>,
        rhymes: Arc<dyn RhymeLookup>,
        sender: Arc<dyn WhisperSender>,
        timeouts: Timeouts,
    ) -> Self {
        let games = GameStore::new(blobs);
        let mutator = MessageMutator::new(rhymes, timeouts.rhyme_lookup);
        let dispatcher = RelayDispatcher::new(
            games.clone(),
            mutator,
            sender,
            clock,
            rng,
            timeouts.delivery,
        );

        Self {
            dispatcher: Arc::new(dispatcher),
            games,
        }
    }
}
