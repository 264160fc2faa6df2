//! Query handlers for archived games.

use grapevine_core::error::DomainError;
use grapevine_core::whisper::GameRecord;
use serde::Serialize;

use crate::application::game_store::GameStore;

/// Read-only view of every archived game.
#[derive(Debug, Serialize)]
pub struct GamesView {
    /// All finalized game records.
    pub games: Vec<GameRecord>,
}

/// Retrieves an archived game by id.
///
/// # Errors
///
/// Returns `DomainError::GameNotFound` if the game has not been finalized.
pub async fn get_game(game_id: i64, store: &GameStore) -> Result<GameRecord, DomainError> {
    store
        .game(game_id)
        .await
        .ok_or(DomainError::GameNotFound(game_id))
}

/// Lists every archived game.
pub async fn list_games(store: &GameStore) -> GamesView {
    GamesView {
        games: store.games().await,
    }
}
