//! Game storage over a `BlobStore`.
//!
//! Storage is a collaborator the game must not stall on: failed reads come
//! back empty and failed writes are logged, never returned to the caller.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use grapevine_core::store::BlobStore;
use grapevine_core::whisper::GameRecord;
use tracing::{error, warn};

/// Container of finalized game records, one JSON blob per game.
pub const GAMES_CONTAINER: &str = "grapevine-games";
/// Container of RFC 3339 start times, one blob per game.
pub const START_TIMES_CONTAINER: &str = "grapevine-games-start-times";
/// Container of the initiator's original messages, one blob per game.
pub const START_MESSAGES_CONTAINER: &str = "grapevine-games-start-messages";
/// Container of received-message logs, one `{gameId}.txt` blob per game.
pub const RECEIVED_MESSAGES_CONTAINER: &str = "grapevine-games-received-messages";

/// Game-level view of the blob store.
#[derive(Clone)]
pub struct GameStore {
    blobs: Arc<dyn BlobStore>,
}

impl GameStore {
    /// Wraps a blob store.
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Appends one line to the game's received-message log.
    ///
    /// A player may appear several times in one chain, so the log grows
    /// rather than being overwritten.
    pub async fn append_received_message(&self, game_id: i64, message: &str) {
        let name = format!("{game_id}.txt");
        let line = format!("{message}\n");
        if let Err(err) = self
            .blobs
            .append_text(RECEIVED_MESSAGES_CONTAINER, &name, &line)
            .await
        {
            error!(game_id, error = %err, "failed to append received message");
        }
    }

    /// Archives the start time and the initiator's message.
    pub async fn record_start(&self, game_id: i64, started_at: DateTime<Utc>, start_message: &str) {
        let started_at = started_at.to_rfc3339_opts(SecondsFormat::Micros, true);
        self.write_or_log(START_TIMES_CONTAINER, &game_id.to_string(), &started_at)
            .await;
        self.write_or_log(START_MESSAGES_CONTAINER, &game_id.to_string(), start_message)
            .await;
    }

    /// Reads the archived start time. `None` if missing or unreadable.
    pub async fn start_time(&self, game_id: i64) -> Option<DateTime<Utc>> {
        let text = self
            .read_or_empty(START_TIMES_CONTAINER, &game_id.to_string())
            .await;
        if text.is_empty() {
            warn!(game_id, "no start time archived for game");
            return None;
        }

        match DateTime::parse_from_rfc3339(text.trim()) {
            Ok(started_at) => Some(started_at.with_timezone(&Utc)),
            Err(err) => {
                warn!(game_id, error = %err, "archived start time is not RFC 3339");
                None
            }
        }
    }

    /// Reads the archived start message. Empty if missing or unreadable.
    pub async fn start_message(&self, game_id: i64) -> String {
        self.read_or_empty(START_MESSAGES_CONTAINER, &game_id.to_string())
            .await
    }

    /// Reads a finalized game record.
    pub async fn game(&self, game_id: i64) -> Option<GameRecord> {
        let text = self
            .read_or_empty(GAMES_CONTAINER, &game_id.to_string())
            .await;
        if text.is_empty() {
            return None;
        }

        match serde_json::from_str(&text) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(game_id, error = %err, "archived game record is unreadable");
                None
            }
        }
    }

    /// Reads every finalized game record. Unreadable records are skipped.
    pub async fn games(&self) -> Vec<GameRecord> {
        let texts = match self.blobs.list_texts(GAMES_CONTAINER).await {
            Ok(texts) => texts,
            Err(err) => {
                error!(container = GAMES_CONTAINER, error = %err, "failed to list games");
                return Vec::new();
            }
        };

        texts
            .iter()
            .filter_map(|text| match serde_json::from_str(text) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable game record");
                    None
                }
            })
            .collect()
    }

    /// Archives a finalized game record.
    pub async fn write_game(&self, record: &GameRecord) {
        match serde_json::to_string(record) {
            Ok(json) => {
                self.write_or_log(GAMES_CONTAINER, &record.game_id.to_string(), &json)
                    .await;
            }
            Err(err) => {
                error!(game_id = record.game_id, error = %err, "failed to serialize game record");
            }
        }
    }

    async fn read_or_empty(&self, container: &str, name: &str) -> String {
        match self.blobs.read_text(container, name).await {
            Ok(text) => text.unwrap_or_default(),
            Err(err) => {
                error!(container, name, error = %err, "failed to read blob");
                String::new()
            }
        }
    }

    async fn write_or_log(&self, container: &str, name: &str, text: &str) {
        if let Err(err) = self.blobs.write_text(container, name, text).await {
            error!(container, name, error = %err, "failed to write blob");
        }
    }
}
