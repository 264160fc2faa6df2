//! Wire model shared by the relay, its collaborators and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `sentFromId` value carried by a whisper that comes straight from the game
/// initiator rather than from a chain member.
pub const INITIATOR_ID: i64 = -1;

/// One participant of a relay chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Position marker within the chain. Resolved by lookup, never by index.
    #[serde(alias = "Id")]
    pub id: i64,
    /// Endpoint the whisper is posted to when this recipient is next.
    #[serde(alias = "Url")]
    pub url: String,
}

impl Recipient {
    /// Creates a recipient.
    #[must_use]
    pub fn new(id: i64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
        }
    }
}

/// The message in flight plus the relay-chain metadata it carries.
///
/// Legacy PascalCase keys are accepted on input so older game runners can
/// still seed games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Whisper {
    /// Stable identifier for one game instance.
    #[serde(alias = "GameId")]
    pub game_id: i64,
    /// Payload, rewritten at every non-terminal hop.
    #[serde(alias = "Message")]
    pub message: String,
    /// Position of the sender, or [`INITIATOR_ID`].
    #[serde(alias = "SentFromId")]
    pub sent_from_id: i64,
    /// Ordered relay chain, fixed for the life of the game.
    #[serde(alias = "WhisperRecipients")]
    pub recipients: Vec<Recipient>,
    /// Position this whisper is currently addressed to.
    #[serde(alias = "NextWhisperRecipientId")]
    pub next_recipient_id: i64,
}

impl Whisper {
    /// Returns `true` when the whisper was sent by the game initiator.
    #[must_use]
    pub fn is_from_initiator(&self) -> bool {
        self.sent_from_id == INITIATOR_ID
    }
}

/// Archived result of a finished game. Written once, at finalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// The game identifier.
    #[serde(rename = "gameId")]
    pub game_id: i64,
    /// When the initiating hop ran. `None` if the start time was never
    /// archived or could not be read back.
    #[serde(rename = "gameStarted", default)]
    pub started_at: Option<DateTime<Utc>>,
    /// When the terminal hop ran.
    #[serde(rename = "gameEnded")]
    pub ended_at: DateTime<Utc>,
    /// The message as the initiator sent it.
    #[serde(rename = "startingMessage")]
    pub start_message: String,
    /// The message as the last player sent it back.
    #[serde(rename = "endMessage")]
    pub end_message: String,
}
