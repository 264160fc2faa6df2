//! Relay dispatcher for the whisper relay.
//!
//! Orchestrates one inbound whisper: log it, classify the hop, then either
//! mutate and forward it or archive the finished game.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use grapevine_core::clock::Clock;
use grapevine_core::delivery::WhisperSender;
use grapevine_core::error::DomainError;
use grapevine_core::rng::DeterministicRng;
use grapevine_core::whisper::{GameRecord, Recipient, Whisper};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, instrument, warn};

use crate::application::game_store::GameStore;
use crate::domain::mutator::MessageMutator;
use crate::domain::relay::{HopKind, Route};

/// Result of handling one inbound whisper.
#[derive(Debug)]
pub enum HopOutcome {
    /// The whisper was mutated and handed to a detached delivery task.
    Relayed {
        /// Whether this hop started the game or relayed it.
        kind: HopKind,
        /// The whisper as it was sent on.
        whisper: Whisper,
        /// Where it was sent.
        recipient: Recipient,
        /// The delivery task. It logs its own failure; awaiting it is only
        /// needed to observe completion.
        delivery: JoinHandle<()>,
    },
    /// The game is over and its record is archived.
    Finalized(GameRecord),
}

/// Handles inbound whispers end to end.
pub struct RelayDispatcher {
    store: GameStore,
    mutator: MessageMutator,
    sender: Arc<dyn WhisperSender>,
    clock: Arc<dyn Clock>,
    rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    delivery_timeout: Duration,
}

impl RelayDispatcher {
    /// Creates a dispatcher from its collaborators.
    #[must_use]
    pub fn new(
        store: GameStore,
        mutator: MessageMutator,
        sender: Arc<dyn WhisperSender>,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        delivery_timeout: Duration,
    ) -> Self {
        Self {
            store,
            mutator,
            sender,
            clock,
            rng,
            delivery_timeout,
        }
    }

    /// Handles one inbound whisper.
    ///
    /// Storage and delivery failures are logged, never returned: once the
    /// whisper is accepted the game keeps moving.
    ///
    /// # Errors
    ///
    /// Returns a protocol error (`MalformedChain`, `UnresolvedRecipient`,
    /// `NoCandidateWords`) if the whisper cannot be relayed, or
    /// `DomainError::Infrastructure` if the RNG mutex is poisoned.
    #[instrument(skip(self, whisper), fields(game_id = whisper.game_id, sent_from_id = whisper.sent_from_id))]
    pub async fn dispatch(&self, mut whisper: Whisper) -> Result<HopOutcome, DomainError> {
        info!(message = %whisper.message, "whisper received");
        self.store
            .append_received_message(whisper.game_id, &whisper.message)
            .await;

        let kind = HopKind::classify(&whisper)?;
        debug!(hop = %kind, "hop classified");

        let Some(route) = Route::plan(&whisper, kind)? else {
            return Ok(HopOutcome::Finalized(self.finalize(&whisper).await));
        };

        let mutated = self.mutator.mutate(&whisper.message, &self.rng).await?;
        let started_at = self.clock.now();
        let start_message = std::mem::replace(&mut whisper.message, mutated);
        route.apply(&mut whisper);

        // No await between mutation and spawning: a dropped request must not
        // cancel the forward.
        let delivery = self.spawn_delivery(route.recipient.clone(), whisper.clone());

        info!(
            hop = %kind,
            recipient_id = route.recipient.id,
            message = %whisper.message,
            "whisper forwarded"
        );

        if kind == HopKind::Initiating {
            self.store
                .record_start(whisper.game_id, started_at, &start_message)
                .await;
        }

        Ok(HopOutcome::Relayed {
            kind,
            whisper,
            recipient: route.recipient,
            delivery,
        })
    }

    /// Builds and archives the game record. A game that is already archived
    /// keeps its first record.
    async fn finalize(&self, whisper: &Whisper) -> GameRecord {
        if let Some(existing) = self.store.game(whisper.game_id).await {
            warn!("game already finalized, keeping the archived record");
            return existing;
        }

        let record = GameRecord {
            game_id: whisper.game_id,
            started_at: self.store.start_time(whisper.game_id).await,
            ended_at: self.clock.now(),
            start_message: self.store.start_message(whisper.game_id).await,
            end_message: whisper.message.clone(),
        };

        self.store.write_game(&record).await;
        info!(
            start_message = %record.start_message,
            end_message = %record.end_message,
            "game finalized"
        );
        record
    }

    /// Posts the whisper from a detached task. It outlives the inbound
    /// request and logs its own outcome.
    fn spawn_delivery(&self, recipient: Recipient, whisper: Whisper) -> JoinHandle<()> {
        let sender = Arc::clone(&self.sender);
        let limit = self.delivery_timeout;

        tokio::spawn(
            async move {
                match tokio::time::timeout(limit, sender.send(&recipient.url, &whisper)).await {
                    Ok(Ok(())) => {
                        info!(recipient_id = recipient.id, url = %recipient.url, "whisper delivered");
                    }
                    Ok(Err(err)) => {
                        error!(
                            recipient_id = recipient.id,
                            url = %recipient.url,
                            error = %err,
                            "whisper delivery failed"
                        );
                    }
                    Err(_) => {
                        error!(
                            recipient_id = recipient.id,
                            url = %recipient.url,
                            timeout = ?limit,
                            "whisper delivery timed out"
                        );
                    }
                }
            }
            .in_current_span(),
        )
    }
}
