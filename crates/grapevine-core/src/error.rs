//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No archived record exists for the game.
    #[error("game not found: {0}")]
    GameNotFound(i64),

    /// The recipient chain is empty or contains duplicate ids.
    #[error("malformed recipient chain: {0}")]
    MalformedChain(String),

    /// A recipient id does not resolve to any member of the chain.
    #[error("recipient {0} is not part of the chain")]
    UnresolvedRecipient(i64),

    /// The message has no word that could be mutated.
    #[error("message has no candidate words to mutate")]
    NoCandidateWords,

    /// A validation error in caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for errors that abort a hop because the whisper itself
    /// breaks the relay protocol.
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedChain(_) | Self::UnresolvedRecipient(_) | Self::NoCandidateWords
        )
    }
}
