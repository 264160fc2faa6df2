//! Relay state machine.
//!
//! Nothing is persisted between hops: the hop kind and the next target are
//! re-derived from the fields every inbound whisper carries.

use std::collections::HashSet;
use std::fmt;

use grapevine_core::error::DomainError;
use grapevine_core::whisper::{Recipient, Whisper};

/// What an inbound whisper means for the hop that receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopKind {
    /// Sent by the game initiator; this hop starts the game.
    Initiating,
    /// Sent by a non-terminal chain member; mutate and pass it on.
    Relaying,
    /// Sent by the last chain member; the game is over.
    Terminal,
}

impl HopKind {
    /// Classifies an inbound whisper.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedChain` if the recipient list is empty
    /// or repeats an id.
    pub fn classify(whisper: &Whisper) -> Result<Self, DomainError> {
        let last = validate_chain(&whisper.recipients)?;

        if whisper.is_from_initiator() {
            Ok(Self::Initiating)
        } else if whisper.sent_from_id == last.id {
            Ok(Self::Terminal)
        } else {
            Ok(Self::Relaying)
        }
    }

    /// Returns the snake-case name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initiating => "initiating",
            Self::Relaying => "relaying",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for HopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks the chain is non-empty with unique ids and returns its last member.
fn validate_chain(recipients: &[Recipient]) -> Result<&Recipient, DomainError> {
    let last = recipients
        .last()
        .ok_or_else(|| DomainError::MalformedChain("recipient chain is empty".to_owned()))?;

    let mut seen = HashSet::with_capacity(recipients.len());
    if let Some(duplicate) = recipients.iter().find(|r| !seen.insert(r.id)) {
        return Err(DomainError::MalformedChain(format!(
            "recipient id {} appears more than once",
            duplicate.id
        )));
    }

    Ok(last)
}

/// Finds the recipient whose id is `id`.
///
/// # Errors
///
/// Returns `DomainError::UnresolvedRecipient` if no recipient has that id.
pub fn resolve_recipient(recipients: &[Recipient], id: i64) -> Result<&Recipient, DomainError> {
    recipients
        .iter()
        .find(|r| r.id == id)
        .ok_or(DomainError::UnresolvedRecipient(id))
}

/// Computes the target after `current`: the first recipient when `current`
/// is the last one, otherwise `current + 1`.
///
/// # Errors
///
/// Returns `DomainError::MalformedChain` for an empty chain and
/// `DomainError::UnresolvedRecipient` if the computed id is not in the chain.
pub fn advance(recipients: &[Recipient], current: i64) -> Result<i64, DomainError> {
    let (Some(first), Some(last)) = (recipients.first(), recipients.last()) else {
        return Err(DomainError::MalformedChain(
            "recipient chain is empty".to_owned(),
        ));
    };

    let next = if current == last.id {
        first.id
    } else {
        current
            .checked_add(1)
            .ok_or(DomainError::UnresolvedRecipient(current))?
    };

    resolve_recipient(recipients, next)?;
    Ok(next)
}

/// Where a non-terminal hop forwards the whisper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The forwarding hop's own position, stamped as the new `sentFromId`.
    pub sent_from_id: i64,
    /// The new `nextRecipientId`.
    pub next_recipient_id: i64,
    /// The recipient the whisper is posted to.
    pub recipient: Recipient,
}

impl Route {
    /// Plans the outbound hop. Returns `None` for a terminal hop.
    ///
    /// An initiating whisper is processed by the chain head, so its current
    /// target is normalised to the first recipient whatever the initiator
    /// put in `nextRecipientId`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnresolvedRecipient` if the current or the next
    /// target is not part of the chain.
    pub fn plan(whisper: &Whisper, kind: HopKind) -> Result<Option<Self>, DomainError> {
        let current = match kind {
            HopKind::Terminal => return Ok(None),
            HopKind::Initiating => {
                validate_chain(&whisper.recipients)?;
                whisper.recipients[0].id
            }
            HopKind::Relaying => {
                resolve_recipient(&whisper.recipients, whisper.next_recipient_id)?.id
            }
        };

        let next = advance(&whisper.recipients, current)?;
        let recipient = resolve_recipient(&whisper.recipients, next)?.clone();

        Ok(Some(Self {
            sent_from_id: current,
            next_recipient_id: next,
            recipient,
        }))
    }

    /// Stamps the route's positions onto the outgoing whisper.
    pub fn apply(&self, whisper: &mut Whisper) {
        whisper.sent_from_id = self.sent_from_id;
        whisper.next_recipient_id = self.next_recipient_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapevine_core::whisper::INITIATOR_ID;

    fn chain(ids: &[i64]) -> Vec<Recipient> {
        ids.iter()
            .map(|id| Recipient::new(*id, format!("http://player-{id}")))
            .collect()
    }

    fn whisper(recipients: Vec<Recipient>, sent_from_id: i64, next_recipient_id: i64) -> Whisper {
        Whisper {
            game_id: 1,
            message: "Because I said so".to_owned(),
            sent_from_id,
            recipients,
            next_recipient_id,
        }
    }

    #[test]
    fn test_initiator_whisper_is_initiating() {
        let w = whisper(chain(&[0, 1, 2]), INITIATOR_ID, 0);

        assert_eq!(HopKind::classify(&w).unwrap(), HopKind::Initiating);
    }

    #[test]
    fn test_whisper_from_last_recipient_is_terminal() {
        let w = whisper(chain(&[0, 1, 2]), 2, 0);

        assert_eq!(HopKind::classify(&w).unwrap(), HopKind::Terminal);
    }

    #[test]
    fn test_whisper_from_intermediate_recipient_is_relaying() {
        let w = whisper(chain(&[0, 1, 2]), 0, 1);

        assert_eq!(HopKind::classify(&w).unwrap(), HopKind::Relaying);
    }

    #[test]
    fn test_terminal_compares_against_last_id_not_length() {
        let w = whisper(chain(&[10, 20, 30]), 30, 10);

        assert_eq!(HopKind::classify(&w).unwrap(), HopKind::Terminal);
    }

    #[test]
    fn test_empty_chain_is_malformed() {
        let w = whisper(Vec::new(), INITIATOR_ID, 0);

        let err = HopKind::classify(&w).unwrap_err();
        assert!(matches!(err, DomainError::MalformedChain(_)));
    }

    #[test]
    fn test_duplicate_ids_are_malformed() {
        let w = whisper(chain(&[0, 1, 1]), 0, 1);

        let err = HopKind::classify(&w).unwrap_err();
        assert!(matches!(err, DomainError::MalformedChain(_)));
    }

    #[test]
    fn test_advance_increments_by_one() {
        assert_eq!(advance(&chain(&[0, 1, 2]), 0).unwrap(), 1);
        assert_eq!(advance(&chain(&[0, 1, 2]), 1).unwrap(), 2);
    }

    #[test]
    fn test_advance_wraps_from_last_recipient_to_first() {
        assert_eq!(advance(&chain(&[0, 1, 2]), 2).unwrap(), 0);
    }

    #[test]
    fn test_advance_rejects_gap_in_ids() {
        let err = advance(&chain(&[0, 2]), 0).unwrap_err();

        assert!(matches!(err, DomainError::UnresolvedRecipient(1)));
    }

    #[test]
    fn test_resolve_recipient_looks_up_by_id_not_index() {
        let recipients = vec![Recipient::new(1, "http://b"), Recipient::new(0, "http://a")];

        assert_eq!(resolve_recipient(&recipients, 0).unwrap().url, "http://a");
    }

    #[test]
    fn test_initiating_route_starts_from_chain_head() {
        // The initiator's own nextRecipientId is ignored.
        let w = whisper(chain(&[0, 1, 2]), INITIATOR_ID, 7);

        let route = Route::plan(&w, HopKind::Initiating).unwrap().unwrap();

        assert_eq!(route.sent_from_id, 0);
        assert_eq!(route.next_recipient_id, 1);
        assert_eq!(route.recipient.url, "http://player-1");
    }

    #[test]
    fn test_relaying_route_from_last_target_wraps_to_first() {
        let w = whisper(chain(&[0, 1, 2]), 1, 2);

        let route = Route::plan(&w, HopKind::Relaying).unwrap().unwrap();

        assert_eq!(route.sent_from_id, 2);
        assert_eq!(route.next_recipient_id, 0);
        assert_eq!(route.recipient.url, "http://player-0");
    }

    #[test]
    fn test_relaying_route_with_unknown_target_is_unresolved() {
        let w = whisper(chain(&[0, 1, 2]), 0, 9);

        let err = Route::plan(&w, HopKind::Relaying).unwrap_err();

        assert!(matches!(err, DomainError::UnresolvedRecipient(9)));
    }

    #[test]
    fn test_terminal_hop_has_no_route() {
        let w = whisper(chain(&[0, 1]), 1, 0);

        assert!(Route::plan(&w, HopKind::Terminal).unwrap().is_none());
    }

    #[test]
    fn test_route_apply_stamps_positions() {
        let mut w = whisper(chain(&[0, 1]), INITIATOR_ID, 0);
        let route = Route::plan(&w, HopKind::Initiating).unwrap().unwrap();

        route.apply(&mut w);

        assert_eq!(w.sent_from_id, 0);
        assert_eq!(w.next_recipient_id, 1);
    }

    #[test]
    fn test_full_chain_visits_every_player_then_terminates_at_head() {
        let mut w = whisper(chain(&[0, 1, 2, 3]), INITIATOR_ID, 0);
        let mut visited = vec![0];

        loop {
            let kind = HopKind::classify(&w).unwrap();
            let Some(route) = Route::plan(&w, kind).unwrap() else {
                break;
            };
            route.apply(&mut w);
            visited.push(route.recipient.id);
            assert!(visited.len() <= 5, "relay did not terminate");
        }

        // Head starts, 1..3 relay, the last player wraps back to the head,
        // which sees sentFromId == 3 and finalizes.
        assert_eq!(visited, vec![0, 1, 2, 3, 0]);
        assert_eq!(w.sent_from_id, 3);
    }

    #[test]
    fn test_single_recipient_chain_loops_once_then_terminates() {
        let mut w = whisper(chain(&[0]), INITIATOR_ID, 0);

        let kind = HopKind::classify(&w).unwrap();
        let route = Route::plan(&w, kind).unwrap().unwrap();
        route.apply(&mut w);

        assert_eq!(route.recipient.id, 0);
        assert_eq!(HopKind::classify(&w).unwrap(), HopKind::Terminal);
    }
}
