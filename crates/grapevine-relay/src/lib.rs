//! Grapevine: whisper relay bounded context.
//!
//! Responsible for classifying each inbound whisper as the initiating,
//! a relaying or the terminal hop of its chain, mutating the message by
//! rhyme substitution, forwarding it to the next recipient, and archiving
//! the finished game.

pub mod application;
pub mod domain;
