//! Grapevine Core: shared abstractions.
//!
//! This crate defines the traits and wire types that every other Grapevine
//! crate depends on: time, randomness, blob storage, the rhyme dictionary,
//! outbound whisper delivery, and the `Whisper` / `GameRecord` payloads.
//! It contains no infrastructure code.

pub mod clock;
pub mod delivery;
pub mod error;
pub mod rhyme;
pub mod rng;
pub mod store;
pub mod whisper;
