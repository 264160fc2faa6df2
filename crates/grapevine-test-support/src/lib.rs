//! Shared test mocks and utilities for the Grapevine whisper relay.

mod clock;
mod delivery;
mod rhyme;
mod rng;
mod store;

pub use clock::FixedClock;
pub use delivery::{FailingWhisperSender, RecordingWhisperSender};
pub use rhyme::{NoRhymeLookup, PendingRhymeLookup, StaticRhymeLookup};
pub use rng::{MockRng, SequenceRng};
pub use store::FailingBlobStore;
