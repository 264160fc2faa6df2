//! Grapevine HTTP clients.
//!
//! Implementations of the outbound collaborator traits from
//! `grapevine-core` on top of `reqwest`.

pub mod datamuse;
pub mod whisper_sender;

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("grapevine/", env!("CARGO_PKG_VERSION"));
