//! Application layer: per-hop orchestration, game storage and read queries.

pub mod dispatcher;
pub mod game_store;
pub mod query_handlers;
