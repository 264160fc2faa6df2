//! Route modules.

pub mod grapevine;
pub mod health;
