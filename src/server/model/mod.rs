//! Domain models and Discord API payloads.

pub mod authorization;
pub mod token;
