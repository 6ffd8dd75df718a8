//! Factories for seeding test data.

pub mod discord_token;
