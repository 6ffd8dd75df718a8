//! SeaORM entities for the linked roles service.

pub mod prelude;

pub mod discord_token;
