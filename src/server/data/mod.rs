//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and return domain models to keep
//! the data layer separate from the service layer.

pub mod discord_token;

#[cfg(test)]
mod test;
