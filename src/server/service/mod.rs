//! Service layer for OAuth2 orchestration.
//!
//! Services sit between the controllers and the data layer. They own the outbound
//! calls to Discord and decide what gets persisted.

pub mod auth;
pub mod token;
