//! Linked Roles Test Utils
//!
//! Provides shared testing utilities for the linked roles service. This crate offers a builder
//! pattern for creating test contexts with in-memory SQLite databases, factories for seeding
//! stored tokens, and a stub of the Discord OAuth2 API backed by `wiremock`.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **DiscordStub**: Local HTTP server answering Discord's token and `@me` endpoints
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::DiscordToken;
//!
//! #[tokio::test]
//! async fn test_token_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(DiscordToken)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod discord;
pub mod error;
pub mod factory;
