//! HTTP backend for the Discord OAuth2 flow.
//!
//! The backend uses Axum as the web framework, the `oauth2` crate for the authorization
//! code and refresh token grants, and SeaORM for token persistence.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, cookie handling
//! - **Service Layer** (`service/`) - OAuth2 exchanges and Discord API calls
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and Discord API payloads
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (DB, HTTP clients)
//! - **Startup** (`startup`) - Initialization of tracing, database, and clients
//! - **Router** (`router`) - Axum route configuration
//!
//! # Request Flow
//!
//! 1. `GET /api/auth` stores a random state in the `clientState` cookie and redirects
//!    the browser to Discord's consent screen
//! 2. Discord redirects back to `GET /api/auth-callback` with `code` and `state`
//! 3. The controller checks the state against the cookie, then the service exchanges
//!    the code, fetches the user's authorization info, and stores the token pair

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
