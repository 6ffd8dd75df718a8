//! Discord linked roles OAuth2 service.
//!
//! Sends users through Discord's consent screen, completes the authorization code
//! exchange on the callback, and keeps the resulting token pairs usable by refreshing
//! them once they expire.

pub mod server;
