//! Application state shared across all request handlers.
//!
//! The state is initialized once during startup and then cloned for each request handler
//! through Axum's state extraction. It holds:
//! - Database connection pool for token persistence
//! - HTTP client for Discord API requests
//! - OAuth2 client configured with Discord's endpoints and app credentials
//! - Base URL of the Discord API

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};
use sea_orm::DatabaseConnection;

/// Type alias for the OAuth2 client configured for Discord authentication.
///
/// Authorization and token endpoints are set; device, introspection and revocation
/// endpoints are not used.
pub type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone:
/// - `DatabaseConnection` is a connection pool (clones share the pool)
/// - `reqwest::Client` uses an `Arc` internally
/// - `OAuth2Client` holds only URLs and credentials
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for the token store.
    pub db: DatabaseConnection,

    /// HTTP client for token grants and Discord API requests.
    ///
    /// Configured not to follow redirects, as recommended for OAuth2 token requests.
    pub http_client: reqwest::Client,

    /// OAuth2 client for the Discord authorization code and refresh token grants.
    pub oauth_client: OAuth2Client,

    /// Base URL of the Discord REST API, e.g. `https://discord.com/api/v10`.
    pub discord_api_url: String,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `http_client` - HTTP client for outbound requests
    /// - `oauth_client` - OAuth2 client for Discord
    /// - `discord_api_url` - Base URL of the Discord REST API
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        oauth_client: OAuth2Client,
        discord_api_url: String,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            discord_api_url,
        }
    }

    /// State wired to a test database and a local Discord stub.
    #[cfg(test)]
    pub(crate) fn for_discord_stub(
        db: DatabaseConnection,
        stub: &test_utils::discord::DiscordStub,
    ) -> Self {
        use crate::server::{config::Config, startup};

        let config = Config::for_discord_stub(stub.token_url(), stub.api_url());

        Self::new(
            db,
            startup::setup_reqwest_client().unwrap(),
            startup::setup_oauth_client(&config).unwrap(),
            config.discord_api_url,
        )
    }
}
