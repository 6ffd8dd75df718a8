use oauth2::{AuthorizationCode, CsrfToken, Scope};
use sea_orm::DatabaseConnection;
use url::Url;

use crate::server::{
    data::discord_token::DiscordTokenRepository,
    error::{auth::AuthError, AppError},
    model::{
        authorization::{CurrentAuthorization, DiscordUser},
        token::{StoredToken, TokenPair, UpsertTokenParam},
    },
    state::OAuth2Client,
};

/// Scopes requested on the consent screen.
///
/// `role_connections.write` lets the application publish linked role metadata for the user.
pub const DISCORD_SCOPES: [&str; 3] = ["guilds", "role_connections.write", "identify"];

/// A Discord user who completed the login flow, with their freshly stored tokens.
#[derive(Debug, Clone)]
pub struct LinkedUser {
    pub user: DiscordUser,
    pub token: StoredToken,
}

/// Service for the Discord OAuth2 authorization code flow.
///
/// Builds consent URLs, exchanges authorization codes for tokens, reads the identity the
/// tokens belong to, and stores the token pair for later use.
pub struct DiscordAuthService<'a> {
    /// Database connection for the token store.
    pub db: &'a DatabaseConnection,
    /// HTTP client for Discord API requests.
    pub http_client: &'a reqwest::Client,
    /// OAuth2 client for Discord authentication flow.
    pub oauth_client: &'a OAuth2Client,
    /// Base URL of the Discord REST API.
    pub api_url: &'a str,
}

impl<'a> DiscordAuthService<'a> {
    /// Creates a new DiscordAuthService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `http_client` - Reference to the HTTP client for Discord API requests
    /// - `oauth_client` - Reference to the configured OAuth2 client
    /// - `api_url` - Base URL of the Discord REST API
    pub fn new(
        db: &'a DatabaseConnection,
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
        api_url: &'a str,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            api_url,
        }
    }

    /// Generates a Discord OAuth2 consent URL with CSRF protection.
    ///
    /// The URL carries the client ID, redirect URI, `response_type=code`, the requested
    /// scopes, `prompt=consent` and a new random state.
    ///
    /// # Returns
    /// - `(Url, CsrfToken)` - The authorization URL and the state it embeds
    pub fn login_url(&self) -> (Url, CsrfToken) {
        let (authorize_url, csrf_state) = self
            .oauth_client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(
                DISCORD_SCOPES
                    .iter()
                    .map(|scope| Scope::new(scope.to_string())),
            )
            // Show the consent screen even when the user authorized the app before
            .add_extra_param("prompt", "consent")
            .url();

        (authorize_url, csrf_state)
    }

    /// Completes the login after the state has been validated.
    ///
    /// Exchanges the authorization code for a token pair, fetches the user the tokens were
    /// issued to, and stores the pair under that user's Discord ID.
    ///
    /// # Arguments
    /// - `authorization_code` - OAuth2 authorization code from the Discord callback
    ///
    /// # Returns
    /// - `Ok(LinkedUser)` - The Discord user and their stored tokens
    /// - `Err(AppError::AuthErr(TokenExchange))` - Discord rejected the code
    /// - `Err(AppError::ReqwestErr)` - Fetching the user failed
    /// - `Err(AppError::AuthErr(MissingIdentifyScope))` - The user was not shared
    /// - `Err(AppError::DbErr)` - Storing the tokens failed
    pub async fn callback(&self, authorization_code: String) -> Result<LinkedUser, AppError> {
        let tokens = self.exchange_code(authorization_code).await?;

        let authorization = self
            .fetch_current_authorization(&tokens.access_token)
            .await?;
        let user = authorization.into_user()?;

        let token = DiscordTokenRepository::new(self.db)
            .upsert(UpsertTokenParam {
                discord_id: user.discord_id()?,
                tokens,
            })
            .await?;

        tracing::debug!("Stored Discord tokens for user {}", token.discord_id);

        Ok(LinkedUser { user, token })
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// Sends a form-encoded `authorization_code` grant with the client credentials and
    /// redirect URI to the token endpoint.
    async fn exchange_code(&self, authorization_code: String) -> Result<TokenPair, AppError> {
        let response = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(authorization_code))
            .request_async(self.http_client)
            .await
            .map_err(AuthError::TokenExchange)?;

        Ok(TokenPair::from_token_response(&response, None)?)
    }

    /// Retrieves the authorization info for an access token.
    ///
    /// Uses Discord's `GET /oauth2/@me` endpoint, which returns the granted scopes, the
    /// token's expiry and, with the `identify` scope, the user.
    ///
    /// # Arguments
    /// - `access_token` - Bearer token for the authenticated user
    ///
    /// # Returns
    /// - `Ok(CurrentAuthorization)` - Successfully retrieved authorization info
    /// - `Err(AppError::ReqwestErr)` - Request failed, returned an error status, or could
    ///   not be parsed
    pub async fn fetch_current_authorization(
        &self,
        access_token: &str,
    ) -> Result<CurrentAuthorization, AppError> {
        let authorization = self
            .http_client
            .get(format!("{}/oauth2/@me", self.api_url))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<CurrentAuthorization>()
            .await?;

        Ok(authorization)
    }
}
