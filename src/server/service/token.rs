//! Access token refresh.
//!
//! Discord access tokens expire after a week. Callers that act on behalf of a user ask
//! this service for an access token instead of reading the stored one directly, so an
//! expired token is swapped for a fresh one through the refresh token grant.

use oauth2::RefreshToken;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::discord_token::DiscordTokenRepository,
    error::{auth::AuthError, AppError},
    model::token::{StoredToken, TokenPair, UpsertTokenParam},
    state::OAuth2Client,
};

pub struct TokenService<'a> {
    db: &'a DatabaseConnection,
    http_client: &'a reqwest::Client,
    oauth_client: &'a OAuth2Client,
}

impl<'a> TokenService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
        }
    }

    /// Returns a usable access token for a stored token record.
    ///
    /// If the record has not expired its access token is returned as is, without any
    /// request to Discord. Otherwise a `refresh_token` grant is sent to the token endpoint
    /// and the refreshed pair replaces the stored one.
    ///
    /// # Arguments
    /// - `stored` - Token record previously saved for the user
    ///
    /// # Returns
    /// - `Ok(String)` - Current access token
    /// - `Err(AppError::AuthErr(TokenRefresh))` - Discord rejected the refresh token
    /// - `Err(AppError::DbErr)` - Storing the refreshed pair failed
    pub async fn access_token(&self, stored: &StoredToken) -> Result<String, AppError> {
        if !stored.is_expired() {
            return Ok(stored.tokens.access_token.clone());
        }

        tracing::debug!(
            "Access token for user {} expired at {}, refreshing",
            stored.discord_id,
            stored.tokens.expires_at
        );

        let refresh_token = RefreshToken::new(stored.tokens.refresh_token.clone());
        let response = self
            .oauth_client
            .exchange_refresh_token(&refresh_token)
            .request_async(self.http_client)
            .await
            .map_err(AuthError::TokenRefresh)?;

        let tokens = TokenPair::from_token_response(&response, Some(&stored.tokens.refresh_token))?;
        let refreshed = DiscordTokenRepository::new(self.db)
            .upsert(UpsertTokenParam {
                discord_id: stored.discord_id,
                tokens,
            })
            .await?;

        Ok(refreshed.tokens.access_token)
    }

    /// Returns a usable access token for a Discord user.
    ///
    /// # Returns
    /// - `Ok(String)` - Current access token, refreshed if needed
    /// - `Err(AppError::NotFound)` - The user never completed the login flow
    pub async fn access_token_for_user(&self, discord_id: u64) -> Result<String, AppError> {
        let stored = DiscordTokenRepository::new(self.db)
            .find_by_discord_id(discord_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No Discord tokens stored for user {}", discord_id))
            })?;

        self.access_token(&stored).await
    }
}
