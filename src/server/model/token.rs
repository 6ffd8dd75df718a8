//! OAuth2 token domain models.
//!
//! `TokenPair` is what a token grant yields, `StoredToken` is a pair persisted for a
//! specific Discord user. Expiry is stored as an absolute timestamp computed from the
//! grant's `expires_in` at the moment the response is received.

use chrono::{DateTime, Duration, Utc};
use oauth2::{basic::BasicTokenResponse, TokenResponse};

use crate::server::{
    error::{auth::AuthError, AppError},
    util::parse::parse_discord_id,
};

/// Access token lifetime Discord documents, used when a response omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 604_800;

/// Access and refresh token issued together by a single grant.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Moment after which the access token must be refreshed.
    pub expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Builds a token pair from a token endpoint response.
    ///
    /// Refresh grants may omit the refresh token, in which case the previous one stays valid
    /// and is carried over.
    ///
    /// # Arguments
    /// - `response` - Parsed token endpoint response
    /// - `previous_refresh_token` - Refresh token to keep if the response has none
    ///
    /// # Returns
    /// - `Ok(TokenPair)` - Token pair with absolute expiry
    /// - `Err(AuthError::MissingRefreshToken)` - No refresh token in the response or fallback
    pub fn from_token_response(
        response: &BasicTokenResponse,
        previous_refresh_token: Option<&str>,
    ) -> Result<Self, AuthError> {
        let refresh_token = response
            .refresh_token()
            .map(|token| token.secret().clone())
            .or_else(|| previous_refresh_token.map(str::to_string))
            .ok_or(AuthError::MissingRefreshToken)?;

        Ok(Self {
            access_token: response.access_token().secret().clone(),
            refresh_token,
            expires_at: expiry_after(Utc::now(), response.expires_in()),
        })
    }

    /// Whether the access token's expiry is in the past.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

fn expiry_after(now: DateTime<Utc>, expires_in: Option<std::time::Duration>) -> DateTime<Utc> {
    let lifetime = expires_in
        .and_then(|lifetime| Duration::from_std(lifetime).ok())
        .unwrap_or_else(|| Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));

    now.checked_add_signed(lifetime)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Token pair persisted for a Discord user.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredToken {
    /// Discord ID of the user the tokens belong to.
    pub discord_id: u64,
    pub tokens: TokenPair,
}

impl StoredToken {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(StoredToken)` - The converted token record
    /// - `Err(AppError::InternalErr(ParseStringId))` - Stored Discord ID is not a `u64`
    pub fn from_entity(entity: entity::discord_token::Model) -> Result<Self, AppError> {
        Ok(Self {
            discord_id: parse_discord_id(&entity.discord_id)?,
            tokens: TokenPair {
                access_token: entity.access_token,
                refresh_token: entity.refresh_token,
                expires_at: entity.expires_at,
            },
        })
    }

    pub fn is_expired(&self) -> bool {
        self.tokens.is_expired()
    }
}

/// Parameters for storing the token pair of a user.
#[derive(Debug, Clone)]
pub struct UpsertTokenParam {
    pub discord_id: u64,
    pub tokens: TokenPair,
}
