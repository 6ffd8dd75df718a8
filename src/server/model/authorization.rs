//! Payloads returned by Discord's current authorization endpoint.

use serde::Deserialize;

use crate::server::{
    error::{auth::AuthError, AppError},
    util::parse::parse_discord_id,
};

/// Scope that makes `GET /oauth2/@me` include the user object.
pub const IDENTIFY_SCOPE: &str = "identify";

/// The subset of a Discord user object the service reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiscordUser {
    /// Snowflake ID, serialized by Discord as a string.
    pub id: String,
    pub username: String,
    /// Display name, unset for users who never picked one.
    #[serde(default)]
    pub global_name: Option<String>,
}

impl DiscordUser {
    /// Returns the user's ID as a number.
    ///
    /// # Returns
    /// - `Ok(u64)` - Parsed snowflake
    /// - `Err(AppError::InternalErr(ParseStringId))` - Discord returned a malformed ID
    pub fn discord_id(&self) -> Result<u64, AppError> {
        parse_discord_id(&self.id)
    }

    /// Name shown to other users, falling back to the unique username.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// Response of `GET /oauth2/@me`.
///
/// Describes the authorization the access token represents. Discord only includes `user`
/// when the `identify` scope was granted.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentAuthorization {
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub user: Option<DiscordUser>,
}

impl CurrentAuthorization {
    /// Returns the user the token was issued to.
    ///
    /// # Returns
    /// - `Ok(DiscordUser)` - The `identify` scope was granted and the user is present
    /// - `Err(AuthError::MissingIdentifyScope)` - The user declined `identify` or Discord
    ///   left the user out
    pub fn into_user(self) -> Result<DiscordUser, AuthError> {
        if !self.scopes.iter().any(|scope| scope == IDENTIFY_SCOPE) {
            return Err(AuthError::MissingIdentifyScope);
        }

        self.user.ok_or(AuthError::MissingIdentifyScope)
    }
}
