//! Factory for creating stored Discord token records.
//!
//! Tokens default to a record that is still valid for an hour. Use `expired()` to
//! produce one that forces the refresh path.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Source of unique default Discord IDs so factories never collide on the primary key.
static NEXT_DISCORD_ID: AtomicU64 = AtomicU64::new(1);

/// Factory for creating test token records with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::discord_token::DiscordTokenFactory;
///
/// let token = DiscordTokenFactory::new(&db)
///     .discord_id("123456789")
///     .expired()
///     .build()
///     .await?;
/// ```
pub struct DiscordTokenFactory<'a> {
    db: &'a DatabaseConnection,
    discord_id: String,
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl<'a> DiscordTokenFactory<'a> {
    /// Creates a new DiscordTokenFactory with default values.
    ///
    /// Defaults:
    /// - discord_id: auto-incremented counter value
    /// - access_token: `"access_{id}"`
    /// - refresh_token: `"refresh_{id}"`
    /// - expires_at: one hour from now
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = NEXT_DISCORD_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            db,
            discord_id: id.to_string(),
            access_token: format!("access_{}", id),
            refresh_token: format!("refresh_{}", id),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    /// Sets the Discord user ID owning the token.
    pub fn discord_id(mut self, discord_id: impl Into<String>) -> Self {
        self.discord_id = discord_id.into();
        self
    }

    /// Sets the access token value.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = access_token.into();
        self
    }

    /// Sets the refresh token value.
    pub fn refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = refresh_token.into();
        self
    }

    /// Sets the expiry timestamp.
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Marks the token as having expired an hour ago.
    pub fn expired(self) -> Self {
        self.expires_at(Utc::now() - Duration::hours(1))
    }

    /// Builds and inserts the token record into the database.
    ///
    /// # Returns
    /// - `Ok(entity::discord_token::Model)` - Created token record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::discord_token::Model, DbErr> {
        entity::discord_token::ActiveModel {
            discord_id: ActiveValue::Set(self.discord_id),
            access_token: ActiveValue::Set(self.access_token),
            refresh_token: ActiveValue::Set(self.refresh_token),
            expires_at: ActiveValue::Set(self.expires_at),
            updated_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a valid token record with default values.
///
/// Shorthand for `DiscordTokenFactory::new(db).build().await`.
pub async fn create_token(db: &DatabaseConnection) -> Result<entity::discord_token::Model, DbErr> {
    DiscordTokenFactory::new(db).build().await
}
