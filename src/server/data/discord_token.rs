//! Token data repository for database operations.
//!
//! Token pairs are keyed by the Discord ID of their owner, so storing a new pair for a
//! user replaces the previous one.

use chrono::Utc;
use migration::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::server::{
    error::AppError,
    model::token::{StoredToken, UpsertTokenParam},
};

/// Repository providing database operations for stored Discord tokens.
pub struct DiscordTokenRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DiscordTokenRepository<'a> {
    /// Creates a new DiscordTokenRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts the user's token pair or replaces the existing one.
    ///
    /// # Arguments
    /// - `param` - Discord ID and the token pair to store
    ///
    /// # Returns
    /// - `Ok(StoredToken)` - The stored token record
    /// - `Err(AppError::DbErr)` - Database error during insert or update
    pub async fn upsert(&self, param: UpsertTokenParam) -> Result<StoredToken, AppError> {
        let entity = entity::prelude::DiscordToken::insert(entity::discord_token::ActiveModel {
            discord_id: ActiveValue::Set(param.discord_id.to_string()),
            access_token: ActiveValue::Set(param.tokens.access_token),
            refresh_token: ActiveValue::Set(param.tokens.refresh_token),
            expires_at: ActiveValue::Set(param.tokens.expires_at),
            updated_at: ActiveValue::Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(entity::discord_token::Column::DiscordId)
                .update_columns([
                    entity::discord_token::Column::AccessToken,
                    entity::discord_token::Column::RefreshToken,
                    entity::discord_token::Column::ExpiresAt,
                    entity::discord_token::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        StoredToken::from_entity(entity)
    }

    /// Finds the token pair stored for a Discord user.
    ///
    /// # Returns
    /// - `Ok(Some(StoredToken))` - Token record found
    /// - `Ok(None)` - No tokens stored for that user
    /// - `Err(AppError::DbErr)` - Database error during query
    pub async fn find_by_discord_id(&self, discord_id: u64) -> Result<Option<StoredToken>, AppError> {
        let entity = entity::prelude::DiscordToken::find_by_id(discord_id.to_string())
            .one(self.db)
            .await?;

        entity.map(StoredToken::from_entity).transpose()
    }
}
