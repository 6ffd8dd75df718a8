use crate::server::{
    data::discord_token::DiscordTokenRepository,
    error::AppError,
    model::token::{TokenPair, UpsertTokenParam},
};
use chrono::{Duration, Utc};
use test_utils::{
    builder::TestBuilder,
    factory::discord_token::{create_token, DiscordTokenFactory},
};

mod find_by_discord_id;
mod upsert;
