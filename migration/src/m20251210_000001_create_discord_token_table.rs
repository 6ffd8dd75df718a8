use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DiscordToken::Table)
                    .if_not_exists()
                    .col(string(DiscordToken::DiscordId).primary_key())
                    .col(string(DiscordToken::AccessToken))
                    .col(string(DiscordToken::RefreshToken))
                    .col(timestamp_with_time_zone(DiscordToken::ExpiresAt))
                    .col(timestamp_with_time_zone(DiscordToken::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiscordToken::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum DiscordToken {
    Table,
    DiscordId,
    AccessToken,
    RefreshToken,
    ExpiresAt,
    UpdatedAt,
}
