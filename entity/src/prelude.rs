pub use super::discord_token::Entity as DiscordToken;
