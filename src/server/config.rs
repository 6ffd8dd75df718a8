use crate::server::error::{config::ConfigError, AppError};

pub const DISCORD_AUTH_URL: &str = "https://discord.com/api/oauth2/authorize";
pub const DISCORD_TOKEN_URL: &str = "https://discord.com/api/v10/oauth2/token";
pub const DISCORD_API_URL: &str = "https://discord.com/api/v10";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

pub struct Config {
    pub database_url: String,
    pub listen_addr: String,

    pub discord_client_id: String,
    pub discord_client_secret: String,
    pub discord_redirect_uri: String,

    pub discord_auth_url: String,
    pub discord_token_url: String,
    pub discord_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required_var("DATABASE_URL")?,
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string()),
            discord_client_id: required_var("DISCORD_CLIENT_ID")?,
            discord_client_secret: required_var("DISCORD_CLIENT_SECRET")?,
            discord_redirect_uri: required_var("DISCORD_REDIRECT_URI")?,
            discord_auth_url: DISCORD_AUTH_URL.to_string(),
            discord_token_url: DISCORD_TOKEN_URL.to_string(),
            discord_api_url: DISCORD_API_URL.to_string(),
        })
    }

    /// Configuration pointing the token and API endpoints at a local Discord stub.
    #[cfg(test)]
    pub(crate) fn for_discord_stub(token_url: String, api_url: String) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            discord_client_id: "1100000000000000000".to_string(),
            discord_client_secret: "client-secret".to_string(),
            discord_redirect_uri: "https://linked-roles.example/api/auth-callback".to_string(),
            discord_auth_url: DISCORD_AUTH_URL.to_string(),
            discord_token_url: token_url,
            discord_api_url: api_url,
        }
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}
