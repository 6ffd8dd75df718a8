//! Stub of the Discord OAuth2 API for tests.
//!
//! Wraps a `wiremock::MockServer` answering the token endpoint and the current
//! authorization endpoint. Expectations registered with an explicit call count are
//! verified when the stub is dropped, so a test fails if the service skipped or repeated
//! an outbound request.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TOKEN_PATH: &str = "/oauth2/token";
pub const CURRENT_AUTHORIZATION_PATH: &str = "/oauth2/@me";

/// Builds the JSON body Discord returns from a successful token request.
pub fn token_response(access_token: &str, refresh_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in,
        "refresh_token": refresh_token,
        "scope": "guilds role_connections.write identify",
    })
}

/// Builds the JSON body Discord returns from `GET /oauth2/@me`.
pub fn current_authorization_response(user_id: &str, username: &str) -> Value {
    json!({
        "application": {
            "id": "1100000000000000000",
            "name": "Linked Roles",
        },
        "scopes": ["guilds", "role_connections.write", "identify"],
        "expires": "2026-10-26T12:00:00.000000+00:00",
        "user": {
            "id": user_id,
            "username": username,
            "global_name": null,
            "avatar": null,
            "discriminator": "0",
        },
    })
}

/// Local HTTP server standing in for `https://discord.com/api/v10`.
pub struct DiscordStub {
    pub server: MockServer,
}

impl DiscordStub {
    /// Starts a stub on a random local port with no routes mounted.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base API URL, the equivalent of `https://discord.com/api/v10`.
    pub fn api_url(&self) -> String {
        self.server.uri()
    }

    /// Full URL of the token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}{}", self.server.uri(), TOKEN_PATH)
    }

    /// Answers `grant_type` token requests with `response`, expecting exactly `calls` hits.
    pub async fn mock_token(&self, grant_type: &str, response: ResponseTemplate, calls: u64) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(body_string_contains(format!("grant_type={}", grant_type)))
            .respond_with(response)
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Answers one authorization code exchange with a fresh token pair.
    pub async fn mock_code_exchange(&self, access_token: &str, refresh_token: &str) {
        self.mock_token(
            "authorization_code",
            ResponseTemplate::new(200).set_body_json(token_response(
                access_token,
                refresh_token,
                604800,
            )),
            1,
        )
        .await;
    }

    /// Rejects authorization code exchanges with `status`.
    pub async fn mock_code_exchange_failure(&self, status: u16) {
        self.mock_token(
            "authorization_code",
            ResponseTemplate::new(status).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid \"code\" in request.",
            })),
            1,
        )
        .await;
    }

    /// Answers `GET /oauth2/@me` for `access_token`, expecting exactly `calls` hits.
    pub async fn mock_current_authorization(
        &self,
        access_token: &str,
        user_id: &str,
        username: &str,
        calls: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(CURRENT_AUTHORIZATION_PATH))
            .and(header("authorization", format!("Bearer {}", access_token)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(current_authorization_response(user_id, username)),
            )
            .expect(calls)
            .mount(&self.server)
            .await;
    }
}
