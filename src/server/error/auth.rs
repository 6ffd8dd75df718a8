use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use oauth2::{basic::BasicErrorResponse, HttpClientError, RequestTokenError};
use thiserror::Error;

use crate::server::error::InternalServerError;

/// Error returned by the `oauth2` crate when a token request fails.
pub type OAuth2RequestError = RequestTokenError<HttpClientError<reqwest::Error>, BasicErrorResponse>;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The callback arrived without a `clientState` cookie.
    ///
    /// Either the browser never visited the login route or the cookie expired after
    /// five minutes. Results in a 401 Unauthorized response.
    #[error("No state cookie.")]
    MissingStateCookie,

    /// The `state` query parameter does not match the `clientState` cookie.
    ///
    /// Indicates a forged or replayed callback. A missing query `state` counts as a
    /// mismatch. Results in a 403 Forbidden response.
    #[error("State verification failed.")]
    StateMismatch,

    /// The callback passed state validation but carried no authorization code.
    #[error("Authorization callback is missing the code parameter")]
    MissingCode,

    /// Discord rejected the authorization code exchange.
    #[error("Error fetching OAuth tokens: {0}")]
    TokenExchange(#[source] OAuth2RequestError),

    /// Discord rejected the refresh token grant.
    #[error("Error refreshing access token: {0}")]
    TokenRefresh(#[source] OAuth2RequestError),

    /// The authorization info for a fresh token lacks the `identify` scope or the user.
    #[error("Discord authorization did not grant the identify scope")]
    MissingIdentifyScope,

    /// A token response carried no refresh token and there was none to fall back on.
    #[error("Token response from Discord did not include a refresh token")]
    MissingRefreshToken,
}

/// Converts authentication errors into HTTP responses.
///
/// # Returns
/// - 401 Unauthorized - No state cookie
/// - 403 Forbidden - State mismatch
/// - 500 Internal Server Error - Upstream OAuth2 failures, logged with full details
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingStateCookie => {
                tracing::error!("{}", self);
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            Self::StateMismatch => {
                tracing::error!("{}", self);
                (StatusCode::FORBIDDEN, self.to_string()).into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}
