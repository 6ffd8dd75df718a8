use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::server::{
    error::{auth::AuthError, AppError},
    service::auth::DiscordAuthService,
    state::AppState,
};

/// Cookie holding the state value of an in-flight login
pub const STATE_COOKIE: &str = "clientState";

/// Lifetime of the state cookie, after which the login has to be restarted.
const STATE_COOKIE_MAX_AGE: time::Duration = time::Duration::minutes(5);

pub const CALLBACK_SUCCESS_MESSAGE: &str = "Success! You can now go back to Discord.";

/// Query parameters for the OAuth callback endpoint.
///
/// Both are optional so that a callback without a state cookie is rejected as
/// unauthenticated regardless of what the query holds.
#[derive(Default, Deserialize)]
pub struct CallbackParams {
    /// CSRF state token to be validated against the cookie value.
    pub state: Option<String>,
    /// Authorization code from Discord for token exchange.
    pub code: Option<String>,
}

/// Starts the flow by sending the browser to Discord's consent screen.
///
/// The state embedded in the consent URL is kept in the `clientState` cookie so the
/// callback can verify it. See
/// https://discord.com/developers/docs/topics/oauth2#state-and-security
pub async fn login(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let auth_service = DiscordAuthService::new(
        &state.db,
        &state.http_client,
        &state.oauth_client,
        &state.discord_api_url,
    );

    let (url, csrf_token) = auth_service.login_url();

    let state_cookie = Cookie::build((STATE_COOKIE, csrf_token.secret().clone()))
        .path("/")
        .max_age(STATE_COOKIE_MAX_AGE)
        .secure(true)
        .http_only(true)
        .same_site(SameSite::Lax);

    (
        StatusCode::FOUND,
        jar.add(state_cookie),
        [(header::LOCATION, url.to_string())],
    )
}

/// Redirect target configured in the Discord developer portal.
///
/// Verifies the state, then exchanges the code for tokens, fetches the user and stores
/// their tokens. The state cookie is discarded whenever one is present so the same state
/// can never be used twice.
///
/// A query string that cannot be parsed, such as one repeating `state`, carries no usable
/// state and fails verification once the cookie is known to be present.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> Response {
    let Some(client_state) = jar.get(STATE_COOKIE).map(|cookie| cookie.value().to_string())
    else {
        return AppError::from(AuthError::MissingStateCookie).into_response();
    };

    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/"));
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!("Unparseable callback query: {}", rejection);
            CallbackParams::default()
        }
    };
    let result = complete_login(&state, &client_state, params).await;

    (jar, result).into_response()
}

async fn complete_login(
    state: &AppState,
    client_state: &str,
    params: CallbackParams,
) -> Result<&'static str, AppError> {
    validate_state(client_state, params.state.as_deref())?;

    let code = params.code.ok_or(AuthError::MissingCode)?;

    let auth_service = DiscordAuthService::new(
        &state.db,
        &state.http_client,
        &state.oauth_client,
        &state.discord_api_url,
    );
    let linked = auth_service.callback(code).await?;

    tracing::info!(
        "Linked Discord user {} ({})",
        linked.user.display_name(),
        linked.token.discord_id
    );

    Ok(CALLBACK_SUCCESS_MESSAGE)
}

fn validate_state(client_state: &str, discord_state: Option<&str>) -> Result<(), AuthError> {
    match discord_state {
        Some(discord_state) if discord_state == client_state => Ok(()),
        _ => Err(AuthError::StateMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{
        config::DISCORD_AUTH_URL, data::discord_token::DiscordTokenRepository,
        error::INTERNAL_SERVER_ERROR_BODY, router::router,
    };
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use test_utils::{builder::TestBuilder, discord::DiscordStub};
    use tower::ServiceExt;
    use url::Url;

    async fn stub_state() -> (AppState, DiscordStub) {
        let test = TestBuilder::new().with_token_tables().build().await.unwrap();
        let stub = DiscordStub::start().await;
        let state = AppState::for_discord_stub(test.db.unwrap(), &stub);

        (state, stub)
    }

    async fn send(state: &AppState, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        router()
            .with_state(state.clone())
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn set_cookie(response: &Response) -> Cookie<'static> {
        let header = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("response sets a cookie")
            .to_str()
            .unwrap()
            .to_string();

        Cookie::parse(header).unwrap()
    }

    /// Tests the login redirect.
    ///
    /// Expected: 302 to Discord's authorize endpoint, with the URL's state stored in a
    /// secure `clientState` cookie that lives five minutes
    #[tokio::test]
    async fn login_redirects_with_state_cookie() {
        let (state, _stub) = stub_state().await;

        let response = send(&state, "/api/auth", None).await;

        assert_eq!(response.status(), StatusCode::FOUND);

        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.starts_with(DISCORD_AUTH_URL));
        let url_state = Url::parse(location)
            .unwrap()
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .unwrap();

        let cookie = set_cookie(&response);
        assert_eq!(cookie.name(), STATE_COOKIE);
        assert_eq!(cookie.value(), url_state);
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(5)));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    /// Tests that every login gets its own state.
    ///
    /// Expected: two consecutive logins set different state cookies
    #[tokio::test]
    async fn login_issues_fresh_state_each_time() {
        let (state, _stub) = stub_state().await;

        let first = set_cookie(&send(&state, "/api/auth", None).await);
        let second = set_cookie(&send(&state, "/api/auth", None).await);

        assert_ne!(first.value(), second.value());
    }

    /// Tests a callback without the state cookie.
    ///
    /// Expected: 401 and no request to Discord, even with a code and state in the query
    #[tokio::test]
    async fn callback_without_state_cookie_is_unauthorized() {
        let (state, stub) = stub_state().await;

        let response = send(&state, "/api/auth-callback?code=abc&state=xyz", None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "No state cookie.");
        assert!(stub.server.received_requests().await.unwrap().is_empty());
    }

    /// Tests a callback without any query parameters or cookie.
    ///
    /// Expected: 401
    #[tokio::test]
    async fn callback_without_anything_is_unauthorized() {
        let (state, _stub) = stub_state().await;

        let response = send(&state, "/api/auth-callback", None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// Tests a callback whose state does not match the cookie.
    ///
    /// Expected: 403, the state cookie removed, and no request to Discord
    #[tokio::test]
    async fn callback_with_mismatched_state_is_forbidden() {
        let (state, stub) = stub_state().await;

        let response = send(
            &state,
            "/api/auth-callback?code=abc&state=forged",
            Some("clientState=issued"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(set_cookie(&response).value(), "");
        assert_eq!(body_text(response).await, "State verification failed.");
        assert!(stub.server.received_requests().await.unwrap().is_empty());
    }

    /// Tests a callback with a state cookie but no state in the query.
    ///
    /// Expected: 403
    #[tokio::test]
    async fn callback_without_query_state_is_forbidden() {
        let (state, _stub) = stub_state().await;

        let response = send(
            &state,
            "/api/auth-callback?code=abc",
            Some("clientState=issued"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    /// Tests a callback with a repeated query key and no state cookie.
    ///
    /// Expected: 401, since the cookie is checked before the query is looked at
    #[tokio::test]
    async fn callback_with_unparseable_query_and_no_cookie_is_unauthorized() {
        let (state, stub) = stub_state().await;

        let response = send(&state, "/api/auth-callback?state=a&state=b", None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "No state cookie.");
        assert!(stub.server.received_requests().await.unwrap().is_empty());
    }

    /// Tests a callback with a repeated query key and a state cookie.
    ///
    /// Expected: 403 with the state cookie removed, and no request to Discord
    #[tokio::test]
    async fn callback_with_unparseable_query_is_forbidden() {
        let (state, stub) = stub_state().await;

        let response = send(
            &state,
            "/api/auth-callback?code=a&code=b&state=issued",
            Some("clientState=issued"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(set_cookie(&response).value(), "");
        assert!(stub.server.received_requests().await.unwrap().is_empty());
    }

    /// Tests a complete, valid callback.
    ///
    /// Expected: 200 with the success message after one token exchange and one `@me`
    /// request, with the tokens stored for the user
    #[tokio::test]
    async fn callback_with_matching_state_links_user() -> Result<(), AppError> {
        let (state, stub) = stub_state().await;
        stub.mock_code_exchange("access-1", "refresh-1").await;
        stub.mock_current_authorization("access-1", "80351110224678912", "nelly", 1)
            .await;

        let response = send(
            &state,
            "/api/auth-callback?code=abc&state=issued",
            Some("clientState=issued"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(set_cookie(&response).name(), STATE_COOKIE);
        assert_eq!(body_text(response).await, CALLBACK_SUCCESS_MESSAGE);

        let stored = DiscordTokenRepository::new(&state.db)
            .find_by_discord_id(80351110224678912)
            .await?
            .unwrap();
        assert_eq!(stored.tokens.access_token, "access-1");

        Ok(())
    }

    /// Tests Discord rejecting the authorization code.
    ///
    /// Expected: 500 with a generic body, and no `@me` request
    #[tokio::test]
    async fn callback_with_rejected_code_is_internal_error() {
        let (state, stub) = stub_state().await;
        stub.mock_code_exchange_failure(400).await;
        stub.mock_current_authorization("access-1", "1", "nelly", 0)
            .await;

        let response = send(
            &state,
            "/api/auth-callback?code=expired&state=issued",
            Some("clientState=issued"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, INTERNAL_SERVER_ERROR_BODY);
    }

    /// Tests Discord failing the `@me` request after a successful exchange.
    ///
    /// Expected: 500 and nothing stored
    #[tokio::test]
    async fn callback_with_failed_profile_fetch_is_internal_error() -> Result<(), AppError> {
        let (state, stub) = stub_state().await;
        stub.mock_code_exchange("access-1", "refresh-1").await;

        let response = send(
            &state,
            "/api/auth-callback?code=abc&state=issued",
            Some("clientState=issued"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(DiscordTokenRepository::new(&state.db)
            .find_by_discord_id(80351110224678912)
            .await?
            .is_none());

        Ok(())
    }

    /// Tests a callback that passes state validation but has no code.
    ///
    /// Expected: 500 without contacting Discord
    #[tokio::test]
    async fn callback_without_code_is_internal_error() {
        let (state, stub) = stub_state().await;

        let response = send(
            &state,
            "/api/auth-callback?state=issued",
            Some("clientState=issued"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(stub.server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn validate_state_requires_exact_match() {
        assert!(validate_state("abc", Some("abc")).is_ok());
        assert!(matches!(
            validate_state("abc", Some("abcd")),
            Err(AuthError::StateMismatch)
        ));
        assert!(matches!(
            validate_state("abc", None),
            Err(AuthError::StateMismatch)
        ));
    }
}
