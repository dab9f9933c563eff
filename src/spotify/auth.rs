use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde_json::Value;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    config::SpotifySettings,
    error::AuthError,
    server::start_api_server,
    types::{PkceToken, Token},
    utils, warning,
};

/// How long the user has to grant access in the browser.
const AUTH_TIMEOUT_SECS: u64 = 120;

/// Runs the OAuth 2.0 PKCE flow and returns the obtained token.
///
/// 1. Generates the code verifier, its SHA256 challenge and a random `state`
/// 2. Binds the local callback server on `server_address`
/// 3. Opens the authorization URL in the default browser
/// 4. Waits for the callback handler to exchange the code for a token
///
/// The token is only kept in memory; nothing is written to disk.
pub async fn auth(settings: &SpotifySettings, server_address: &str) -> Result<Token, AuthError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(Some(PkceToken {
        code_verifier,
        state: state.clone(),
        token: None,
    })));

    let listener = TcpListener::bind(server_address)
        .await
        .map_err(|e| AuthError::Server(format!("cannot bind {server_address}: {e}")))?;

    let server_state = Arc::clone(&shared_state);
    let server_settings = Arc::new(settings.clone());
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(listener, server_state, server_settings).await {
            log::error!("callback server stopped: {e}");
        }
    });

    let auth_url = authorize_url(settings, &code_challenge, &state)?;
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state, Duration::from_secs(AUTH_TIMEOUT_SECS)).await;
    server.abort();

    token.ok_or(AuthError::TimedOut(AUTH_TIMEOUT_SECS))
}

/// Builds the Spotify authorize URL with all parameters URL-encoded.
pub fn authorize_url(
    settings: &SpotifySettings,
    code_challenge: &str,
    state: &str,
) -> Result<String, AuthError> {
    let url = Url::parse_with_params(
        &settings.auth_url,
        &[
            ("client_id", settings.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", settings.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| AuthError::Url(e.to_string()))?;

    Ok(url.to_string())
}

/// Polls the shared state once per second until the callback stored a token
/// or `max_wait` elapsed.
async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code plus the PKCE verifier for a token.
pub async fn exchange_code_pkce(
    settings: &SpotifySettings,
    code: &str,
    verifier: &str,
) -> Result<Token, AuthError> {
    let client = Client::builder().timeout(settings.timeout).build()?;
    let res = client
        .post(&settings.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", settings.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: Value = res.json().await?;
    parse_token_response(&json)
}

/// Reads a token endpoint response. `refresh_token` is optional because the
/// refresh grant may not rotate it.
pub fn parse_token_response(json: &Value) -> Result<Token, AuthError> {
    let access_token = json["access_token"]
        .as_str()
        .ok_or(AuthError::MissingField("access_token"))?;

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_u64().unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
