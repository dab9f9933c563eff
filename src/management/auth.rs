use chrono::Utc;
use reqwest::Client;

use crate::{config::SpotifySettings, error::AuthError, spotify::auth::parse_token_response, types::Token};

/// Seconds before expiry at which a token is refreshed.
const REFRESH_MARGIN_SECS: u64 = 240;

/// In-memory holder of the OAuth token for the lifetime of the process.
pub struct TokenManager {
    token: Token,
    token_url: String,
    client_id: String,
    http: Client,
}

impl TokenManager {
    /// `http` should carry the configured request timeout; refreshes go
    /// through it.
    pub fn new(token: Token, settings: &SpotifySettings, http: Client) -> Self {
        TokenManager {
            token,
            token_url: settings.token_url.clone(),
            client_id: settings.client_id.clone(),
            http,
        }
    }

    /// Returns an access token, refreshing it first when it is about to expire.
    pub async fn get_valid_token(&mut self) -> Result<String, AuthError> {
        if self.is_expired() {
            log::debug!("access token expired, refreshing");
            self.token = self.refresh_token().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        is_expired_at(&self.token, now)
    }

    async fn refresh_token(&self) -> Result<Token, AuthError> {
        let res = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
                ("client_id", self.client_id.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = res.json().await?;
        let mut token = parse_token_response(&json)?;
        // Spotify may omit the refresh token when it does not rotate it
        if token.refresh_token.is_empty() {
            token.refresh_token = self.token.refresh_token.clone();
        }
        Ok(token)
    }
}

fn is_expired_at(token: &Token, now: u64) -> bool {
    now + REFRESH_MARGIN_SECS >= token.obtained_at + token.expires_in
}
