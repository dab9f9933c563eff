use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::SpotifySettings,
    error::{AuthError, ServiceError},
    management::TokenManager,
    spotify::MusicService,
    types::{NewPlaylist, Page, PlaylistSummary, ReleaseKinds, ReleaseRef, SeedTrack, TargetPlaylist, Token},
};

/// Retries spent on 429 and 502/503 answers before giving up.
const MAX_RETRIES: u32 = 3;
/// Longest `Retry-After` the client is willing to sleep through.
const MAX_RETRY_AFTER_SECS: u64 = 120;
const GATEWAY_BACKOFF: Duration = Duration::from_secs(10);

/// Spotify Web API client holding the in-memory token.
pub struct SpotifyClient {
    pub(crate) http: Client,
    pub(crate) api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(settings: &SpotifySettings, token: Token) -> Result<Self, ServiceError> {
        let http = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            tokens: Mutex::new(TokenManager::new(token, settings, http.clone())),
            http,
            api_url: settings.api_url.clone(),
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn access_token(&self) -> Result<String, ServiceError> {
        self.tokens
            .lock()
            .await
            .get_valid_token()
            .await
            .map_err(|e| match e {
                // transport failures keep their kind; only answered refreshes are Unauthorized
                AuthError::Request(err) if err.status().is_none() => ServiceError::from(err),
                other => ServiceError::Unauthorized(other.to_string()),
            })
    }

    /// Sends the request built by `build`, retrying rate limits and gateway
    /// errors, and decodes a JSON body.
    pub(crate) async fn send_json<T, F>(&self, build: F) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = self.send(build).await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn send<F>(&self, build: F) -> Result<Response, ServiceError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            let token = self.access_token().await?;
            let response = build(&self.http).bearer_auth(token).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = retry_after_secs(&response);
                if attempt < MAX_RETRIES && retry_after <= MAX_RETRY_AFTER_SECS {
                    log::warn!("rate limited, waiting {retry_after}s (attempt {})", attempt + 1);
                    sleep(Duration::from_secs(retry_after)).await;
                    attempt += 1;
                    continue;
                }
                return Err(ServiceError::RateLimit { retry_after });
            }

            if (status == StatusCode::BAD_GATEWAY || status == StatusCode::SERVICE_UNAVAILABLE)
                && attempt < MAX_RETRIES
            {
                log::warn!("{status}, retrying in {}s", GATEWAY_BACKOFF.as_secs());
                sleep(GATEWAY_BACKOFF).await;
                attempt += 1;
                continue;
            }

            let message = error_message(response).await;
            return Err(classify_status(status, message));
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

/// Spotify error bodies look like `{"error": {"status": 404, "message": "..."}}`.
async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body)
}

pub(crate) fn classify_status(status: StatusCode, message: String) -> ServiceError {
    match status {
        StatusCode::UNAUTHORIZED => ServiceError::Unauthorized(message),
        _ => ServiceError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl MusicService for SpotifyClient {
    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistSummary, ServiceError> {
        self.get_playlist(playlist_id).await
    }

    async fn playlist_tracks_page(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<SeedTrack>, ServiceError> {
        self.get_playlist_tracks(playlist_id, cursor).await
    }

    async fn artist_releases_page(
        &self,
        artist_id: &str,
        kinds: &ReleaseKinds,
        market: Option<&str>,
        cursor: Option<String>,
    ) -> Result<Page<ReleaseRef>, ServiceError> {
        self.get_artist_releases(artist_id, kinds, market, cursor).await
    }

    async fn release_tracks_page(
        &self,
        release_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<String>, ServiceError> {
        self.get_release_tracks(release_id, cursor).await
    }

    async fn current_user(&self) -> Result<String, ServiceError> {
        self.get_current_user().await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<TargetPlaylist, ServiceError> {
        self.create_user_playlist(user_id, playlist).await
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), ServiceError> {
        self.add_tracks_to_playlist(playlist_id, track_ids).await
    }

    async fn current_user_playlists_page(
        &self,
        cursor: Option<String>,
    ) -> Result<Page<PlaylistSummary>, ServiceError> {
        self.get_current_user_playlists(cursor).await
    }
}
