//! Configuration management for freshlist.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Variables already present in the process
//! environment take precedence over the file.
//!
//! The `.env` file lives in:
//! - Linux: `~/.local/share/freshlist/.env`
//! - macOS: `~/Library/Application Support/freshlist/.env`
//! - Windows: `%LOCALAPPDATA%/freshlist/.env`

use std::{env, path::PathBuf, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-read-collaborative playlist-modify-private playlist-modify-public";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_MARKET: &str = "from_token";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Loads environment variables from `freshlist/.env` in the local data
/// directory, creating the directory if needed.
///
/// A missing file is not an error; a malformed one is.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no .env file at {}", path.display());
            Ok(())
        }
        Err(e) => Err(ConfigError::Dotenv(e.to_string())),
    }
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("freshlist/.env");
    path
}

/// Spotify endpoints and OAuth client settings.
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub market: Option<String>,
    pub timeout: Duration,
}

/// Everything the binary needs, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server_address: String,
    pub spotify: SpotifySettings,
    pub batch_retries: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let client_id =
            get("SPOTIFY_API_AUTH_CLIENT_ID").ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))?;

        let timeout_secs = parse_number(
            "FRESHLIST_HTTP_TIMEOUT_SECS",
            get("FRESHLIST_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "FRESHLIST_HTTP_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let batch_retries =
            parse_number("FRESHLIST_BATCH_RETRIES", get("FRESHLIST_BATCH_RETRIES"), 0)? as u32;

        // "none" disables the market hint entirely
        let market = match get("SPOTIFY_MARKET") {
            Some(m) if m.eq_ignore_ascii_case("none") => None,
            Some(m) => Some(m),
            None => Some(DEFAULT_MARKET.to_string()),
        };

        Ok(Self {
            server_address: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            spotify: SpotifySettings {
                client_id,
                redirect_uri: or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
                scope: or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
                auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
                token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
                api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL)
                    .trim_end_matches('/')
                    .to_string(),
                market,
                timeout: Duration::from_secs(timeout_secs),
            },
            batch_retries,
        })
    }
}

fn parse_number(key: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
