use crate::{config::Settings, error, info, spotify, spotify::SpotifyClient, success};

/// Authorizes in the browser and returns a client holding the fresh token.
///
/// Exits the process when authorization or client setup fails.
pub async fn connect(settings: &Settings) -> SpotifyClient {
    info!("Opening the browser to authorize freshlist with Spotify...");
    let token = match spotify::auth::auth(&settings.spotify, &settings.server_address).await {
        Ok(token) => token,
        Err(e) => error!("Authorization failed. Err: {}", e),
    };
    success!("Authorized");

    match SpotifyClient::new(&settings.spotify, token) {
        Ok(client) => client,
        Err(e) => error!("Cannot set up the Spotify client. Err: {}", e),
    }
}

pub fn load_settings() -> Settings {
    match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!(
            "Invalid configuration: {}. Check {}",
            e,
            crate::config::env_path().display()
        ),
    }
}
