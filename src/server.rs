use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, config::SpotifySettings, types::PkceToken};

pub fn router(state: Arc<Mutex<Option<PkceToken>>>, settings: Arc<SpotifySettings>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
        .layer(Extension(settings))
}

pub async fn start_api_server(
    listener: TcpListener,
    state: Arc<Mutex<Option<PkceToken>>>,
    settings: Arc<SpotifySettings>,
) -> std::io::Result<()> {
    axum::serve(listener, router(state, settings)).await
}
