//! # Spotify Integration Module
//!
//! The capability set the fresh-playlist pipeline consumes, and its Spotify
//! Web API implementation.
//!
//! ```text
//! Pipeline (collect, filter, expand, assemble)
//!          ↓
//! MusicService trait
//!          ↓
//! SpotifyClient (reqwest, bearer token, retries)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - OAuth 2.0 PKCE flow, code exchange and token parsing
//! - [`client`] - HTTP plumbing: timeouts, bearer auth, rate limit and
//!   gateway retries, status classification
//! - [`playlist`] - playlists, playlist tracks, current user, playlist creation
//!   and track insertion
//! - [`releases`] - artist releases and release tracks
//!
//! ## API Coverage
//!
//! - `GET /me` - current user id
//! - `GET /me/playlists` - current user's playlists
//! - `GET /playlists/{id}` - playlist name
//! - `GET /playlists/{id}/tracks` - seed tracks with their artists
//! - `GET /artists/{id}/albums` - albums and singles of an artist
//! - `GET /albums/{id}/tracks` - tracks of a release
//! - `POST /users/{user_id}/playlists` - create the target playlist
//! - `POST /playlists/{id}/tracks` - append up to 100 tracks
//!
//! Paged endpoints return a [`Page`] whose cursor is Spotify's absolute
//! `next` URL; callers treat it as opaque.

use async_trait::async_trait;

use crate::{
    error::ServiceError,
    types::{NewPlaylist, Page, PlaylistSummary, ReleaseKinds, ReleaseRef, SeedTrack, TargetPlaylist},
};

pub mod auth;
pub mod client;
pub mod playlist;
pub mod releases;

pub use client::SpotifyClient;

/// Maximum number of track ids accepted by one add-tracks call.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// The music service operations the pipeline needs.
///
/// Page methods take the cursor returned by the previous page (`None` for the
/// first page).
#[async_trait]
pub trait MusicService: Send + Sync {
    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistSummary, ServiceError>;

    async fn playlist_tracks_page(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<SeedTrack>, ServiceError>;

    async fn artist_releases_page(
        &self,
        artist_id: &str,
        kinds: &ReleaseKinds,
        market: Option<&str>,
        cursor: Option<String>,
    ) -> Result<Page<ReleaseRef>, ServiceError>;

    async fn release_tracks_page(
        &self,
        release_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<String>, ServiceError>;

    /// Id of the user the credential belongs to.
    async fn current_user(&self) -> Result<String, ServiceError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<TargetPlaylist, ServiceError>;

    /// Appends tracks; `track_ids` never holds more than
    /// [`MAX_TRACKS_PER_REQUEST`] ids.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), ServiceError>;

    async fn current_user_playlists_page(
        &self,
        cursor: Option<String>,
    ) -> Result<Page<PlaylistSummary>, ServiceError>;
}
