use crate::{
    error::ServiceError,
    spotify::{MAX_TRACKS_PER_REQUEST, SpotifyClient},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, ArtistRef, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUserResponse, NewPlaylist, Page, Playlist, PlaylistSummary,
        PlaylistTrackItem, SeedTrack, SpotifyPage, TargetPlaylist,
    },
    utils,
};

const PLAYLIST_TRACKS_LIMIT: u32 = 100;
const PLAYLISTS_LIMIT: u32 = 50;

impl SpotifyClient {
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistSummary, ServiceError> {
        let url = self.endpoint(&format!("/playlists/{playlist_id}"));
        let playlist: Playlist = self
            .send_json(|http| http.get(&url).query(&[("fields", "id,name,owner,tracks.total")]))
            .await?;
        Ok(summarize(playlist))
    }

    /// One page of a playlist's entries, each reduced to its credited
    /// artists. Removed or unavailable tracks come back with no artists;
    /// local files carry artists without an id.
    pub async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<SeedTrack>, ServiceError> {
        let url = cursor.unwrap_or_else(|| {
            format!(
                "{}?limit={PLAYLIST_TRACKS_LIMIT}",
                self.endpoint(&format!("/playlists/{playlist_id}/tracks"))
            )
        });

        let page: SpotifyPage<PlaylistTrackItem> = self.send_json(|http| http.get(&url)).await?;

        Ok(seed_page(page))
    }

    pub async fn get_current_user(&self) -> Result<String, ServiceError> {
        let url = self.endpoint("/me");
        let user: CurrentUserResponse = self.send_json(|http| http.get(&url)).await?;
        Ok(user.id)
    }

    pub async fn get_current_user_playlists(
        &self,
        cursor: Option<String>,
    ) -> Result<Page<PlaylistSummary>, ServiceError> {
        let url = cursor
            .unwrap_or_else(|| format!("{}?limit={PLAYLISTS_LIMIT}", self.endpoint("/me/playlists")));

        let page: SpotifyPage<Playlist> = self.send_json(|http| http.get(&url)).await?;
        Ok(Page::new(
            page.items.into_iter().map(summarize).collect(),
            page.next,
        ))
    }

    pub async fn create_user_playlist(
        &self,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<TargetPlaylist, ServiceError> {
        let url = self.endpoint(&format!("/users/{user_id}/playlists"));
        let body = CreatePlaylistRequest {
            name: playlist.name.clone(),
            description: playlist.description.clone(),
            public: playlist.visibility.is_public(),
            collaborative: false,
        };

        let created: CreatePlaylistResponse =
            self.send_json(|http| http.post(&url).json(&body)).await?;

        let external_url = created
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", created.id));

        Ok(TargetPlaylist {
            id: created.id,
            external_url,
        })
    }

    pub async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ServiceError> {
        if track_ids.is_empty() {
            return Ok(());
        }
        if track_ids.len() > MAX_TRACKS_PER_REQUEST {
            return Err(ServiceError::Status {
                status: 400,
                message: format!(
                    "{} tracks exceed the limit of {MAX_TRACKS_PER_REQUEST} per request",
                    track_ids.len()
                ),
            });
        }

        let url = self.endpoint(&format!("/playlists/{playlist_id}/tracks"));
        let body = AddTrackToPlaylistRequest {
            uris: track_ids.iter().map(|id| utils::track_uri(id)).collect(),
        };

        let response: AddTrackToPlaylistResponse =
            self.send_json(|http| http.post(&url).json(&body)).await?;
        log::debug!("playlist {playlist_id} now at snapshot {}", response.snapshot_id);

        Ok(())
    }
}

/// Artists without an id keep an empty id; the collector drops them.
fn seed_page(page: SpotifyPage<PlaylistTrackItem>) -> Page<SeedTrack> {
    let items = page
        .items
        .into_iter()
        .map(|item| SeedTrack {
            artists: item
                .track
                .map(|track| {
                    track
                        .artists
                        .into_iter()
                        .map(|a| ArtistRef::new(a.id.unwrap_or_default(), a.name))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    Page::new(items, page.next)
}

fn summarize(playlist: Playlist) -> PlaylistSummary {
    PlaylistSummary {
        id: playlist.id,
        name: playlist.name,
        owner: playlist
            .owner
            .display_name
            .unwrap_or(playlist.owner.id),
        track_count: playlist.tracks.map(|t| t.total).unwrap_or(0),
    }
}
