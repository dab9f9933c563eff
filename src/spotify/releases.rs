use crate::{
    error::ServiceError,
    spotify::SpotifyClient,
    types::{Album, Page, ReleaseDate, ReleaseKind, ReleaseKinds, ReleaseRef, SpotifyPage, Track},
};

const ARTIST_ALBUMS_LIMIT: u32 = 50;
const ALBUM_TRACKS_LIMIT: u32 = 50;

impl SpotifyClient {
    /// One page of an artist's releases restricted to `kinds`
    /// (`include_groups`). Entries whose group is not one of the known
    /// release kinds are dropped.
    pub async fn get_artist_releases(
        &self,
        artist_id: &str,
        kinds: &ReleaseKinds,
        market: Option<&str>,
        cursor: Option<String>,
    ) -> Result<Page<ReleaseRef>, ServiceError> {
        let url = match cursor {
            Some(next) => next,
            None => {
                let mut url = format!(
                    "{}?include_groups={kinds}&limit={ARTIST_ALBUMS_LIMIT}",
                    self.endpoint(&format!("/artists/{artist_id}/albums"))
                );
                if let Some(market) = market {
                    url.push_str(&format!("&market={market}"));
                }
                url
            }
        };

        let page: SpotifyPage<Album> = self.send_json(|http| http.get(&url)).await?;
        let items = page.items.into_iter().filter_map(to_release).collect();

        Ok(Page::new(items, page.next))
    }

    /// One page of a release's track ids. Tracks without an id (unavailable
    /// in the market) are left out.
    pub async fn get_release_tracks(
        &self,
        release_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<String>, ServiceError> {
        let url = cursor.unwrap_or_else(|| {
            format!(
                "{}?limit={ALBUM_TRACKS_LIMIT}",
                self.endpoint(&format!("/albums/{release_id}/tracks"))
            )
        });

        let page: SpotifyPage<Track> = self.send_json(|http| http.get(&url)).await?;
        let items = page
            .items
            .into_iter()
            .filter_map(|track| {
                if track.id.is_none() {
                    log::debug!("track `{}` of release {release_id} has no id", track.name);
                }
                track.id
            })
            .collect();

        Ok(Page::new(items, page.next))
    }
}

fn to_release(album: Album) -> Option<ReleaseRef> {
    let group = album.album_group.as_deref().unwrap_or(&album.album_type);
    let kind = match group.parse::<ReleaseKind>() {
        Ok(kind) => kind,
        Err(e) => {
            log::debug!("ignoring release {}: {e}", album.id);
            return None;
        }
    };

    Some(ReleaseRef {
        release_date: ReleaseDate::from_wire(&album.release_date, &album.release_date_precision),
        id: album.id,
        name: album.name,
        kind,
    })
}
