use std::collections::HashMap;

use crate::{
    error::ServiceError,
    pipeline::Paginator,
    spotify::MusicService,
    types::{ArtistRef, SeedTrack},
};

/// Unique artists in the order they were first seen. Re-inserting an id
/// keeps its position and takes the newer name.
#[derive(Debug, Clone, Default)]
pub struct ArtistSet {
    artists: Vec<ArtistRef>,
    index: HashMap<String, usize>,
}

impl ArtistSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, artist: ArtistRef) {
        match self.index.get(&artist.id) {
            Some(&pos) => self.artists[pos].name = artist.name,
            None => {
                self.index.insert(artist.id.clone(), self.artists.len());
                self.artists.push(artist);
            }
        }
    }

    /// Drops the artist without an id (local files, unlinked credits).
    pub fn remove_anonymous(&mut self) {
        if self.index.remove("").is_some() {
            self.artists.retain(|a| !a.id.is_empty());
            self.index = self
                .artists
                .iter()
                .enumerate()
                .map(|(pos, a)| (a.id.clone(), pos))
                .collect();
        }
    }

    pub fn contains(&self, artist_id: &str) -> bool {
        self.index.contains_key(artist_id)
    }

    pub fn get(&self, artist_id: &str) -> Option<&ArtistRef> {
        self.index.get(artist_id).map(|&pos| &self.artists[pos])
    }

    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtistRef> {
        self.artists.iter()
    }
}

impl Extend<ArtistRef> for ArtistSet {
    fn extend<I: IntoIterator<Item = ArtistRef>>(&mut self, iter: I) {
        for artist in iter {
            self.insert(artist);
        }
    }
}

impl IntoIterator for ArtistSet {
    type Item = ArtistRef;
    type IntoIter = std::vec::IntoIter<ArtistRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.artists.into_iter()
    }
}

#[derive(Debug, Clone)]
pub struct CollectedArtists {
    pub artists: ArtistSet,
    pub track_count: usize,
}

/// Walks every track of the seed playlist and gathers its credited artists.
///
/// Any fetch error is returned as is; a partial artist list of the seed is
/// not useful.
pub async fn collect_artists<C>(client: &C, playlist_id: &str) -> Result<CollectedArtists, ServiceError>
where
    C: MusicService + ?Sized,
{
    let mut tracks = Paginator::new(move |cursor| client.playlist_tracks_page(playlist_id, cursor));
    let mut artists = ArtistSet::new();
    let mut track_count = 0;

    while let Some(SeedTrack { artists: credited }) = tracks.next().await? {
        track_count += 1;
        artists.extend(credited);
    }

    artists.remove_anonymous();
    log::debug!(
        "seed playlist {playlist_id}: {track_count} tracks over {} pages, {} artists",
        tracks.pages_fetched(),
        artists.len()
    );

    Ok(CollectedArtists {
        artists,
        track_count,
    })
}
