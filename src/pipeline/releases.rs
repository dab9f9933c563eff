use std::collections::HashSet;

use chrono::NaiveDate;

use crate::{
    error::ServiceError,
    pipeline::Paginator,
    spotify::MusicService,
    types::{ArtistRef, ReleaseKinds, ReleaseRef},
};

/// Release ids already claimed for expansion during one run, and ids whose
/// unreadable date was already reported.
#[derive(Debug, Clone, Default)]
pub struct ProcessedReleases {
    ids: HashSet<String>,
    unreadable: HashSet<String>,
}

impl ProcessedReleases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, release_id: &str) -> bool {
        self.ids.contains(release_id)
    }

    /// Claims a release; `false` if it was already claimed.
    pub fn claim(&mut self, release_id: &str) -> bool {
        self.ids.insert(release_id.to_string())
    }

    /// Notes a release with an unreadable date; `false` if it was already
    /// noted through another artist.
    pub fn mark_unreadable(&mut self, release_id: &str) -> bool {
        self.unreadable.insert(release_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Parameters shared by every artist's release walk.
#[derive(Debug, Clone)]
pub struct ReleaseQuery<'a> {
    pub cutoff: NaiveDate,
    pub kinds: &'a ReleaseKinds,
    pub market: Option<&'a str>,
}

/// A release that was listed but whose date could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadableRelease {
    pub release: ReleaseRef,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct FilteredReleases {
    /// Fresh releases, already claimed in [`ProcessedReleases`].
    pub accepted: Vec<ReleaseRef>,
    pub examined: usize,
    pub unreadable: Vec<UnreadableRelease>,
}

/// Walks all releases of `artist` and keeps those of a requested kind dated
/// strictly after the cutoff that no other artist claimed yet.
///
/// The whole listing is read before anything is claimed: when a page fails,
/// the error is returned and `processed` is left untouched, so the artist can
/// be skipped as a unit.
pub async fn filter_releases<C>(
    client: &C,
    artist: &ArtistRef,
    query: &ReleaseQuery<'_>,
    processed: &mut ProcessedReleases,
) -> Result<FilteredReleases, ServiceError>
where
    C: MusicService + ?Sized,
{
    let artist_id = artist.id.as_str();
    let kinds = query.kinds;
    let market = query.market;
    let mut listing = Paginator::new(move |cursor| {
        client.artist_releases_page(artist_id, kinds, market, cursor)
    });

    let mut result = FilteredReleases::default();
    let mut candidates: Vec<ReleaseRef> = Vec::new();
    let mut unreadable: Vec<UnreadableRelease> = Vec::new();

    while let Some(release) = listing.next().await? {
        result.examined += 1;

        if !kinds.contains(release.kind) {
            continue;
        }
        if processed.contains(&release.id) || candidates.iter().any(|c| c.id == release.id) {
            continue;
        }

        match release.release_date.resolve() {
            Ok(date) if date > query.cutoff => candidates.push(release),
            Ok(_) => {}
            Err(reason) => unreadable.push(UnreadableRelease { release, reason }),
        }
    }

    for release in candidates {
        if processed.claim(&release.id) {
            result.accepted.push(release);
        }
    }
    for entry in unreadable {
        if processed.mark_unreadable(&entry.release.id) {
            result.unreadable.push(entry);
        }
    }

    log::debug!(
        "artist {} ({}): {} releases examined, {} fresh",
        artist.name,
        artist.id,
        result.examined,
        result.accepted.len()
    );

    Ok(result)
}
