use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub state: String,
    pub token: Option<Token>,
}

/// An artist credited on a track, identified by its Spotify id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

impl ArtistRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One entry of a seed playlist, reduced to its credited artists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedTrack {
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

impl FromStr for DatePrecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(DatePrecision::Year),
            "month" => Ok(DatePrecision::Month),
            "day" => Ok(DatePrecision::Day),
            other => Err(format!("unknown release date precision `{other}`")),
        }
    }
}

/// A release date as reported by Spotify, with its precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDate {
    pub raw: String,
    pub precision: DatePrecision,
}

impl ReleaseDate {
    pub fn new(raw: impl Into<String>, precision: DatePrecision) -> Self {
        Self {
            raw: raw.into(),
            precision,
        }
    }

    pub fn day(raw: impl Into<String>) -> Self {
        Self::new(raw, DatePrecision::Day)
    }

    /// Builds a date from the wire fields. An unknown precision string falls
    /// back to the shape of the raw value.
    pub fn from_wire(raw: &str, precision: &str) -> Self {
        let precision = precision
            .parse()
            .unwrap_or_else(|_| utils::infer_date_precision(raw));
        Self::new(raw, precision)
    }

    /// The comparable calendar date: year precision resolves to January 1,
    /// month precision to the first of the month.
    pub fn resolve(&self) -> Result<NaiveDate, String> {
        utils::parse_release_date(&self.raw, self.precision)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseKind {
    Album,
    Single,
    Compilation,
    AppearsOn,
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseKind::Album => "album",
            ReleaseKind::Single => "single",
            ReleaseKind::Compilation => "compilation",
            ReleaseKind::AppearsOn => "appears_on",
        };
        f.write_str(name)
    }
}

impl FromStr for ReleaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "album" => Ok(ReleaseKind::Album),
            "single" => Ok(ReleaseKind::Single),
            "compilation" => Ok(ReleaseKind::Compilation),
            "appears_on" => Ok(ReleaseKind::AppearsOn),
            other => Err(format!("unknown release type `{other}`")),
        }
    }
}

/// The release groups requested from the artist albums endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseKinds(Vec<ReleaseKind>);

impl ReleaseKinds {
    pub fn new(kinds: Vec<ReleaseKind>) -> Self {
        let mut unique = Vec::with_capacity(kinds.len());
        for kind in kinds {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        Self(unique)
    }

    pub fn contains(&self, kind: ReleaseKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn as_slice(&self) -> &[ReleaseKind] {
        &self.0
    }
}

impl Default for ReleaseKinds {
    fn default() -> Self {
        Self(vec![ReleaseKind::Album, ReleaseKind::Single])
    }
}

impl fmt::Display for ReleaseKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ReleaseKind::to_string)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

/// An album or single of an artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRef {
    pub id: String,
    pub name: String,
    pub release_date: ReleaseDate,
    pub kind: ReleaseKind,
}

/// One page of a paged collection; `next` is the opaque cursor of the
/// following page, `None` on the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: Option<String>) -> Self {
        Self { items, next }
    }

    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub track_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub visibility: Visibility,
}

/// The playlist a run writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlaylist {
    pub id: String,
    pub external_url: String,
}

// Spotify Web API payloads.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPage<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub id: Option<String>,
    #[serde(default)]
    pub artists: Vec<AlbumArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub release_date: String,
    pub release_date_precision: String,
    pub album_type: String,
    pub album_group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: Owner,
    pub tracks: Option<TracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub owner: String,
    pub tracks: u64,
    pub id: String,
}

#[derive(Tabled)]
pub struct ReportTableRow {
    pub metric: String,
    pub value: String,
}
