use std::{fmt, time::Duration};

use crate::{
    error::ServiceError,
    types::{ReportTableRow, TargetPlaylist},
};

/// Aggregate counters of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Entries read from the seed playlist.
    pub input_track_count: usize,
    /// Distinct artists with an id.
    pub artist_count: usize,
    /// Releases accepted for expansion.
    pub release_count: usize,
    /// Tracks the service accepted into the target playlist.
    pub output_track_count: usize,
    /// Tracks lost with a failed batch.
    pub dropped_track_count: usize,
    /// Recovered failures of any kind; see [`SkipEvent`].
    pub error_count: usize,
    pub elapsed: Duration,
}

/// A failure the run absorbed instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipEvent {
    /// The artist's release listing failed; none of its releases were used.
    Artist {
        artist_id: String,
        artist_name: String,
        error: ServiceError,
    },
    /// The release's track listing failed; `tracks_kept` ids read before the
    /// failure were still added.
    Release {
        release_id: String,
        release_name: String,
        tracks_kept: usize,
        error: ServiceError,
    },
    /// The release date could not be parsed, so freshness is unknown.
    ReleaseDate {
        release_id: String,
        release_name: String,
        reason: String,
    },
    /// A batch was refused by the service and dropped.
    Batch {
        track_count: usize,
        attempts: u32,
        error: ServiceError,
    },
}

impl fmt::Display for SkipEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipEvent::Artist {
                artist_id,
                artist_name,
                error,
            } => write!(f, "skipped artist {artist_name} ({artist_id}): {error}"),
            SkipEvent::Release {
                release_id,
                release_name,
                tracks_kept,
                error,
            } => write!(
                f,
                "release {release_name} ({release_id}) incomplete, kept {tracks_kept} tracks: {error}"
            ),
            SkipEvent::ReleaseDate {
                release_id,
                release_name,
                reason,
            } => write!(f, "skipped release {release_name} ({release_id}): {reason}"),
            SkipEvent::Batch {
                track_count,
                attempts,
                error,
            } => write!(
                f,
                "dropped {track_count} tracks after {attempts} attempt(s): {error}"
            ),
        }
    }
}

/// Outcome of a run that got as far as creating the target playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub source_name: String,
    pub playlist: TargetPlaylist,
    pub stats: RunStats,
    pub skipped: Vec<SkipEvent>,
    /// Set when the run stopped early on request.
    pub cancelled: bool,
}

impl RunReport {
    /// Everything was processed and nothing was skipped.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.skipped.is_empty()
    }

    pub fn table_rows(&self) -> Vec<ReportTableRow> {
        let row = |metric: &str, value: String| ReportTableRow {
            metric: metric.to_string(),
            value,
        };

        vec![
            row("source", self.source_name.clone()),
            row("playlist", self.playlist.external_url.clone()),
            row("input tracks", self.stats.input_track_count.to_string()),
            row("artists", self.stats.artist_count.to_string()),
            row("releases", self.stats.release_count.to_string()),
            row("tracks added", self.stats.output_track_count.to_string()),
            row("tracks dropped", self.stats.dropped_track_count.to_string()),
            row("errors", self.stats.error_count.to_string()),
            row("elapsed", format!("{:.1}s", self.stats.elapsed.as_secs_f64())),
        ]
    }
}
