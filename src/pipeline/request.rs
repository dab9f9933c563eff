use chrono::NaiveDate;

use crate::{
    error::FreshError,
    pipeline::BatchPolicy,
    spotify::MAX_TRACKS_PER_REQUEST,
    types::{ReleaseKinds, Visibility},
    utils,
};

pub const MIN_WEEKS: u32 = 1;
pub const MAX_WEEKS: u32 = 4;

/// Recency window in whole weeks, always within `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow(u32);

impl RecencyWindow {
    pub fn new(weeks: u32) -> Result<Self, FreshError> {
        if (MIN_WEEKS..=MAX_WEEKS).contains(&weeks) {
            Ok(Self(weeks))
        } else {
            Err(FreshError::InvalidInput(format!(
                "recency window must be between {MIN_WEEKS} and {MAX_WEEKS} weeks, got {weeks}"
            )))
        }
    }

    pub fn weeks(self) -> u32 {
        self.0
    }

    /// Releases must be dated strictly after this day.
    pub fn cutoff(self, today: NaiveDate) -> NaiveDate {
        utils::recency_cutoff(today, self.0)
    }
}

/// A validated request for one fresh-playlist run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub source_playlist_id: String,
    pub window: RecencyWindow,
    pub visibility: Visibility,
}

impl RunRequest {
    /// `source` may be a bare id, a `spotify:playlist:` URI or a playlist URL.
    pub fn new(source: &str, weeks: u32, visibility: Visibility) -> Result<Self, FreshError> {
        if source.trim().is_empty() {
            return Err(FreshError::InvalidInput("source playlist id is missing".to_string()));
        }
        let source_playlist_id = utils::parse_playlist_id(source).ok_or_else(|| {
            FreshError::InvalidInput(format!("`{source}` is not a Spotify playlist id, URI or URL"))
        })?;

        Ok(Self {
            source_playlist_id,
            window: RecencyWindow::new(weeks)?,
            visibility,
        })
    }
}

/// Knobs of the pipeline that do not change between runs.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub batch_size: usize,
    pub batch_policy: BatchPolicy,
    pub kinds: ReleaseKinds,
    pub market: Option<String>,
    pub name_prefix: String,
    pub description_prefix: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            batch_size: MAX_TRACKS_PER_REQUEST,
            batch_policy: BatchPolicy::default(),
            kinds: ReleaseKinds::default(),
            market: Some(crate::config::DEFAULT_MARKET.to_string()),
            name_prefix: "FRESH: ".to_string(),
            description_prefix: "The freshest tracks from the artists in ".to_string(),
        }
    }
}
