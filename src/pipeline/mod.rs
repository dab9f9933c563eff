//! # Fresh Playlist Pipeline
//!
//! Turns a seed playlist into a new playlist holding every track of the
//! recent releases by the seed's artists.
//!
//! ```text
//! seed playlist ──► collect_artists ──► ArtistSet
//!                                          │ per artist
//!                                          ▼
//!                               filter_releases (recency window, dedup)
//!                                          │ per release
//!                                          ▼
//!                               expand_release ──► PlaylistAssembler ──► target playlist
//! ```
//!
//! All listing endpoints are read through [`Paginator`], which fetches one
//! page at a time and follows the service's continuation cursor until it runs
//! out.
//!
//! [`FreshPipeline`] drives the stages in order and decides which failures end
//! the run and which are absorbed:
//!
//! - missing credentials or a bad request end the run as
//!   [`FreshError::InvalidInput`](crate::error::FreshError::InvalidInput)
//! - failures before the target playlist exists (current user, seed playlist,
//!   playlist creation) end the run as
//!   [`FreshError::FatalFetch`](crate::error::FreshError::FatalFetch)
//! - everything after that is recorded as a [`SkipEvent`] and the run goes on
//!
//! Artists are processed one at a time in seed order, and releases of an
//! artist in the order the service lists them. A release reached through
//! several co-credited artists is expanded once.

mod artists;
mod assembler;
mod observer;
mod orchestrator;
mod paginator;
mod releases;
mod report;
mod request;
mod tracks;

pub use artists::{ArtistSet, CollectedArtists, collect_artists};
pub use assembler::{AssemblySummary, BatchPolicy, FailedBatch, FlushOutcome, PlaylistAssembler};
pub use observer::{NoopObserver, RunObserver, RunPhase};
pub use orchestrator::FreshPipeline;
pub use paginator::Paginator;
pub use releases::{FilteredReleases, ProcessedReleases, ReleaseQuery, UnreadableRelease, filter_releases};
pub use report::{RunReport, RunStats, SkipEvent};
pub use request::{MAX_WEEKS, MIN_WEEKS, PipelineSettings, RecencyWindow, RunRequest};
pub use tracks::{ExpandedRelease, expand_release};
