use crate::{
    pipeline::SkipEvent,
    types::{ArtistRef, ReleaseRef},
};

/// Stages of a run, in order. `Failed` is reachable only before expansion
/// starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    CollectArtists,
    CreatePlaylist,
    ExpandArtists,
    FinalFlush,
    Done,
    Failed,
}

/// Progress hooks called by the orchestrator. All methods default to no-ops.
pub trait RunObserver: Send + Sync {
    fn phase(&self, _phase: RunPhase) {}

    /// `position` is 1-based.
    fn artist_started(&self, _artist: &ArtistRef, _position: usize, _total: usize) {}

    fn release_accepted(&self, _release: &ReleaseRef) {}

    fn tracks_sent(&self, _count: usize) {}

    fn skipped(&self, _event: &SkipEvent) {}
}

pub struct NoopObserver;

impl RunObserver for NoopObserver {}
