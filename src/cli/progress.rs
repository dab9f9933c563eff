use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    pipeline::{RunObserver, RunPhase, SkipEvent},
    types::{ArtistRef, ReleaseRef},
    warning,
};

pub fn spinner(message: impl Into<std::borrow::Cow<'static, str>>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Shows pipeline progress on a spinner; skipped work is printed above it.
pub struct SpinnerObserver {
    pb: ProgressBar,
    releases: AtomicUsize,
    tracks: AtomicUsize,
}

impl SpinnerObserver {
    pub fn new() -> Self {
        Self {
            pb: spinner("Starting..."),
            releases: AtomicUsize::new(0),
            tracks: AtomicUsize::new(0),
        }
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl RunObserver for SpinnerObserver {
    fn phase(&self, phase: RunPhase) {
        match phase {
            RunPhase::Init => self.pb.set_message("Checking credentials..."),
            RunPhase::CollectArtists => self.pb.set_message("Reading the seed playlist..."),
            RunPhase::CreatePlaylist => self.pb.set_message("Creating the playlist..."),
            RunPhase::ExpandArtists => self.pb.set_message("Looking for fresh releases..."),
            RunPhase::FinalFlush => self.pb.set_message("Adding the remaining tracks..."),
            RunPhase::Done | RunPhase::Failed => self.pb.finish_and_clear(),
        }
    }

    fn artist_started(&self, artist: &ArtistRef, position: usize, total: usize) {
        self.pb.set_message(format!(
            "[{position}/{total}] {} ({} releases, {} tracks so far)",
            artist.name,
            self.releases.load(Ordering::Relaxed),
            self.tracks.load(Ordering::Relaxed)
        ));
    }

    fn release_accepted(&self, _release: &ReleaseRef) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    fn tracks_sent(&self, count: usize) {
        self.tracks.fetch_add(count, Ordering::Relaxed);
    }

    fn skipped(&self, event: &SkipEvent) {
        self.pb.suspend(|| warning!("{}", event));
    }
}
