use std::time::Instant;

use chrono::{NaiveDate, Utc};

use crate::{
    cancel::CancellationState,
    error::{FreshError, ServiceError},
    pipeline::{
        FlushOutcome, NoopObserver, PipelineSettings, PlaylistAssembler, ProcessedReleases,
        ReleaseQuery, RunObserver, RunPhase, RunReport, RunRequest, RunStats, SkipEvent,
        collect_artists, expand_release, filter_releases,
    },
    spotify::MusicService,
    types::{NewPlaylist, PlaylistSummary},
};

static NOOP: NoopObserver = NoopObserver;

/// Per-run mutable state: counters and the log of absorbed failures.
struct RunContext<'o> {
    stats: RunStats,
    skipped: Vec<SkipEvent>,
    observer: &'o dyn RunObserver,
}

impl RunContext<'_> {
    fn skip(&mut self, event: SkipEvent) {
        log::warn!("{event}");
        self.observer.skipped(&event);
        self.skipped.push(event);
    }
}

/// Builds the fresh playlist for one seed playlist.
///
/// Each call to [`run`](Self::run) is independent: the processed release set,
/// the counters and the skip log live only for that call.
pub struct FreshPipeline<'a, C: MusicService + ?Sized> {
    client: &'a C,
    settings: PipelineSettings,
    cancel: CancellationState,
    observer: &'a dyn RunObserver,
    today: Option<NaiveDate>,
}

impl<'a, C: MusicService + ?Sized> FreshPipeline<'a, C> {
    pub fn new(client: &'a C, settings: PipelineSettings) -> Self {
        Self {
            client,
            settings,
            cancel: CancellationState::new(),
            observer: &NOOP,
            today: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationState) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn RunObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Pins the day the recency window is measured from.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn cancellation(&self) -> &CancellationState {
        &self.cancel
    }

    pub async fn run(&self, request: &RunRequest) -> Result<RunReport, FreshError> {
        let started = Instant::now();
        match self.execute(request, started).await {
            Ok(report) => {
                self.observer.phase(RunPhase::Done);
                Ok(report)
            }
            Err(e) => {
                log::error!("run for playlist {} failed: {e}", request.source_playlist_id);
                self.observer.phase(RunPhase::Failed);
                Err(e)
            }
        }
    }

    async fn execute(&self, request: &RunRequest, started: Instant) -> Result<RunReport, FreshError> {
        let mut ctx = RunContext {
            stats: RunStats::default(),
            skipped: Vec::new(),
            observer: self.observer,
        };

        self.enter(RunPhase::Init);
        let user_id = self.client.current_user().await.map_err(|e| match e {
            ServiceError::Unauthorized(msg) => {
                FreshError::InvalidInput(format!("missing or expired credential: {msg}"))
            }
            other => fatal("cannot read the current user", other),
        })?;

        self.enter(RunPhase::CollectArtists);
        let source_id = request.source_playlist_id.as_str();
        let source: PlaylistSummary = self
            .client
            .playlist(source_id)
            .await
            .map_err(|e| fatal(&format!("cannot read seed playlist {source_id}"), e))?;
        let collected = collect_artists(self.client, source_id)
            .await
            .map_err(|e| fatal(&format!("cannot read tracks of seed playlist {source_id}"), e))?;
        ctx.stats.input_track_count = collected.track_count;
        ctx.stats.artist_count = collected.artists.len();

        self.enter(RunPhase::CreatePlaylist);
        let new_playlist = NewPlaylist {
            name: format!("{}{}", self.settings.name_prefix, source.name),
            description: format!("{}{}", self.settings.description_prefix, source.name),
            visibility: request.visibility,
        };
        let target = self
            .client
            .create_playlist(&user_id, &new_playlist)
            .await
            .map_err(|e| fatal("cannot create the target playlist", e))?;
        log::info!("created playlist {} ({})", new_playlist.name, target.id);

        self.enter(RunPhase::ExpandArtists);
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        let query = ReleaseQuery {
            cutoff: request.window.cutoff(today),
            kinds: &self.settings.kinds,
            market: self.settings.market.as_deref(),
        };
        let mut processed = ProcessedReleases::new();
        let mut assembler = PlaylistAssembler::new(
            self.client,
            target.id.clone(),
            self.settings.batch_size,
            self.settings.batch_policy,
        );
        let mut cancelled = false;
        let total = collected.artists.len();

        'artists: for (index, artist) in collected.artists.iter().enumerate() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            self.observer.artist_started(artist, index + 1, total);

            let filtered = match filter_releases(self.client, artist, &query, &mut processed).await {
                Ok(filtered) => filtered,
                Err(error) => {
                    ctx.skip(SkipEvent::Artist {
                        artist_id: artist.id.clone(),
                        artist_name: artist.name.clone(),
                        error,
                    });
                    continue;
                }
            };

            for unreadable in filtered.unreadable {
                ctx.skip(SkipEvent::ReleaseDate {
                    release_id: unreadable.release.id,
                    release_name: unreadable.release.name,
                    reason: unreadable.reason,
                });
            }

            for release in filtered.accepted {
                if self.cancel.is_cancelled() {
                    cancelled = true;
                    break 'artists;
                }
                ctx.stats.release_count += 1;
                self.observer.release_accepted(&release);

                let expanded = expand_release(self.client, &release).await;
                if let Some(error) = expanded.error {
                    ctx.skip(SkipEvent::Release {
                        release_id: release.id.clone(),
                        release_name: release.name.clone(),
                        tracks_kept: expanded.track_ids.len(),
                        error,
                    });
                }

                for track_id in expanded.track_ids {
                    match assembler.add(track_id).await {
                        FlushOutcome::Buffered => {}
                        FlushOutcome::Sent(count) => self.observer.tracks_sent(count),
                        FlushOutcome::Dropped(failed) => ctx.skip(SkipEvent::Batch {
                            track_count: failed.track_count,
                            attempts: failed.attempts,
                            error: failed.error,
                        }),
                    }
                }
            }
        }

        if cancelled {
            log::info!("run cancelled, flushing buffered tracks");
        }

        self.enter(RunPhase::FinalFlush);
        let sent_before = assembler.summary().sent;
        let failed_before = assembler.summary().failed.len();
        let summary = assembler.finish().await;
        if summary.sent > sent_before {
            self.observer.tracks_sent(summary.sent - sent_before);
        }
        for failed in summary.failed.iter().skip(failed_before) {
            ctx.skip(SkipEvent::Batch {
                track_count: failed.track_count,
                attempts: failed.attempts,
                error: failed.error.clone(),
            });
        }

        ctx.stats.output_track_count = summary.sent;
        ctx.stats.dropped_track_count = summary.dropped;
        ctx.stats.error_count = ctx.skipped.len();
        ctx.stats.elapsed = started.elapsed();

        Ok(RunReport {
            source_name: source.name,
            playlist: target,
            stats: ctx.stats,
            skipped: ctx.skipped,
            cancelled,
        })
    }

    fn enter(&self, phase: RunPhase) {
        log::debug!("entering {phase:?}");
        self.observer.phase(phase);
    }
}

fn fatal(context: &str, source: ServiceError) -> FreshError {
    FreshError::FatalFetch {
        context: context.to_string(),
        source,
    }
}
