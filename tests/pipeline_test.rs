use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use freshlist::{
    cancel::CancellationState,
    error::{FreshError, ServiceError},
    pipeline::{
        BatchPolicy, FreshPipeline, Paginator, PipelineSettings, RunObserver, RunPhase, RunRequest,
        SkipEvent, collect_artists,
    },
    spotify::MusicService,
    types::{
        ArtistRef, DatePrecision, NewPlaylist, Page, PlaylistSummary, ReleaseDate, ReleaseKind,
        ReleaseKinds, ReleaseRef, SeedTrack, TargetPlaylist, Visibility,
    },
};

type Pages<T> = Vec<Result<Vec<T>, ServiceError>>;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn days_ago(days: i64) -> String {
    (today() - chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn server_error() -> ServiceError {
    ServiceError::Status {
        status: 500,
        message: "internal error".to_string(),
    }
}

fn seed(artists: &[(&str, &str)]) -> SeedTrack {
    SeedTrack {
        artists: artists.iter().map(|(id, name)| ArtistRef::new(*id, *name)).collect(),
    }
}

fn release(id: &str, date: &str) -> ReleaseRef {
    ReleaseRef {
        id: id.to_string(),
        name: format!("Release {id}"),
        release_date: ReleaseDate::day(date),
        kind: ReleaseKind::Album,
    }
}

fn track_ids(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}-t{i}")).collect()
}

/// Cursor is the index of the next page.
fn page_of<T: Clone>(pages: Option<&Pages<T>>, cursor: Option<String>) -> Result<Page<T>, ServiceError> {
    let Some(pages) = pages else {
        return Ok(Page::last(Vec::new()));
    };
    let index = cursor.map(|c| c.parse::<usize>().unwrap()).unwrap_or(0);
    match pages.get(index) {
        None => Ok(Page::last(Vec::new())),
        Some(Err(e)) => Err(e.clone()),
        Some(Ok(items)) => {
            let next = (index + 1 < pages.len()).then(|| (index + 1).to_string());
            Ok(Page::new(items.clone(), next))
        }
    }
}

/// In-memory music service with scripted failures that records every write.
#[derive(Default)]
struct FakeService {
    user_error: Option<ServiceError>,
    seed_name: String,
    seed_pages: Pages<SeedTrack>,
    artist_pages: HashMap<String, Pages<ReleaseRef>>,
    release_pages: HashMap<String, Pages<String>>,
    create_error: Option<ServiceError>,
    add_failures: Mutex<VecDeque<bool>>,
    cancel_on_expand: Option<CancellationState>,

    listed_artists: Mutex<Vec<String>>,
    expanded: Mutex<Vec<String>>,
    created: Mutex<Vec<NewPlaylist>>,
    added: Mutex<Vec<Vec<String>>>,
}

impl FakeService {
    fn new(seed_pages: Vec<Vec<SeedTrack>>) -> Self {
        Self {
            seed_name: "Seed".to_string(),
            seed_pages: seed_pages.into_iter().map(Ok).collect(),
            ..Self::default()
        }
    }

    fn with_releases(mut self, artist_id: &str, releases: Vec<ReleaseRef>) -> Self {
        self.artist_pages.insert(artist_id.to_string(), vec![Ok(releases)]);
        self
    }

    fn with_release_pages(mut self, artist_id: &str, pages: Pages<ReleaseRef>) -> Self {
        self.artist_pages.insert(artist_id.to_string(), pages);
        self
    }

    fn with_tracks(mut self, release_id: &str, count: usize) -> Self {
        self.release_pages
            .insert(release_id.to_string(), vec![Ok(track_ids(release_id, count))]);
        self
    }

    fn with_track_pages(mut self, release_id: &str, pages: Pages<String>) -> Self {
        self.release_pages.insert(release_id.to_string(), pages);
        self
    }

    fn with_add_failures(self, script: &[bool]) -> Self {
        *self.add_failures.lock().unwrap() = script.iter().copied().collect();
        self
    }

    fn added_ids(&self) -> Vec<String> {
        self.added.lock().unwrap().iter().flatten().cloned().collect()
    }

    fn batch_sizes(&self) -> Vec<usize> {
        self.added.lock().unwrap().iter().map(Vec::len).collect()
    }

    fn expanded(&self) -> Vec<String> {
        self.expanded.lock().unwrap().clone()
    }
}

#[async_trait]
impl MusicService for FakeService {
    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistSummary, ServiceError> {
        Ok(PlaylistSummary {
            id: playlist_id.to_string(),
            name: self.seed_name.clone(),
            owner: "me".to_string(),
            track_count: 0,
        })
    }

    async fn playlist_tracks_page(
        &self,
        _playlist_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<SeedTrack>, ServiceError> {
        page_of(Some(&self.seed_pages), cursor)
    }

    async fn artist_releases_page(
        &self,
        artist_id: &str,
        _kinds: &ReleaseKinds,
        _market: Option<&str>,
        cursor: Option<String>,
    ) -> Result<Page<ReleaseRef>, ServiceError> {
        self.listed_artists.lock().unwrap().push(artist_id.to_string());
        page_of(self.artist_pages.get(artist_id), cursor)
    }

    async fn release_tracks_page(
        &self,
        release_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<String>, ServiceError> {
        if cursor.is_none() {
            self.expanded.lock().unwrap().push(release_id.to_string());
        }
        if let Some(cancel) = &self.cancel_on_expand {
            cancel.cancel();
        }
        page_of(self.release_pages.get(release_id), cursor)
    }

    async fn current_user(&self) -> Result<String, ServiceError> {
        match &self.user_error {
            Some(e) => Err(e.clone()),
            None => Ok("user-1".to_string()),
        }
    }

    async fn create_playlist(&self, _user_id: &str, playlist: &NewPlaylist) -> Result<TargetPlaylist, ServiceError> {
        if let Some(e) = &self.create_error {
            return Err(e.clone());
        }
        self.created.lock().unwrap().push(playlist.clone());
        Ok(TargetPlaylist {
            id: "target".to_string(),
            external_url: "https://open.spotify.com/playlist/target".to_string(),
        })
    }

    async fn add_tracks(&self, _playlist_id: &str, track_ids: &[String]) -> Result<(), ServiceError> {
        assert!(track_ids.len() <= 100);
        let fail = self.add_failures.lock().unwrap().pop_front().unwrap_or(false);
        if fail {
            return Err(server_error());
        }
        self.added.lock().unwrap().push(track_ids.to_vec());
        Ok(())
    }

    async fn current_user_playlists_page(&self, _cursor: Option<String>) -> Result<Page<PlaylistSummary>, ServiceError> {
        Ok(Page::last(Vec::new()))
    }
}

fn request(weeks: u32) -> RunRequest {
    RunRequest::new("seed", weeks, Visibility::Public).unwrap()
}

fn pipeline(service: &FakeService) -> FreshPipeline<'_, FakeService> {
    FreshPipeline::new(service, PipelineSettings::default()).with_today(today())
}

/// Two artists, one old and two fresh releases, twelve fresh tracks.
fn two_artist_service() -> FakeService {
    FakeService::new(vec![vec![
        seed(&[("a", "Artist A")]),
        seed(&[("b", "Artist B")]),
        seed(&[("a", "Artist A")]),
    ]])
    .with_releases("a", vec![release("r1", &days_ago(3)), release("r-old", &days_ago(30))])
    .with_releases("b", vec![release("r2", &days_ago(2))])
    .with_tracks("r1", 5)
    .with_tracks("r-old", 4)
    .with_tracks("r2", 7)
}

#[tokio::test]
async fn builds_playlist_from_fresh_releases() {
    let service = two_artist_service();
    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(report.stats.input_track_count, 3);
    assert_eq!(report.stats.artist_count, 2);
    assert_eq!(report.stats.release_count, 2);
    assert_eq!(report.stats.output_track_count, 12);
    assert_eq!(report.stats.error_count, 0);
    assert!(report.is_complete());

    assert_eq!(service.expanded(), vec!["r1", "r2"]);
    assert_eq!(service.batch_sizes(), vec![12]);
    let mut expected = track_ids("r1", 5);
    expected.extend(track_ids("r2", 7));
    assert_eq!(service.added_ids(), expected);

    let created = service.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "FRESH: Seed");
    assert_eq!(created[0].description, "The freshest tracks from the artists in Seed");
    assert_eq!(created[0].visibility, Visibility::Public);
    assert_eq!(report.source_name, "Seed");
    assert_eq!(report.playlist.id, "target");
}

#[tokio::test]
async fn single_album_by_one_of_two_artists() {
    let service = FakeService::new(vec![vec![
        seed(&[("a1", "A")]),
        seed(&[("a1", "A")]),
        seed(&[("a1", "A"), ("b1", "B")]),
    ]])
    .with_releases("a1", vec![release("album", &days_ago(10))])
    .with_tracks("album", 12);

    let report = pipeline(&service).run(&request(2)).await.unwrap();

    assert_eq!(report.stats.input_track_count, 3);
    assert_eq!(report.stats.artist_count, 2);
    assert_eq!(report.stats.release_count, 1);
    assert_eq!(report.stats.output_track_count, 12);
    assert_eq!(report.stats.error_count, 0);
    assert_eq!(*service.listed_artists.lock().unwrap(), vec!["a1", "b1"]);
    assert_eq!(service.batch_sizes(), vec![12]);
    assert_eq!(service.added_ids(), track_ids("album", 12));
}

#[tokio::test]
async fn hundred_track_release_flushes_once() {
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![release("box-set", &days_ago(1))])
        .with_tracks("box-set", 100);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(service.batch_sizes(), vec![100]);
    assert_eq!(report.stats.output_track_count, 100);
}

#[tokio::test]
async fn private_request_creates_private_playlist() {
    let service = two_artist_service();
    let request = RunRequest::new("seed", 1, Visibility::Private).unwrap();
    pipeline(&service).run(&request).await.unwrap();

    let created = service.created.lock().unwrap().clone();
    assert_eq!(created[0].visibility, Visibility::Private);
}

#[tokio::test]
async fn co_credited_release_is_expanded_once() {
    let shared = release("shared", &days_ago(1));
    let service = FakeService::new(vec![vec![seed(&[("a", "A"), ("b", "B")])]])
        .with_releases("a", vec![shared.clone()])
        .with_releases("b", vec![shared])
        .with_tracks("shared", 4);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(service.expanded(), vec!["shared"]);
    assert_eq!(report.stats.release_count, 1);
    assert_eq!(report.stats.output_track_count, 4);
    assert_eq!(service.added_ids(), track_ids("shared", 4));
}

#[tokio::test]
async fn artists_are_deduplicated_across_seed_pages() {
    let service = FakeService::new(vec![
        vec![seed(&[("a", "A")]), seed(&[("b", "B"), ("a", "A")])],
        vec![seed(&[("c", "C")]), seed(&[("b", "B")])],
        vec![seed(&[("", "Local artist")])],
    ]);

    let collected = collect_artists(&service, "seed").await.unwrap();
    assert_eq!(collected.track_count, 5);
    let ids: Vec<&str> = collected.artists.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    let report = pipeline(&service).run(&request(1)).await.unwrap();
    assert_eq!(report.stats.artist_count, 3);
    assert_eq!(*service.listed_artists.lock().unwrap(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn window_boundary_is_strict() {
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases(
            "a",
            vec![
                release("eight-days", &days_ago(8)),
                release("seven-days", &days_ago(7)),
                release("six-days", &days_ago(6)),
                release("today", &days_ago(0)),
            ],
        )
        .with_tracks("eight-days", 1)
        .with_tracks("seven-days", 1)
        .with_tracks("six-days", 1)
        .with_tracks("today", 1);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(service.expanded(), vec!["six-days", "today"]);
    assert_eq!(report.stats.release_count, 2);
}

#[tokio::test]
async fn wider_window_includes_older_releases() {
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![release("r1", &days_ago(20)), release("r2", &days_ago(29))])
        .with_tracks("r1", 2)
        .with_tracks("r2", 2);

    let report = pipeline(&service).run(&request(4)).await.unwrap();
    assert_eq!(service.expanded(), vec!["r1"]);
    assert_eq!(report.stats.output_track_count, 2);
}

#[tokio::test]
async fn coarse_precision_dates_resolve_to_period_start() {
    let mut by_year = release("by-year", "2026");
    by_year.release_date = ReleaseDate::new("2026", DatePrecision::Year);
    let mut by_month = release("by-month", "2026-10");
    by_month.release_date = ReleaseDate::new("2026-10", DatePrecision::Month);

    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![by_year, by_month])
        .with_tracks("by-year", 1)
        .with_tracks("by-month", 1);

    // 2026-01-01 is before the cutoff, 2026-10-01 after it
    pipeline(&service).run(&request(4)).await.unwrap();
    assert_eq!(service.expanded(), vec!["by-month"]);

    // early January: the year date counts as fresh
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![{
            let mut r = release("by-year", "2026");
            r.release_date = ReleaseDate::new("2026", DatePrecision::Year);
            r
        }])
        .with_tracks("by-year", 1);
    FreshPipeline::new(&service, PipelineSettings::default())
        .with_today(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())
        .run(&request(1))
        .await
        .unwrap();
    assert_eq!(service.expanded(), vec!["by-year"]);
}

#[tokio::test]
async fn unrequested_release_kinds_are_ignored() {
    let mut compilation = release("comp", &days_ago(1));
    compilation.kind = ReleaseKind::Compilation;
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![compilation, release("album", &days_ago(1))])
        .with_tracks("comp", 3)
        .with_tracks("album", 2);

    let report = pipeline(&service).run(&request(1)).await.unwrap();
    assert_eq!(service.expanded(), vec!["album"]);
    assert_eq!(report.stats.output_track_count, 2);
}

#[tokio::test]
async fn failing_artist_is_skipped() {
    let service = FakeService::new(vec![vec![seed(&[("a", "A")]), seed(&[("b", "B")])]])
        .with_releases("a", vec![release("r1", &days_ago(1))])
        .with_release_pages("b", vec![Err(server_error())])
        .with_tracks("r1", 3);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(report.stats.output_track_count, 3);
    assert_eq!(report.stats.error_count, 1);
    assert!(!report.is_complete());
    assert!(matches!(
        &report.skipped[0],
        SkipEvent::Artist { artist_id, .. } if artist_id == "b"
    ));
}

#[tokio::test]
async fn artist_failing_mid_listing_contributes_nothing() {
    let service = FakeService::new(vec![vec![seed(&[("b", "B")]), seed(&[("c", "C")])]])
        .with_release_pages(
            "b",
            vec![Ok(vec![release("b1", &days_ago(1))]), Err(server_error())],
        )
        .with_releases("c", vec![release("b1", &days_ago(1))])
        .with_tracks("b1", 2);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    // b1 was not claimed by the failed artist, so C still gets it
    assert_eq!(service.expanded(), vec!["b1"]);
    assert_eq!(report.stats.output_track_count, 2);
    assert_eq!(report.stats.error_count, 1);
}

#[tokio::test]
async fn partial_release_keeps_tracks_read_before_failure() {
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![release("r1", &days_ago(1)), release("r2", &days_ago(1))])
        .with_track_pages("r1", vec![Ok(track_ids("r1", 2)), Err(server_error())])
        .with_tracks("r2", 1);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(report.stats.output_track_count, 3);
    assert_eq!(report.stats.error_count, 1);
    assert!(matches!(
        &report.skipped[0],
        SkipEvent::Release { release_id, tracks_kept: 2, .. } if release_id == "r1"
    ));
}

#[tokio::test]
async fn unreadable_release_date_is_recorded() {
    let mut broken = release("broken", "someday");
    broken.release_date = ReleaseDate::day("someday");
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![broken, release("ok", &days_ago(1))])
        .with_tracks("ok", 1);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(service.expanded(), vec!["ok"]);
    assert_eq!(report.stats.error_count, 1);
    assert!(matches!(&report.skipped[0], SkipEvent::ReleaseDate { release_id, .. } if release_id == "broken"));
}

#[tokio::test]
async fn co_credited_unreadable_release_is_recorded_once() {
    let broken = ReleaseRef {
        release_date: ReleaseDate::day("someday"),
        ..release("broken", "someday")
    };
    let service = FakeService::new(vec![vec![seed(&[("a", "A"), ("b", "B")])]])
        .with_releases("a", vec![broken.clone()])
        .with_releases("b", vec![broken]);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(report.stats.error_count, 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(service.expanded().is_empty());
}

#[tokio::test]
async fn seed_failure_is_fatal_and_creates_nothing() {
    let mut service = FakeService::new(vec![]);
    service.seed_pages = vec![Err(server_error())];

    let err = pipeline(&service).run(&request(1)).await.unwrap_err();

    assert!(matches!(err, FreshError::FatalFetch { .. }));
    assert!(service.created.lock().unwrap().is_empty());
    assert!(service.added.lock().unwrap().is_empty());
}

#[tokio::test]
async fn playlist_creation_failure_is_fatal() {
    let mut service = two_artist_service();
    service.create_error = Some(server_error());

    let err = pipeline(&service).run(&request(1)).await.unwrap_err();

    assert!(matches!(err, FreshError::FatalFetch { source: ServiceError::Status { status: 500, .. }, .. }));
    assert!(service.expanded().is_empty());
}

#[tokio::test]
async fn rejected_credential_is_invalid_input() {
    let mut service = two_artist_service();
    service.user_error = Some(ServiceError::Unauthorized("token expired".to_string()));

    let err = pipeline(&service).run(&request(1)).await.unwrap_err();

    assert!(matches!(err, FreshError::InvalidInput(_)));
    assert!(service.created.lock().unwrap().is_empty());
    assert!(service.listed_artists.lock().unwrap().is_empty());
}

#[test]
fn invalid_requests_are_rejected() {
    assert!(matches!(
        RunRequest::new("", 1, Visibility::Public),
        Err(FreshError::InvalidInput(_))
    ));
    assert!(matches!(
        RunRequest::new("seed", 0, Visibility::Public),
        Err(FreshError::InvalidInput(_))
    ));
    assert!(matches!(
        RunRequest::new("seed", 5, Visibility::Public),
        Err(FreshError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn cancellation_stops_expansion_and_flushes_buffer() {
    let cancel = CancellationState::new();
    let mut service = two_artist_service();
    service.cancel_on_expand = Some(cancel.clone());

    let report = pipeline(&service)
        .with_cancellation(cancel)
        .run(&request(1))
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(!report.is_complete());
    assert_eq!(service.expanded(), vec!["r1"]);
    assert_eq!(report.stats.output_track_count, 5);
    assert_eq!(service.added_ids(), track_ids("r1", 5));
}

#[tokio::test]
async fn cancelled_before_expansion_processes_no_artist() {
    let cancel = CancellationState::new();
    cancel.cancel();
    let service = two_artist_service();

    let report = pipeline(&service)
        .with_cancellation(cancel)
        .run(&request(1))
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(service.listed_artists.lock().unwrap().is_empty());
    assert_eq!(report.stats.output_track_count, 0);
}

#[tokio::test]
async fn dropped_batch_is_accounted() {
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![release("big", &days_ago(1))])
        .with_tracks("big", 150)
        .with_add_failures(&[true]);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(report.stats.output_track_count, 50);
    assert_eq!(report.stats.dropped_track_count, 100);
    assert_eq!(report.stats.error_count, 1);
    assert!(matches!(
        report.skipped[0],
        SkipEvent::Batch { track_count: 100, attempts: 1, .. }
    ));
    assert_eq!(service.batch_sizes(), vec![50]);
}

#[tokio::test]
async fn batch_retry_policy_recovers() {
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![release("r1", &days_ago(1))])
        .with_tracks("r1", 10)
        .with_add_failures(&[true]);
    let settings = PipelineSettings {
        batch_policy: BatchPolicy { retries: 1 },
        ..PipelineSettings::default()
    };

    let report = FreshPipeline::new(&service, settings)
        .with_today(today())
        .run(&request(1))
        .await
        .unwrap();

    assert_eq!(report.stats.output_track_count, 10);
    assert_eq!(report.stats.error_count, 0);
}

#[tokio::test]
async fn large_runs_are_sent_in_batches_of_at_most_100() {
    let service = FakeService::new(vec![vec![seed(&[("a", "A")])]])
        .with_releases("a", vec![release("r1", &days_ago(1)), release("r2", &days_ago(2))])
        .with_tracks("r1", 120)
        .with_tracks("r2", 130);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(service.batch_sizes(), vec![100, 100, 50]);
    assert_eq!(report.stats.output_track_count, 250);
}

#[tokio::test]
async fn empty_seed_creates_empty_playlist() {
    let service = FakeService::new(vec![vec![]]);

    let report = pipeline(&service).run(&request(1)).await.unwrap();

    assert_eq!(report.stats.artist_count, 0);
    assert_eq!(report.stats.output_track_count, 0);
    assert_eq!(service.created.lock().unwrap().len(), 1);
    assert!(service.added.lock().unwrap().is_empty());
}

#[tokio::test]
async fn runs_are_independent() {
    let service = two_artist_service();
    let pipeline = pipeline(&service);

    let first = pipeline.run(&request(1)).await.unwrap();
    let second = pipeline.run(&request(1)).await.unwrap();

    assert_eq!(first.stats.output_track_count, 12);
    assert_eq!(second.stats.output_track_count, 12);
    assert_eq!(service.expanded(), vec!["r1", "r2", "r1", "r2"]);
}

#[derive(Default)]
struct PhaseRecorder {
    phases: Mutex<Vec<RunPhase>>,
    artists: Mutex<Vec<(String, usize, usize)>>,
    sent: Mutex<usize>,
}

impl RunObserver for PhaseRecorder {
    fn phase(&self, phase: RunPhase) {
        self.phases.lock().unwrap().push(phase);
    }

    fn artist_started(&self, artist: &ArtistRef, position: usize, total: usize) {
        self.artists.lock().unwrap().push((artist.id.clone(), position, total));
    }

    fn tracks_sent(&self, count: usize) {
        *self.sent.lock().unwrap() += count;
    }
}

#[tokio::test]
async fn observer_sees_phases_in_order() {
    let service = two_artist_service();
    let recorder = PhaseRecorder::default();

    pipeline(&service)
        .with_observer(&recorder)
        .run(&request(1))
        .await
        .unwrap();

    assert_eq!(
        *recorder.phases.lock().unwrap(),
        vec![
            RunPhase::Init,
            RunPhase::CollectArtists,
            RunPhase::CreatePlaylist,
            RunPhase::ExpandArtists,
            RunPhase::FinalFlush,
            RunPhase::Done,
        ]
    );
    assert_eq!(
        *recorder.artists.lock().unwrap(),
        vec![("a".to_string(), 1, 2), ("b".to_string(), 2, 2)]
    );
    assert_eq!(*recorder.sent.lock().unwrap(), 12);
}

#[tokio::test]
async fn observer_sees_failed_phase() {
    let mut service = FakeService::new(vec![]);
    service.seed_pages = vec![Err(server_error())];
    let recorder = PhaseRecorder::default();

    let result = pipeline(&service).with_observer(&recorder).run(&request(1)).await;

    assert!(result.is_err());
    assert_eq!(recorder.phases.lock().unwrap().last(), Some(&RunPhase::Failed));
}

#[tokio::test]
async fn paginator_walks_seed_pages_lazily() {
    let service = FakeService::new(vec![
        vec![seed(&[("a", "A")])],
        vec![seed(&[("b", "B")])],
    ]);
    let mut pages = Paginator::new(|cursor| service.playlist_tracks_page("seed", cursor));

    assert!(pages.next().await.unwrap().is_some());
    assert_eq!(pages.pages_fetched(), 1);
    assert!(pages.next().await.unwrap().is_some());
    assert!(pages.next().await.unwrap().is_none());
    assert_eq!(pages.pages_fetched(), 2);
}
