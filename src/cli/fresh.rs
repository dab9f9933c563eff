use chrono::NaiveDate;
use tabled::Table;

use crate::{
    Res,
    cancel::CancellationState,
    cli::{
        auth::{connect, load_settings},
        progress::SpinnerObserver,
    },
    config::Settings,
    error, info,
    pipeline::{BatchPolicy, FreshPipeline, PipelineSettings, RunReport, RunRequest},
    success,
    types::{ReleaseKinds, Visibility},
    warning,
};

#[derive(Debug, Clone)]
pub struct FreshOptions {
    pub playlist: String,
    pub weeks: u32,
    pub private: bool,
    pub kinds: ReleaseKinds,
    pub as_of: Option<NaiveDate>,
}

pub async fn fresh(options: FreshOptions) {
    let settings = load_settings();

    let visibility = if options.private {
        Visibility::Private
    } else {
        Visibility::Public
    };
    // validate before opening the browser
    let request = match RunRequest::new(&options.playlist, options.weeks, visibility) {
        Ok(request) => request,
        Err(e) => error!("{}", e),
    };

    match run(&settings, &options, &request).await {
        Ok(report) => print_report(&report),
        Err(e) => error!("Cannot build the fresh playlist. Err: {}", e),
    }
}

async fn run(settings: &Settings, options: &FreshOptions, request: &RunRequest) -> Res<RunReport> {
    let client = connect(settings).await;

    let pipeline_settings = PipelineSettings {
        batch_policy: BatchPolicy {
            retries: settings.batch_retries,
        },
        kinds: options.kinds.clone(),
        market: settings.spotify.market.clone(),
        ..PipelineSettings::default()
    };

    let cancel = CancellationState::new();
    let on_signal = cancel.clone();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warning!("Cancelling, buffered tracks will still be added...");
            on_signal.cancel();
        }
    });

    let observer = SpinnerObserver::new();
    let mut pipeline = FreshPipeline::new(&client, pipeline_settings)
        .with_cancellation(cancel)
        .with_observer(&observer);
    if let Some(day) = options.as_of {
        pipeline = pipeline.with_today(day);
    }

    info!(
        "Collecting {} releases of the last {} week(s)",
        options.kinds,
        request.window.weeks()
    );
    let result = pipeline.run(request).await;
    observer.finish();
    signal.abort();

    Ok(result?)
}

fn print_report(report: &RunReport) {
    println!("{}", Table::new(report.table_rows()));

    if report.cancelled {
        warning!("The run was cancelled; the playlist holds what was found until then");
    }
    if !report.skipped.is_empty() {
        warning!(
            "{} item(s) were skipped, run with --verbose for details",
            report.skipped.len()
        );
    }

    success!(
        "Added {} tracks to {}",
        report.stats.output_track_count,
        report.playlist.external_url
    );
}
