use chrono::NaiveDate;
use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use freshlist::{
    cli, config,
    pipeline::MIN_WEEKS,
    types::ReleaseKinds,
    utils, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print debug logs
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a playlist of fresh releases by the artists of a seed playlist
    Fresh(FreshOptions),

    /// List your playlists
    Playlists(PlaylistsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct FreshOptions {
    /// Seed playlist as id, spotify:playlist: URI or open.spotify.com URL
    #[clap(long)]
    pub playlist: String,

    /// Recency window in weeks, 1 to 4
    #[clap(long, default_value_t = MIN_WEEKS)]
    pub weeks: u32,

    /// Create the playlist as private
    #[clap(long)]
    pub private: bool,

    /// Release types to include, comma separated (album, single, compilation, appears_on)
    #[clap(long = "type", default_value = "album,single", value_parser = utils::parse_release_kinds)]
    pub kinds: ReleaseKinds,

    /// Measure the window from this day (YYYY-MM-DD) instead of today
    #[clap(long, value_parser = utils::parse_date)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Only show playlists whose name contains this text
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if let Err(e) = config::load_env().await {
        warning!("Cannot load {}. Err: {}", config::env_path().display(), e);
    }

    match cli.command {
        Command::Fresh(opt) => {
            cli::fresh(cli::FreshOptions {
                playlist: opt.playlist,
                weeks: opt.weeks,
                private: opt.private,
                kinds: opt.kinds,
                as_of: opt.as_of,
            })
            .await
        }
        Command::Playlists(opt) => cli::playlists(opt.search).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
