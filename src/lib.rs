//! freshlist library
//!
//! Builds a "fresh" Spotify playlist from a seed playlist: every artist on the
//! seed contributes the tracks of its releases from the last few weeks.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cancel` - cooperative cancellation of a running pipeline
//! - `cli` - command implementations behind the `freshlist` binary
//! - `config` - `.env` loading and typed settings
//! - `error` - error types shared across the crate
//! - `management` - access token lifetime and refresh
//! - `pipeline` - the fresh playlist pipeline and its building blocks
//! - `server` - local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client behind the `MusicService` trait
//! - `types` - domain and wire data structures
//! - `utils` - parsing helpers and PKCE primitives
//!
//! # Example
//!
//! ```ignore
//! use freshlist::{config, pipeline::{FreshPipeline, PipelineSettings, RunRequest}};
//!
//! let request = RunRequest::new("37i9dQZF1DXcBWIGoYBM5M", 2, Visibility::Public)?;
//! let report = FreshPipeline::new(&client, PipelineSettings::default())
//!     .run(&request)
//!     .await?;
//! println!("added {} tracks", report.stats.output_track_count);
//! ```

pub mod api;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Boxed-error result for CLI glue code; library modules return their own
/// error types from [`error`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints `[o] message` with a blue marker.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints `[✓] message` with a green marker.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints `[!] message` in red and exits with status 1.
///
/// Evaluates to `!`, so it can end a `match` arm that must produce a value:
///
/// ```ignore
/// let settings = match Settings::from_env() {
///     Ok(settings) => settings,
///     Err(e) => error!("Invalid configuration: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints `[!] message` with a yellow marker; execution continues.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
