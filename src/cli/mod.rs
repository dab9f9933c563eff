//! # CLI Module
//!
//! Command implementations behind the `freshlist` binary. Each command loads
//! settings, authorizes through the PKCE flow, and then talks to Spotify
//! through [`SpotifyClient`](crate::spotify::SpotifyClient).
//!
//! ## Commands
//!
//! - [`fresh`] - builds the fresh playlist for a seed playlist and prints the
//!   run report
//! - [`playlists`] - lists the current user's playlists, to find a seed
//!
//! ## Output
//!
//! User-facing lines go through the crate's `info!`, `success!`, `warning!`
//! and `error!` macros; `error!` exits with status 1. Long operations show an
//! `indicatif` spinner and results print as `tabled` tables.
//!
//! ## Usage
//!
//! ```bash
//! freshlist playlists --search indie
//! freshlist fresh --playlist 37i9dQZF1DXcBWIGoYBM5M --weeks 2
//! freshlist fresh --playlist https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M --private
//! ```

mod auth;
mod fresh;
mod playlists;
mod progress;

pub use fresh::{FreshOptions, fresh};
pub use playlists::playlists;
