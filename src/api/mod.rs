//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that runs while the
//! user authorizes freshlist in the browser.
//!
//! ## Endpoints
//!
//! - [`callback`] - OAuth 2.0 PKCE redirect target. Checks the `state`
//!   parameter, exchanges the authorization code for a token and hands the
//!   token back to the waiting auth flow.
//! - [`health`] - Returns status and version, useful to check that the
//!   configured `SERVER_ADDRESS` is reachable.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use freshlist::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
