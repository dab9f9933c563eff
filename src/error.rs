use thiserror::Error;

/// Errors raised by a single call against the music service.
///
/// Every variant carries owned strings so that failures can be cloned into
/// skip records and compared in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Connection failures, DNS errors and other transport issues.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Rate limited and the retry budget is spent (or the wait is unreasonable).
    #[error("rate limited, retry after {retry_after} seconds")]
    RateLimit { retry_after: u64 },

    /// The credential is missing, expired or was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ServiceError::Timeout(err.to_string());
        }
        if err.is_decode() {
            return ServiceError::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return ServiceError::Unauthorized(err.to_string());
            }
            return ServiceError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        ServiceError::Http(err.to_string())
    }
}

/// Errors of the OAuth PKCE flow and token refresh.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token response is missing `{0}`")]
    MissingField(&'static str),

    #[error("state mismatch in OAuth callback")]
    StateMismatch,

    #[error("authentication timed out after {0} seconds")]
    TimedOut(u64),

    #[error("callback server failed: {0}")]
    Server(String),

    #[error("invalid authorization URL: {0}")]
    Url(String),
}

/// Errors while reading configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },

    #[error("cannot prepare config directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read .env file: {0}")]
    Dotenv(String),
}

/// Errors that stop a fresh-playlist run.
///
/// Everything else that can go wrong during a run is absorbed and recorded as
/// a [`SkipEvent`](crate::pipeline::SkipEvent).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FreshError {
    /// Rejected before any side effect happened.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A load-bearing fetch failed (seed playlist, target playlist creation).
    #[error("{context}: {source}")]
    FatalFetch {
        context: String,
        #[source]
        source: ServiceError,
    },
}
