//! Error taxonomy for an ingest run
//!
//! Record-level failures ([`ParseError`]) are isolated to the record that
//! produced them. Fetch and persistence failures abort the whole run and are
//! folded into [`RunError`].

/// Failure talking to the YouTube Data API
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A published timestamp that is not of the exact shape `YYYY-MM-DDTHH:MM:SSZ`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid published timestamp {raw:?}: {reason}")]
pub struct ParseError {
    pub raw: String,
    pub reason: String,
}

/// A database failure, tagged with the operation that hit it
#[derive(Debug, thiserror::Error)]
#[error("database error during {operation}: {source}")]
pub struct PersistenceError {
    pub operation: &'static str,
    #[source]
    pub source: sqlx::Error,
}

impl PersistenceError {
    pub fn new(operation: &'static str, source: sqlx::Error) -> Self {
        Self { operation, source }
    }
}

/// Missing or unparseable environment configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors that abort a run. Anything here means nothing was committed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Extension trait for logging an error with context before propagating it
pub trait LogErr<T, E> {
    fn log_err(self, context: &str) -> Result<T, E>;
}

impl<T, E: std::fmt::Display> LogErr<T, E> for Result<T, E> {
    fn log_err(self, context: &str) -> Result<T, E> {
        self.inspect_err(|e| tracing::error!("{}: {}", context, e))
    }
}
