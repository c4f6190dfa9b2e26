use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
}

/// A submitted date that is not a `YYYY-MM-DD` calendar date.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid date in YYYY-MM-DD format.")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("chart page answered with status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Identity(String),
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("no Spotify token in session")]
    MissingToken,
}

/// A single title lookup failed. The builder logs it and skips the title.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SearchError(pub String);

#[derive(Debug, Error)]
pub enum CatalogWriteError {
    #[error("{0}")]
    Request(String),
    #[error("Spotify rejected the request with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Why a playlist could not be built for a chart date.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No songs found for this date")]
    NoSongsFound,
    #[error("Error creating playlist: {0}")]
    Fetch(#[from] FetchError),
    #[error("Spotify authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("No songs could be found on Spotify")]
    NoMatches,
    #[error("Error creating playlist: {0}")]
    CatalogWrite(#[from] CatalogWriteError),
}
