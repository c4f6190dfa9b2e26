//! Configuration management for the chart playlist app.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file. Variable names follow the ones the app has always used
//! (`FLASK_SECRET_KEY`, `SPOTIPY_*`, `PORT`) so existing deployments keep
//! working.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory, then in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{error::ConfigError, warning};

pub const DEFAULT_SECRET_KEY: &str = "default-secret-key";
pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_CHART_BASE_URL: &str = "https://www.billboard.com/charts/hot-100";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const SPOTIFY_SCOPE: &str = "playlist-modify-private";

/// Loads environment variables from a `.env` file.
///
/// Looks in the working directory first and falls back to
/// `<data_local_dir>/chartlist/.env`:
/// - Linux: `~/.local/share/chartlist/.env`
/// - macOS: `~/Library/Application Support/chartlist/.env`
/// - Windows: `%LOCALAPPDATA%/chartlist/.env`
///
/// A missing file is fine, variables may come straight from the environment.
/// Values already present in the environment are never overwritten.
pub fn load_env() {
    if dotenv::dotenv().is_ok() {
        return;
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("chartlist/.env");
    let _ = dotenv::from_path(path);
}

/// Runtime settings gathered once at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub secret_key: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub port: u16,
    pub chart_base_url: String,
    pub spotify_api_url: String,
    pub spotify_accounts_url: String,
}

impl Settings {
    /// Reads every setting from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when one of the Spotify credentials
    /// is absent and [`ConfigError::InvalidPort`] when `PORT` is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: secret_key(),
            client_id: spotify_client_id()?,
            client_secret: spotify_client_secret()?,
            redirect_uri: spotify_redirect_uri()?,
            port: port()?,
            chart_base_url: chart_base_url(),
            spotify_api_url: spotify_api_url(),
            spotify_accounts_url: spotify_accounts_url(),
        })
    }

    /// Address the HTTP server binds to.
    pub fn server_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Returns the key used to sign session cookies.
///
/// Falls back to an insecure default when `FLASK_SECRET_KEY` is unset and
/// warns about it.
pub fn secret_key() -> String {
    match env::var("FLASK_SECRET_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            warning!("FLASK_SECRET_KEY is not set, session cookies use an insecure default key");
            DEFAULT_SECRET_KEY.to_string()
        }
    }
}

/// Returns the Spotify API client ID (`SPOTIPY_CLIENT_ID`).
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIPY_CLIENT_ID")
}

/// Returns the Spotify API client secret (`SPOTIPY_CLIENT_SECRET`).
///
/// The client secret should be kept confidential and never exposed in logs.
pub fn spotify_client_secret() -> Result<String, ConfigError> {
    required("SPOTIPY_CLIENT_SECRET")
}

/// Returns the OAuth redirect URI (`SPOTIPY_REDIRECT_URI`).
///
/// Must match the redirect URI registered for the Spotify application and
/// point at this server's `/callback` route.
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIPY_REDIRECT_URI")
}

/// Returns the listen port, `10000` when `PORT` is unset.
pub fn port() -> Result<u16, ConfigError> {
    match env::var("PORT") {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(value)),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

/// Returns the base URL of the date-scoped chart pages.
pub fn chart_base_url() -> String {
    optional("CHART_BASE_URL", DEFAULT_CHART_BASE_URL)
}

/// Returns the Spotify Web API base URL.
pub fn spotify_api_url() -> String {
    optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

/// Returns the Spotify accounts service base URL (authorize and token).
pub fn spotify_accounts_url() -> String {
    optional("SPOTIFY_ACCOUNTS_URL", DEFAULT_SPOTIFY_ACCOUNTS_URL)
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}
