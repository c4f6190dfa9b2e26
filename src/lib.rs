//! Billboard chart to Spotify playlist web app.
//!
//! Scrapes the Billboard Hot 100 for a given date, looks each title up in the
//! Spotify catalog and stores the matches in a new private playlist owned by
//! the signed-in user. A two-route web form drives the whole pipeline.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the form, the OAuth callback and health checks
//! - `builder` - The fetch, match and create pipeline
//! - `chart` - Billboard chart page fetching and title extraction
//! - `config` - Configuration management and environment variables
//! - `error` - Typed errors for every stage of the pipeline
//! - `management` - Per-session credential and flash message storage
//! - `server` - Router assembly and the HTTP listener
//! - `spotify` - Spotify Web API client and OAuth helpers
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use chartlist::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> chartlist::Res<()> {
//!     config::load_env();
//!     let settings = config::Settings::from_env()?;
//!     server::start_server(settings).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod builder;
pub mod chart;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so it can
/// cross await points in the server.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist created: {}", url);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for start-up failures. Request handlers report problems with
/// [`warning!`] and keep serving.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Error searching for song {}: {}", title, e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
