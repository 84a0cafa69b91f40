//! MusicGPT chat server library
//!
//! This library turns free-text chat messages into Spotify playlists. A
//! chat-completion model decides whether a message asks for recommendations
//! or for the user's top tracks, proposes songs as strict JSON, and the
//! Spotify Web API is used to build a playlist from those songs.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the web routes
//! - `chat` - Orchestration of a single chat turn
//! - `completion` - Chat-completion client, intent classifier and prompt builder
//! - `config` - Configuration management and environment variables
//! - `error` - Request error type and its HTTP mapping
//! - `management` - Session token storage
//! - `playlist` - Playlist assembly from a parsed song list
//! - `server` - Application state, router and server startup
//! - `spotify` - Spotify accounts and Web API clients
//! - `types` - Data structures and wire types
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use musicgpt::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> musicgpt::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     let addr = settings.server_address;
//!     server::start_api_server(server::AppState::new(settings)?, addr).await
//! }
//! ```

pub mod api;
pub mod chat;
pub mod completion;
pub mod config;
pub mod error;
pub mod management;
pub mod playlist;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for startup plumbing.
///
/// Request handling uses [`error::AppError`]; this alias covers the places
/// where any error is simply reported and the process stops.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Creating playlist for {}", user_id);
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
/// success!("Added {} tracks", count);
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
/// Only meant for startup failures in `main`. Request handlers return
/// [`error::AppError`] instead.
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
/// Used for recoverable anomalies such as skipped songs or a missing cover
/// image.
///
/// # Example
///
/// ```
/// warning!("No search result for {}", query);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
