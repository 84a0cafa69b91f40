//! Configuration management for the MusicGPT server.
//!
//! This module handles loading configuration values from environment variables
//! and `.env` files. All settings are read once at startup into a [`Settings`]
//! value that is shared with every request handler.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory, then in the working directory
//! 3. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use reqwest::Url;
use thiserror::Error;

use crate::warning;

pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_PLAYLIST_URL: &str = "https://open.spotify.com/playlist/";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Loads environment variables from a `.env` file.
///
/// Looks for `musicgpt/.env` in the platform-specific local data directory
/// first and falls back to a `.env` in the working directory. Neither file is
/// required: a deployment may provide every variable through the real
/// environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/musicgpt/.env`
/// - macOS: `~/Library/Application Support/musicgpt/.env`
/// - Windows: `%LOCALAPPDATA%/musicgpt/.env`
///
/// # Errors
///
/// Returns an error if an existing `.env` file cannot be parsed. A data
/// directory that cannot be created is skipped with a warning.
pub async fn load_env() -> Result<(), String> {
    let data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    load_env_in(data_dir).await
}

/// Same as [`load_env`] with an explicit data directory.
pub async fn load_env_in(data_dir: PathBuf) -> Result<(), String> {
    let app_dir = data_dir.join("musicgpt");
    let path = app_dir.join(".env");

    match async_fs::create_dir_all(&app_dir).await {
        Ok(()) if path.is_file() => {
            dotenv::from_path(&path).map_err(|e| e.to_string())?;
            return Ok(());
        }
        Ok(()) => {}
        Err(e) => warning!("Cannot create {}, skipping it. Err: {}", app_dir.display(), e),
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Runtime settings for the server and its upstream clients.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API key for the chat-completion endpoint.
    pub completion_api_key: String,
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix.
    pub completion_url: String,
    pub completion_model: String,
    /// Secret used to sign the OAuth `state` parameter.
    pub app_secret_key: String,
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered in the Spotify dashboard exactly.
    pub redirect_uri: String,
    pub spotify_auth_url: Url,
    pub spotify_token_url: String,
    pub spotify_api_url: String,
    pub playlist_base_url: String,
    pub server_address: SocketAddr,
    pub request_timeout: Duration,
    pub image_poll_attempts: u32,
    pub image_poll_delay: Duration,
    /// Also build a playlist from the user's top tracks when they ask for them.
    pub top_tracks_playlist: bool,
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for an unset required variable and
    /// [`ConfigError::Invalid`] for a value that does not parse.
    ///
    /// # Example
    ///
    /// ```
    /// let settings = Settings::from_env()?;
    /// println!("listening on {}", settings.server_address);
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            completion_api_key: required("OPENAI_APIKEY")?,
            completion_url: trim_slash(optional("OPENAI_API_URL", DEFAULT_COMPLETION_URL)),
            completion_model: optional("OPENAI_MODEL", DEFAULT_COMPLETION_MODEL),
            app_secret_key: required("APP_SECRETKEY")?,
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            redirect_uri: required("REDIRECT_URI")?,
            spotify_auth_url: parse(
                "SPOTIFY_API_AUTH_URL",
                optional("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            )?,
            spotify_token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            spotify_api_url: trim_slash(optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)),
            playlist_base_url: optional("SPOTIFY_PLAYLIST_URL", DEFAULT_PLAYLIST_URL),
            server_address: parse(
                "SERVER_ADDRESS",
                optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            )?,
            request_timeout: Duration::from_secs(parse(
                "REQUEST_TIMEOUT_SECS",
                optional("REQUEST_TIMEOUT_SECS", "30"),
            )?),
            image_poll_attempts: parse(
                "IMAGE_POLL_ATTEMPTS",
                optional("IMAGE_POLL_ATTEMPTS", "5"),
            )?,
            image_poll_delay: Duration::from_millis(parse(
                "IMAGE_POLL_DELAY_MS",
                optional("IMAGE_POLL_DELAY_MS", "500"),
            )?),
            top_tracks_playlist: parse(
                "TOP_TRACKS_PLAYLIST",
                optional("TOP_TRACKS_PLAYLIST", "true"),
            )?,
        })
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
