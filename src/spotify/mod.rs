//! # Spotify Integration Module
//!
//! Clients for the two Spotify services the server talks to:
//!
//! - [`auth`] - Accounts service: authorization URL, code exchange and token
//!   refresh for the authorization code grant.
//! - [`SpotifyApi`] - Web API calls used while building a playlist. The
//!   endpoints are split by concern across [`user`], [`search`] and
//!   [`playlist`].
//!
//! ## API Coverage
//!
//! - `GET /me` - Current user profile
//! - `GET /me/top/tracks` - User's top tracks
//! - `GET /search` - Track search
//! - `POST /users/{user_id}/playlists` - Create new playlists
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks to playlists
//! - `GET /playlists/{playlist_id}/images` - Playlist cover image
//!
//! Every Web API call takes the bearer token explicitly. Callers obtain it
//! from [`crate::management::SessionManager::access_token`], which refuses
//! absent, foreign or expired tokens before any request leaves the process.
//!
//! Non-success responses become [`crate::error::AppError::Upstream`] with the
//! raw Spotify error payload.

pub mod auth;
pub mod playlist;
pub mod search;
pub mod user;

use reqwest::Client;

pub(crate) const SERVICE: &str = "spotify";

/// Bearer-authenticated client for the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyApi {
    http: Client,
    api_url: String,
}

impl SpotifyApi {
    pub fn new(http: Client, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
