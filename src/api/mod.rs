//! # API Module
//!
//! HTTP handlers for the MusicGPT web routes. Each handler receives the
//! shared [`crate::server::AppState`] through axum state.
//!
//! ## Endpoints
//!
//! - [`index`] - `GET /`, landing page with the login link
//! - [`login`] - `GET /login`, redirect to the Spotify consent page
//! - [`callback`] - `GET /callback`, authorization code exchange
//! - [`refresh_token`] - `GET /refresh-token`, renews an expired access token
//! - [`chat`] - `POST /get`, one chat turn
//! - [`health`] - `GET /health`, status and version for monitoring
//!
//! The session belongs to the browser that logged in, identified by a signed
//! cookie (see [`cookies`]). Authentication failures are answered with
//! redirects: `/login` when the caller has no session and `/refresh-token`
//! when its access token has expired.

mod callback;
mod chat;
pub mod cookies;
mod health;
mod index;
mod login;
mod refresh;

pub use callback::callback;
pub use chat::chat;
pub use health::health;
pub use index::index;
pub use login::login;
pub use refresh::refresh_token;

/// Chat page served once the user is authenticated.
pub const CHAT_PAGE: &str = include_str!("../../assets/chat.html");
