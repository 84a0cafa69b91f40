use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use reqwest::Client;

use crate::{
    Res,
    api::{self, cookies},
    completion::CompletionClient,
    config::Settings,
    error::AppError,
    management::SessionManager,
    playlist::PlaylistAssembler,
    spotify::{SpotifyApi, auth::OAuthClient, playlist::ImagePolling},
};

/// Everything a request handler needs, cloned into each request by axum.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    /// Signs the session and OAuth state cookies.
    pub cookie_key: Key,
    pub session: SessionManager,
    pub oauth: OAuthClient,
    pub spotify: SpotifyApi,
    pub completion: CompletionClient,
    pub assembler: PlaylistAssembler,
}

impl AppState {
    /// Builds the upstream clients over one shared HTTP client whose request
    /// timeout comes from the settings.
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(AppError::transport("http client"))?;

        let spotify = SpotifyApi::new(http.clone(), settings.spotify_api_url.clone());
        let assembler = PlaylistAssembler::new(
            spotify.clone(),
            settings.playlist_base_url.clone(),
            ImagePolling {
                attempts: settings.image_poll_attempts,
                initial_delay: settings.image_poll_delay,
            },
        );

        Ok(Self {
            cookie_key: cookies::signing_key(&settings.app_secret_key),
            session: SessionManager::new(),
            oauth: OAuthClient::new(http.clone(), &settings),
            completion: CompletionClient::new(http, &settings),
            spotify,
            assembler,
            settings: Arc::new(settings),
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/refresh-token", get(api::refresh_token))
        .route("/get", post(api::chat))
        .with_state(state)
}

pub async fn start_api_server(state: AppState, addr: SocketAddr) -> Res<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
