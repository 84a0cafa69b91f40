use std::time::Duration;

use tokio::time::sleep;

use crate::{
    error::{AppError, ensure_success},
    info,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, Image,
    },
};

use super::{SERVICE, SpotifyApi};

/// Bounded exponential backoff for the cover image, which Spotify renders
/// asynchronously after tracks are added.
#[derive(Debug, Clone, Copy)]
pub struct ImagePolling {
    pub attempts: u32,
    pub initial_delay: Duration,
}

impl SpotifyApi {
    /// Creates a playlist owned by `user_id`.
    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, AppError> {
        let response = self
            .http
            .post(self.url(&format!("users/{user_id}/playlists")))
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(AppError::transport(SERVICE))?;

        ensure_success(SERVICE, response)
            .await?
            .json::<CreatePlaylistResponse>()
            .await
            .map_err(AppError::transport(SERVICE))
    }

    /// Adds all `uris` to the playlist in one call, keeping their order.
    pub async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: Vec<String>,
    ) -> Result<AddTrackToPlaylistResponse, AppError> {
        let response = self
            .http
            .post(self.url(&format!("playlists/{playlist_id}/tracks")))
            .bearer_auth(token)
            .json(&AddTrackToPlaylistRequest { uris })
            .send()
            .await
            .map_err(AppError::transport(SERVICE))?;

        ensure_success(SERVICE, response)
            .await?
            .json::<AddTrackToPlaylistResponse>()
            .await
            .map_err(AppError::transport(SERVICE))
    }

    /// Current cover images of a playlist. Spotify answers `null` until a
    /// cover exists, which is returned as an empty list.
    pub async fn playlist_images(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<Vec<Image>, AppError> {
        let response = self
            .http
            .get(self.url(&format!("playlists/{playlist_id}/images")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(AppError::transport(SERVICE))?;

        let images = ensure_success(SERVICE, response)
            .await?
            .json::<Option<Vec<Image>>>()
            .await
            .map_err(AppError::transport(SERVICE))?;

        Ok(images.unwrap_or_default())
    }

    /// Polls the playlist images until one shows up or the attempts run out.
    ///
    /// Waits before every attempt, doubling the delay after each empty reply.
    /// Returns `Ok(None)` when no image appeared in time.
    pub async fn wait_for_cover_image(
        &self,
        token: &str,
        playlist_id: &str,
        polling: ImagePolling,
    ) -> Result<Option<String>, AppError> {
        let mut delay = polling.initial_delay;

        for attempt in 1..=polling.attempts {
            sleep(delay).await;

            let images = self.playlist_images(token, playlist_id).await?;
            if let Some(image) = images.into_iter().next() {
                return Ok(Some(image.url));
            }

            info!(
                "Cover image for playlist {} not ready (attempt {}/{})",
                playlist_id, attempt, polling.attempts
            );
            delay = delay.saturating_mul(2);
        }

        Ok(None)
    }
}
