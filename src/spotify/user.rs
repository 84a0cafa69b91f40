use crate::{
    error::{AppError, ensure_success},
    types::{CurrentUser, TopTracksResponse, Track},
};

use super::{SERVICE, SpotifyApi};

pub const TOP_TRACKS_TIME_RANGE: &str = "medium_term";
pub const TOP_TRACKS_LIMIT: u32 = 10;

impl SpotifyApi {
    /// Looks up the Spotify user id that owns the token.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token for Spotify API authentication
    ///
    /// # Returns
    ///
    /// - `Ok(String)` - The `id` field of `GET /me`
    /// - `Err(AppError::Upstream)` - Spotify's status and error payload, e.g.
    ///   `401` for a revoked token
    /// - `Err(AppError::Transport)` - Network or decoding failure
    pub async fn current_user_id(&self, token: &str) -> Result<String, AppError> {
        let response = self
            .http
            .get(self.url("me"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(AppError::transport(SERVICE))?;

        let user = ensure_success(SERVICE, response)
            .await?
            .json::<CurrentUser>()
            .await
            .map_err(AppError::transport(SERVICE))?;

        Ok(user.id)
    }

    /// Retrieves the user's medium-term top tracks, at most ten, without paging.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token with the `user-top-read` scope
    ///
    /// # Returns
    ///
    /// The tracks in Spotify's ranking order. An account without listening
    /// history yields an empty list.
    ///
    /// # Example
    ///
    /// ```
    /// let tracks = spotify.top_tracks(&token).await?;
    /// println!("{}", utils::format_top_tracks(&tracks));
    /// ```
    pub async fn top_tracks(&self, token: &str) -> Result<Vec<Track>, AppError> {
        let response = self
            .http
            .get(self.url("me/top/tracks"))
            .bearer_auth(token)
            .query(&[
                ("time_range", TOP_TRACKS_TIME_RANGE.to_string()),
                ("limit", TOP_TRACKS_LIMIT.to_string()),
            ])
            .send()
            .await
            .map_err(AppError::transport(SERVICE))?;

        let top = ensure_success(SERVICE, response)
            .await?
            .json::<TopTracksResponse>()
            .await
            .map_err(AppError::transport(SERVICE))?;

        Ok(top.items)
    }
}
