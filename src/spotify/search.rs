use crate::{
    error::{AppError, ensure_success},
    types::{SearchResponse, Track},
};

use super::{SERVICE, SpotifyApi};

impl SpotifyApi {
    /// Returns the best track match for a free-text query, if any.
    ///
    /// Searches tracks only and asks for a single result.
    ///
    /// # Arguments
    ///
    /// * `token` - Valid access token for Spotify API authentication
    /// * `query` - Free text, usually built with [`crate::utils::search_query`]
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Track))` - The first match
    /// - `Ok(None)` - Spotify found nothing; callers skip the song
    /// - `Err(AppError)` - Upstream or transport failure
    ///
    /// # Example
    ///
    /// ```
    /// let query = utils::search_query("Japanese Denim", "Daniel Caesar");
    /// if let Some(track) = spotify.search_track(&token, &query).await? {
    ///     uris.push(track.uri());
    /// }
    /// ```
    pub async fn search_track(&self, token: &str, query: &str) -> Result<Option<Track>, AppError> {
        let response = self
            .http
            .get(self.url("search"))
            .bearer_auth(token)
            .query(&[("q", query), ("type", "track"), ("limit", "1")])
            .send()
            .await
            .map_err(AppError::transport(SERVICE))?;

        let result = ensure_success(SERVICE, response)
            .await?
            .json::<SearchResponse>()
            .await
            .map_err(AppError::transport(SERVICE))?;

        Ok(result.tracks.items.into_iter().next())
    }
}
