use crate::{
    error::AppError,
    info,
    management::SessionManager,
    spotify::{SpotifyApi, playlist::ImagePolling},
    success,
    types::{CreatePlaylistRequest, PlaylistLink, PlaylistSpec},
    utils, warning,
};

pub const PLAYLIST_NAME: &str = "MusicGPT By RIT AI";
pub const PLAYLIST_DESCRIPTION: &str = "Your Curated Playlist";

/// Builds a private playlist on the user's account from a parsed song list.
#[derive(Debug, Clone)]
pub struct PlaylistAssembler {
    spotify: SpotifyApi,
    playlist_base_url: String,
    image_polling: ImagePolling,
}

impl PlaylistAssembler {
    pub fn new(spotify: SpotifyApi, playlist_base_url: String, image_polling: ImagePolling) -> Self {
        Self {
            spotify,
            playlist_base_url,
            image_polling,
        }
    }

    /// Runs the whole assembly in sequence.
    ///
    /// 1. Take `owner`'s access token from the session (absent or expired halts here)
    /// 2. Look up the user id
    /// 3. Create the playlist
    /// 4. Search each song in order, skipping songs without a match
    /// 5. Add every resolved track in one call
    /// 6. Poll for the cover image
    ///
    /// # Errors
    ///
    /// Authentication errors from the session, [`AppError::NoTracksResolved`]
    /// when no song matched, and any upstream failure.
    pub async fn assemble(
        &self,
        session: &SessionManager,
        owner: Option<&str>,
        spec: &PlaylistSpec,
    ) -> Result<PlaylistLink, AppError> {
        let token = session.access_token(owner).await?;

        let user_id = self.spotify.current_user_id(&token).await?;

        let request = CreatePlaylistRequest {
            name: PLAYLIST_NAME.to_string(),
            description: PLAYLIST_DESCRIPTION.to_string(),
            public: false,
        };
        let playlist = self
            .spotify
            .create_playlist(&token, &user_id, &request)
            .await?;
        success!("Created playlist {} for user {}", playlist.id, user_id);

        let mut uris = Vec::with_capacity(spec.playlist.len());
        for pick in &spec.playlist {
            let query = utils::search_query(&pick.song, &pick.artist);
            match self.spotify.search_track(&token, &query).await? {
                Some(track) => uris.push(track.uri()),
                None => warning!("No track found for '{}', skipping", query),
            }
        }

        if uris.is_empty() {
            return Err(AppError::NoTracksResolved);
        }

        let count = uris.len();
        self.spotify.add_tracks(&token, &playlist.id, uris).await?;
        success!("Added {} of {} tracks to playlist {}", count, spec.playlist.len(), playlist.id);

        let image = self
            .spotify
            .wait_for_cover_image(&token, &playlist.id, self.image_polling)
            .await?;
        if image.is_none() {
            warning!("Cover image for playlist {} was not ready in time", playlist.id);
        } else {
            info!("Fetched cover image for playlist {}", playlist.id);
        }

        Ok(PlaylistLink {
            url: format!("{}{}", self.playlist_base_url, playlist.id),
            image,
        })
    }
}
