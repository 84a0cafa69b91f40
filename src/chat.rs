use axum::{
    Json,
    response::{IntoResponse, Response},
};

use crate::{
    completion::{
        intent::{self, Intent},
        prompt,
    },
    error::AppError,
    info,
    server::AppState,
    types::PlaylistLink,
    utils, warning,
};

pub const HINT: &str = "Example Prompts: Make me a playlist that is a mix of Michael Jackson and The Weeknd?, \
                        What are my top songs?, Make me a playlist for a rainy day?";

/// Answer to one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Hint,
    TopTracks(String),
    Playlist(PlaylistLink),
}

impl IntoResponse for ChatReply {
    fn into_response(self) -> Response {
        match self {
            ChatReply::Hint => HINT.into_response(),
            ChatReply::TopTracks(tracks) => tracks.into_response(),
            ChatReply::Playlist(link) => Json(link).into_response(),
        }
    }
}

/// Handles one chat turn from classification to the final reply.
///
/// `owner` is the session owner id carried by the requesting browser. When
/// Spotify rejects a token that has not expired yet, the session is dropped
/// and the caller is sent back to `/login`.
pub async fn respond(
    state: &AppState,
    owner: Option<&str>,
    message: &str,
) -> Result<ChatReply, AppError> {
    match turn(state, owner, message).await {
        Err(e) if e.is_rejected_token() => {
            warning!("Spotify rejected the access token, login required: {}", e);
            state.session.clear(owner).await;
            Err(AppError::NotAuthenticated)
        }
        reply => reply,
    }
}

async fn turn(state: &AppState, owner: Option<&str>, message: &str) -> Result<ChatReply, AppError> {
    match intent::classify(&state.completion, message).await? {
        Intent::Recommendation => {
            // fail before spending a completion on a user who must log in again
            state.session.access_token(owner).await?;

            info!("Asking {} for songs", state.completion.model());
            let spec = prompt::suggest_playlist(&state.completion, message).await?;
            let link = state.assembler.assemble(&state.session, owner, &spec).await?;
            Ok(ChatReply::Playlist(link))
        }
        Intent::TopTracks => {
            let token = state.session.access_token(owner).await?;
            let tracks = state.spotify.top_tracks(&token).await?;
            let formatted = utils::format_top_tracks(&tracks);

            if state.settings.top_tracks_playlist && !tracks.is_empty() {
                if let Err(e) = playlist_from_top_tracks(state, owner, &formatted).await {
                    warning!("Could not build a playlist from top tracks: {}", e);
                }
            }

            Ok(ChatReply::TopTracks(formatted))
        }
        Intent::None => Ok(ChatReply::Hint),
    }
}

async fn playlist_from_top_tracks(
    state: &AppState,
    owner: Option<&str>,
    formatted: &str,
) -> Result<(), AppError> {
    let spec = prompt::suggest_playlist(&state.completion, formatted).await?;
    let link = state.assembler.assemble(&state.session, owner, &spec).await?;
    info!("Top tracks playlist ready at {}", link.url);
    Ok(())
}
