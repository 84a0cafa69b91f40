use crate::{
    error::AppError,
    types::PlaylistSpec,
    warning,
};

use super::CompletionClient;

pub const MAX_PLAYLIST_SONGS: usize = 10;

/// Turns a request into a prompt that demands the song list as strict JSON.
pub fn build_playlist_prompt(request: &str) -> String {
    format!(
        "{request}. Make sure this playlist is in json format and 'artist' and 'song' are the keys. \
         Limit this playlist to {MAX_PLAYLIST_SONGS} songs please. Reply with the JSON object only, \
         using double quotes. \
         Ex. {{\"playlist\":[{{\"artist\":\"Frank Ocean\",\"song\":\"Thinking Bout You\"}},\
         {{\"artist\":\"Daniel Caesar\",\"song\":\"Japanese Denim\"}}]}}",
        request = request.trim().trim_end_matches('.'),
    )
}

/// Parses a model reply into at most [`MAX_PLAYLIST_SONGS`] songs.
///
/// Only the outermost `{...}` of the reply is read, so prose or code fences
/// around the object are ignored. The object itself must have the exact
/// `{"playlist": [{"artist": .., "song": ..}]}` shape.
///
/// # Errors
///
/// [`AppError::MalformedPlaylist`] when no object is found, it does not
/// deserialize, it lists no songs, or any entry has a blank `artist` or `song`.
pub fn parse_playlist_spec(reply: &str) -> Result<PlaylistSpec, AppError> {
    let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) else {
        return Err(AppError::MalformedPlaylist(
            "reply contains no JSON object".to_string(),
        ));
    };
    if end < start {
        return Err(AppError::MalformedPlaylist(
            "reply contains no JSON object".to_string(),
        ));
    }

    let mut spec: PlaylistSpec = serde_json::from_str(&reply[start..=end])
        .map_err(|e| AppError::MalformedPlaylist(e.to_string()))?;

    if let Some(position) = spec
        .playlist
        .iter()
        .position(|pick| pick.song.trim().is_empty() || pick.artist.trim().is_empty())
    {
        return Err(AppError::MalformedPlaylist(format!(
            "entry {} has a blank artist or song",
            position + 1
        )));
    }
    if spec.playlist.is_empty() {
        return Err(AppError::MalformedPlaylist(
            "playlist has no songs".to_string(),
        ));
    }

    if spec.playlist.len() > MAX_PLAYLIST_SONGS {
        warning!(
            "Model suggested {} songs, keeping the first {}",
            spec.playlist.len(),
            MAX_PLAYLIST_SONGS
        );
        spec.playlist.truncate(MAX_PLAYLIST_SONGS);
    }

    Ok(spec)
}

/// Asks the model for songs matching `request` and parses its reply.
pub async fn suggest_playlist(
    client: &CompletionClient,
    request: &str,
) -> Result<PlaylistSpec, AppError> {
    let reply = client.complete(&build_playlist_prompt(request)).await?;
    parse_playlist_spec(&reply)
}
