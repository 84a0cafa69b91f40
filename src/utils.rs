use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::Track;

const STATE_NONCE_LEN: usize = 32;

/// Random alphanumeric string used for OAuth nonces and session ids.
pub fn random_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_NONCE_LEN)
        .map(char::from)
        .collect()
}

/// Generates an OAuth `state` value of the form `<nonce>.<signature>`.
pub fn generate_state(secret: &str) -> String {
    let nonce = random_nonce();
    let signature = sign_nonce(secret, &nonce);
    format!("{nonce}.{signature}")
}

/// Checks that a `state` value was produced by [`generate_state`] with the same secret.
pub fn verify_state(secret: &str, state: &str) -> bool {
    let Some((nonce, signature)) = state.split_once('.') else {
        return false;
    };
    if nonce.len() != STATE_NONCE_LEN || !nonce.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let expected = sign_nonce(secret, nonce);
    // constant time over equal lengths
    expected.len() == signature.len()
        && expected
            .bytes()
            .zip(signature.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn sign_nonce(secret: &str, nonce: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(nonce.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Formats tracks as `1. Song - Artist, 2. Song - Artist`.
pub fn format_top_tracks(tracks: &[Track]) -> String {
    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let artist = track
                .artists
                .first()
                .map(|a| a.name.as_str())
                .unwrap_or("Unknown Artist");
            format!("{}. {} - {}", i + 1, track.name, artist)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Search text for one suggested song.
pub fn search_query(song: &str, artist: &str) -> String {
    format!("{} {}", song.trim(), artist.trim())
}

pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
