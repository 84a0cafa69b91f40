//! Signed cookies that tie the OAuth handshake and the stored session to one
//! browser. Both are signed with a key derived from `APP_SECRETKEY`.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};

/// Holds the id of the session owner.
pub const SESSION_COOKIE: &str = "musicgpt_session";
/// Holds the `state` sent to the authorize endpoint, until the callback.
pub const STATE_COOKIE: &str = "musicgpt_oauth_state";

/// Derives the 64-byte signing key from the configured secret.
pub fn signing_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

pub fn session_cookie(owner: String) -> Cookie<'static> {
    http_only(SESSION_COOKIE, owner)
}

pub fn state_cookie(state: String) -> Cookie<'static> {
    http_only(STATE_COOKIE, state)
}

/// Cookie that makes the browser forget `name`.
pub fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Session owner id carried by the request, if its signature checks out.
pub fn session_owner(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

fn http_only(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
