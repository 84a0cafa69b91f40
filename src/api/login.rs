use axum::{extract::State, response::Redirect};
use axum_extra::extract::SignedCookieJar;

use crate::{info, server::AppState, utils};

use super::cookies;

/// Starts the authorization code flow.
///
/// Issues a signed `state`, remembers it in a signed cookie on this browser
/// and redirects to the Spotify consent page. Only the browser holding that
/// cookie can complete the login at `/callback`.
///
/// # Returns
///
/// The cookie update and a `303 See Other` to the authorize URL.
pub async fn login(State(state): State<AppState>, jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    let oauth_state = utils::generate_state(&state.settings.app_secret_key);
    let redirect = Redirect::to(&state.oauth.authorize_url(&oauth_state));
    info!("Redirecting to Spotify login");
    (jar.add(cookies::state_cookie(oauth_state)), redirect)
}
