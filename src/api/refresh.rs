use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;

use crate::{error::AppError, info, server::AppState, success, utils, warning};

use super::{CHAT_PAGE, cookies};

/// Renews this browser's access token when it has expired.
///
/// A browser without a session is sent to `/login`. A still valid token is
/// left alone. Either way the chat page is served afterwards.
///
/// # Errors
///
/// The token endpoint's status and payload when the refresh is rejected. The
/// stored session is left unchanged in that case.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let owner = cookies::session_owner(&jar);
    let Some(session) = state.session.current(owner.as_deref()).await else {
        return Ok(Redirect::to("/login").into_response());
    };

    if session.is_expired_at(utils::now_timestamp()) {
        info!("Access token expired, refreshing");
        let renewed = state.oauth.refresh(&session).await?;
        let stored = match owner {
            Some(owner) => state.session.renew(&owner, renewed).await,
            None => false,
        };
        if !stored {
            warning!("Session changed hands during refresh, login required");
            return Ok(Redirect::to("/login").into_response());
        }
        success!("Access token refreshed");
    }

    Ok(Html(CHAT_PAGE).into_response())
}
