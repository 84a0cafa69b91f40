use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, server::AppState, success, utils, warning};

use super::{CHAT_PAGE, cookies};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub state: Option<String>,
}

/// Completes the login that [`super::login`] started.
///
/// The `state` query parameter must carry our signature and match the one
/// remembered in this browser's state cookie. On success the tokens are
/// stored as the session of this browser, which receives a fresh session
/// cookie, and the chat page is served.
///
/// # Errors
///
/// - `400` with Spotify's `error` when the user refused consent
/// - `400 missing_code` when no code came back
/// - [`AppError::InvalidState`] for a missing, forged or foreign `state`
/// - the token endpoint's status and payload when the exchange fails
pub async fn callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AppError> {
    if let Some(error) = params.error {
        warning!("Spotify login was refused: {}", error);
        return Ok((StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response());
    }

    let Some(code) = params.code else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing_code" })),
        )
            .into_response());
    };

    let issued = jar.get(cookies::STATE_COOKIE);
    let valid = match (params.state.as_deref(), issued.as_ref()) {
        (Some(returned), Some(issued)) => {
            returned == issued.value()
                && utils::verify_state(&state.settings.app_secret_key, returned)
        }
        _ => false,
    };
    if !valid {
        return Err(AppError::InvalidState);
    }

    let session = state.oauth.exchange_code(&code).await?;
    let owner = state.session.start(session).await;
    success!("Authentication successful!");

    let jar = jar
        .remove(cookies::removal(cookies::STATE_COOKIE))
        .add(cookies::session_cookie(owner));
    Ok((jar, Html(CHAT_PAGE)).into_response())
}
