use axum::{extract::State, response::Json};
use axum_extra::extract::SignedCookieJar;
use serde_json::{Value, json};

use crate::{server::AppState, utils};

use super::cookies;

/// Liveness check. `session` describes the caller's own session: `none`,
/// `expired` or `active`.
pub async fn health(State(state): State<AppState>, jar: SignedCookieJar) -> Json<Value> {
    let owner = cookies::session_owner(&jar);
    let session = match state.session.current(owner.as_deref()).await {
        None => "none",
        Some(s) if s.is_expired_at(utils::now_timestamp()) => "expired",
        Some(_) => "active",
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "session": session,
    }))
}
