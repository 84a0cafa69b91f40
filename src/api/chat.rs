use axum::{Form, extract::State};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use crate::{
    chat::{self, ChatReply},
    error::AppError,
    server::AppState,
};

use super::cookies;

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub msg: String,
}

/// `POST /get`: answers one chat message on behalf of the requesting browser.
pub async fn chat(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ChatForm>,
) -> Result<ChatReply, AppError> {
    let owner = cookies::session_owner(&jar);
    chat::respond(&state, owner.as_deref(), &form.msg).await
}
