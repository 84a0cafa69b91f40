use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::warning;

/// Failures of a single request, each mapped to one HTTP response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no active session, login required")]
    NotAuthenticated,

    #[error("access token expired, refresh required")]
    TokenExpired,

    #[error("oauth state parameter is missing or was not issued by this server")]
    InvalidState,

    #[error("{service} answered with status {status}")]
    Upstream {
        service: &'static str,
        status: StatusCode,
        payload: Value,
    },

    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("token response did not contain a refresh token")]
    MissingRefreshToken,

    #[error("completion response contained no message")]
    EmptyCompletion,

    #[error("model output is not a valid playlist: {0}")]
    MalformedPlaylist(String),

    #[error("none of the suggested songs could be found on Spotify")]
    NoTracksResolved,
}

impl AppError {
    /// Spotify refused the bearer token although it had not expired locally,
    /// e.g. after the user revoked access.
    pub fn is_rejected_token(&self) -> bool {
        matches!(
            self,
            AppError::Upstream { service: crate::spotify::SERVICE, status, .. }
                if *status == StatusCode::UNAUTHORIZED
        )
    }

    pub fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| AppError::Transport { service, source }
    }
}

/// Passes a successful response through and turns any other status into
/// [`AppError::Upstream`] carrying the raw error payload.
pub async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let payload = serde_json::from_str(&body).unwrap_or(Value::String(body));
    Err(AppError::Upstream {
        service,
        status,
        payload,
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotAuthenticated => Redirect::to("/login").into_response(),
            AppError::TokenExpired => Redirect::to("/refresh-token").into_response(),
            AppError::InvalidState => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid_state" })),
            )
                .into_response(),
            AppError::Upstream {
                service,
                status,
                payload,
            } => {
                warning!("{} answered with status {}: {}", service, status, payload);
                (status, Json(payload)).into_response()
            }
            AppError::MalformedPlaylist(reason) => {
                warning!("Rejected model output: {}", reason);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Sorry, I could not turn that into a playlist. Please try rephrasing your request.",
                )
                    .into_response()
            }
            AppError::NoTracksResolved => (
                StatusCode::NOT_FOUND,
                "Sorry, none of the suggested songs could be found on Spotify.",
            )
                .into_response(),
            other => {
                warning!("{}", other);
                (StatusCode::BAD_GATEWAY, other.to_string()).into_response()
            }
        }
    }
}
