use reqwest::{Client, Url};

use crate::{
    config::Settings,
    error::{AppError, ensure_success},
    types::{Session, TokenResponse},
    utils,
};

const SERVICE: &str = "spotify accounts";

/// Permissions requested from the user on login.
pub const SCOPES: [&str; 4] = [
    "user-library-read",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-top-read",
];

/// Client for the Spotify accounts service using the authorization code grant.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    auth_url: Url,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            auth_url: settings.spotify_auth_url.clone(),
            token_url: settings.spotify_token_url.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
        }
    }

    /// Builds the URL the user-agent is sent to for consent.
    ///
    /// # Example
    ///
    /// ```
    /// let url = oauth.authorize_url(&utils::generate_state(secret));
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn authorize_url(&self, state: &str) -> String {
        let scope = SCOPES.join(" ");
        let params = [
            ("client_id", self.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("show_dialog", "true"),
            ("state", state),
        ];

        let mut url = self.auth_url.clone();
        url.query_pairs_mut().extend_pairs(params);
        url.to_string()
    }

    /// Exchanges an authorization code for a fresh session.
    ///
    /// # Errors
    ///
    /// An invalid or reused code yields [`AppError::Upstream`] with the
    /// accounts service's error payload, e.g. `{"error": "invalid_grant"}`.
    pub async fn exchange_code(&self, code: &str) -> Result<Session, AppError> {
        let token = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
            ])
            .await?;

        let refresh_token = token.refresh_token.ok_or(AppError::MissingRefreshToken)?;

        Ok(Session {
            access_token: token.access_token,
            refresh_token,
            expires_at: utils::now_timestamp() + token.expires_in,
        })
    }

    /// Renews the access token of `session` with its refresh token.
    ///
    /// The refresh token is kept unless the accounts service hands out a
    /// replacement.
    pub async fn refresh(&self, session: &Session) -> Result<Session, AppError> {
        let token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &session.refresh_token),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
            ])
            .await?;

        Ok(Session {
            access_token: token.access_token,
            refresh_token: token
                .refresh_token
                .unwrap_or_else(|| session.refresh_token.clone()),
            expires_at: utils::now_timestamp() + token.expires_in,
        })
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(AppError::transport(SERVICE))?;

        ensure_success(SERVICE, response)
            .await?
            .json::<TokenResponse>()
            .await
            .map_err(AppError::transport(SERVICE))
    }
}
