use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error::AppError, types::Session, utils};

#[derive(Debug, Clone)]
struct OwnedSession {
    owner: String,
    session: Session,
}

/// Holder of the single user session.
///
/// The session belongs to the browser that completed the login. Every
/// accessor takes the owner id read from that browser's signed cookie, and a
/// request carrying no id, or another id, sees no session at all. A new login
/// replaces the previous owner.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    inner: Arc<Mutex<Option<OwnedSession>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly issued session and returns the id of its new owner.
    pub async fn start(&self, session: Session) -> String {
        let owner = utils::random_nonce();
        *self.inner.lock().await = Some(OwnedSession {
            owner: owner.clone(),
            session,
        });
        owner
    }

    pub async fn current(&self, owner: Option<&str>) -> Option<Session> {
        let lock = self.inner.lock().await;
        lock.as_ref()
            .filter(|stored| Some(stored.owner.as_str()) == owner)
            .map(|stored| stored.session.clone())
    }

    /// Replaces the tokens of `owner`'s session. Returns `false` when the
    /// session has meanwhile passed to someone else.
    pub async fn renew(&self, owner: &str, session: Session) -> bool {
        let mut lock = self.inner.lock().await;
        match lock.as_mut() {
            Some(stored) if stored.owner == owner => {
                stored.session = session;
                true
            }
            _ => false,
        }
    }

    /// Drops the session if `owner` holds it.
    pub async fn clear(&self, owner: Option<&str>) {
        let mut lock = self.inner.lock().await;
        if lock.as_ref().map(|stored| stored.owner.as_str()) == owner {
            *lock = None;
        }
    }

    /// Returns a usable access token or the error that sends the user to
    /// the login or refresh flow. Protected Spotify calls go through here.
    pub async fn access_token(&self, owner: Option<&str>) -> Result<String, AppError> {
        self.access_token_at(owner, utils::now_timestamp()).await
    }

    pub async fn access_token_at(&self, owner: Option<&str>, now: i64) -> Result<String, AppError> {
        match self.current(owner).await {
            None => Err(AppError::NotAuthenticated),
            Some(session) if session.is_expired_at(now) => Err(AppError::TokenExpired),
            Some(session) => Ok(session.access_token),
        }
    }
}
