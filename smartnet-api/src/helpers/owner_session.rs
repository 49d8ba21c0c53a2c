use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use futures::future::LocalBoxFuture;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::handlers::error::ApiError;
use crate::handlers::AppState;

pub const OWNER_COOKIE: &str = "smartnet_owner_authed";

const TOKEN_LENGTH: usize = 48;

/// Issued owner sessions, keyed by the opaque cookie token
pub struct OwnerSessionStore {
    sessions: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
    ttl: Duration,
}

impl OwnerSessionStore {
    pub fn new(ttl_days: i64) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl: Duration::days(ttl_days),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn issue(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(token.clone(), now + self.ttl);

        token
    }

    pub async fn is_valid(&self, token: &str) -> bool {
        let sessions = self.sessions.lock().await;
        matches!(sessions.get(token), Some(expires_at) if *expires_at > Utc::now())
    }

    pub async fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(token);
    }
}

/// Extractor for owner-only handlers; rejects with 401 without a live session cookie
pub struct OwnerSession {
    pub token: String,
}

impl FromRequest for OwnerSession {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req.cookie(OWNER_COOKIE).map(|c| c.value().to_string());
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let state = state.ok_or_else(|| ApiError::Internal("App state missing".to_string()))?;
            let token = token.ok_or(ApiError::Unauthorized)?;

            if state.owner_sessions.is_valid(&token).await {
                Ok(OwnerSession { token })
            } else {
                Err(ApiError::Unauthorized)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_and_revoke() {
        let store = OwnerSessionStore::new(7);
        let token = store.issue().await;

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(store.is_valid(&token).await);
        assert!(!store.is_valid("forged").await);

        store.revoke(&token).await;
        assert!(!store.is_valid(&token).await);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_rejected() {
        let store = OwnerSessionStore::new(0);
        let token = store.issue().await;
        assert!(!store.is_valid(&token).await);
    }
}
