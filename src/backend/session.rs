use std::path::PathBuf;

use async_trait::async_trait;

use super::BackendError;
use crate::db;

/// Source of the bearer token attached to each backend request.
///
/// `Ok(None)` means no signed-in session; the client then falls back to the
/// API key as bearer.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>, BackendError>;
}

/// Fixed token. Used for forwarded caller tokens and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn access_token(&self) -> Result<Option<String>, BackendError> {
        Ok(self.token.clone())
    }
}

/// Reads the token the auth provider persisted in the local preference store.
///
/// The store is read on every call so a refreshed token is picked up
/// without restarting.
#[derive(Debug, Clone)]
pub struct PreferenceSessionStore {
    db_path: PathBuf,
}

impl PreferenceSessionStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

#[async_trait]
impl SessionProvider for PreferenceSessionStore {
    async fn access_token(&self) -> Result<Option<String>, BackendError> {
        let conn = db::open_database(&self.db_path)
            .map_err(|e| BackendError::Session(e.to_string()))?;
        db::get_session_token(&conn).map_err(|e| BackendError::Session(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SESSION_TOKEN_KEY;

    #[tokio::test]
    async fn static_session_returns_token() {
        let session = StaticSession::new(Some("abc".into()));
        assert_eq!(session.access_token().await.unwrap().as_deref(), Some("abc"));
        assert_eq!(StaticSession::anonymous().access_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn preference_store_reads_fresh_token_each_call() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("preferences.db");
        let store = PreferenceSessionStore::new(path.clone());

        assert_eq!(store.access_token().await.unwrap(), None);

        let conn = db::open_database(&path).unwrap();
        db::set_user_preference(&conn, SESSION_TOKEN_KEY, "token-1").unwrap();
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("token-1"));

        db::set_user_preference(&conn, SESSION_TOKEN_KEY, "token-2").unwrap();
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("token-2"));
    }
}
