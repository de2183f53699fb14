//! Application state shared by every HTTP handler.
//!
//! `CoreState` is the composition point: it owns the backend repository and
//! reads local preferences, so handlers can hand plain values to the pure
//! validation and document functions.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::backend::{
    BackendClient, BackendError, CancelToken, PreferenceSessionStore, ProfileRepository,
    RestProfileRepository,
};
use crate::config::AppConfig;
use crate::db::{self, DatabaseError};
use crate::document::DocumentContext;

/// Upper bound on fetching the clinic logo for a PDF.
const LOGO_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

pub struct CoreState {
    pub config: AppConfig,
    profiles: Arc<dyn ProfileRepository>,
    http: reqwest::Client,
    /// Cancelled on server shutdown; aborts in-flight backend calls.
    shutdown: CancelToken,
}

impl CoreState {
    pub fn new(config: AppConfig, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            config,
            profiles,
            http: reqwest::Client::new(),
            shutdown: CancelToken::new(),
        }
    }

    /// Wire the REST repository, authenticated from the local session store.
    pub fn from_config(config: AppConfig) -> Result<Self, CoreError> {
        let session = Arc::new(PreferenceSessionStore::new(config.preferences_db.clone()));
        let client = BackendClient::from_config(&config, session)?;
        tracing::info!(backend = %client.base_url(), "Backend client configured");
        let http = client.http().clone();
        let profiles = Arc::new(RestProfileRepository::new(client));
        Ok(Self {
            http,
            ..Self::new(config, profiles)
        })
    }

    /// Open the local preference database.
    pub fn open_db(&self) -> Result<Connection, CoreError> {
        Ok(db::open_database(&self.config.preferences_db)?)
    }

    pub fn profiles(&self) -> &dyn ProfileRepository {
        self.profiles.as_ref()
    }

    pub fn shutdown_token(&self) -> &CancelToken {
        &self.shutdown
    }

    /// Download the clinic logo. Any failure is logged and yields `None`;
    /// the document is still printed without it.
    pub async fn fetch_logo(&self, url: &str) -> Option<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .timeout(LOGO_FETCH_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status());
        let bytes = match response {
            Ok(response) => response.bytes().await,
            Err(e) => Err(e),
        };
        match bytes {
            Ok(bytes) => {
                tracing::debug!(url, bytes = bytes.len(), "Clinic logo fetched");
                Some(bytes.to_vec())
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Cannot fetch clinic logo");
                None
            }
        }
    }

    /// Resolve the configuration injected into document composition.
    ///
    /// An unreadable preference store means "no cached city", not a failure.
    pub fn document_context(&self, today: NaiveDate) -> DocumentContext {
        let cached_city = match self.open_db().and_then(|conn| Ok(db::get_preferred_city(&conn)?)) {
            Ok(city) => city,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot read cached city preference");
                None
            }
        };
        DocumentContext { cached_city, today }
    }
}
