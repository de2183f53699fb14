use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::session::SessionProvider;
use super::BackendError;
use crate::config::AppConfig;

/// HTTP client for the hosted backend's table API (`/rest/v1/<table>`).
///
/// Cheap to clone; clones share the connection pool and session provider.
/// Holds no per-call mutable state.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    session: Arc<dyn SessionProvider>,
}

impl BackendClient {
    /// Create a client for `base_url` authenticated with `api_key`.
    ///
    /// Only a connect timeout is set; requests themselves are not bounded.
    pub fn new(
        base_url: &str,
        api_key: &str,
        connect_timeout: Duration,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| BackendError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
            session,
        })
    }

    pub fn from_config(
        config: &AppConfig,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, BackendError> {
        Self::new(
            &config.backend_url,
            &config.backend_api_key,
            Duration::from_secs(config.connect_timeout_secs),
            session,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The pooled HTTP client, for plain fetches outside the table API.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// `GET /rest/v1/<table>` with the given query pairs, decoded as rows.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        let bearer = self
            .session
            .access_token()
            .await?
            .unwrap_or_else(|| self.api_key.clone());

        tracing::debug!(table, "Backend select");

        let response = self
            .http
            .get(&url)
            .query(query)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    BackendError::Connection(self.base_url.clone())
                } else {
                    BackendError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| BackendError::ResponseParsing(e.to_string()))
    }
}

/// Quote a value for use inside a PostgREST logical filter, e.g. `or=(...)`.
pub fn quote_filter_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::session::StaticSession;

    fn client(base_url: &str) -> BackendClient {
        BackendClient::new(
            base_url,
            "anon-key",
            Duration::from_secs(1),
            Arc::new(StaticSession::anonymous()),
        )
        .unwrap()
    }

    #[test]
    fn trims_trailing_slash() {
        assert_eq!(client("http://localhost:54321/").base_url(), "http://localhost:54321");
    }

    #[test]
    fn quotes_plain_values() {
        assert_eq!(quote_filter_value("ana@x.com"), "\"ana@x.com\"");
    }

    #[test]
    fn quotes_escape_reserved_characters() {
        assert_eq!(quote_filter_value(r#"a"b\c"#), r#""a\"b\\c""#);
        // Commas and parentheses are safe once quoted.
        assert_eq!(quote_filter_value("a,b)"), "\"a,b)\"");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_connection_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let err = client("http://127.0.0.1:9")
            .select::<serde_json::Value>("profiles", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BackendError::Connection(_) | BackendError::HttpClient(_)
        ));
    }
}
