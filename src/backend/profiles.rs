use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::{quote_filter_value, BackendClient};
use super::BackendError;

const PROFILE_COLUMNS: &str = "id,first_name,last_name,email,phone,crm,title,bio,role";

/// Raw `profiles` row as stored by the backend. Every text column but `id`
/// may be null.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub crm: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Narrow access to stored user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The profile whose email or CRM matches. `Ok(None)` when nothing
    /// matches; an error when more than one row does.
    async fn find_profile_by_email_or_crm(
        &self,
        email: &str,
        crm: &str,
    ) -> Result<Option<ProfileRow>, BackendError>;
}

/// PostgREST `or` filter over the keys that were given. A blank key would
/// match every row with a blank column, so it is left out; `None` when both
/// are blank.
fn email_or_crm_filter(email: &str, crm: &str) -> Option<String> {
    let mut terms = Vec::new();
    if !email.is_empty() {
        terms.push(format!("email.eq.{}", quote_filter_value(email)));
    }
    if !crm.is_empty() {
        terms.push(format!("crm.eq.{}", quote_filter_value(crm)));
    }
    if terms.is_empty() {
        None
    } else {
        Some(format!("({})", terms.join(",")))
    }
}

/// Turns a zero-or-one row result into an `Option`.
fn at_most_one(mut rows: Vec<ProfileRow>) -> Result<Option<ProfileRow>, BackendError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        n => Err(BackendError::MultipleRows(n)),
    }
}

// ═══════════════════════════════════════════════════════════
// REST implementation
// ═══════════════════════════════════════════════════════════

pub struct RestProfileRepository {
    client: BackendClient,
}

impl RestProfileRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepository for RestProfileRepository {
    async fn find_profile_by_email_or_crm(
        &self,
        email: &str,
        crm: &str,
    ) -> Result<Option<ProfileRow>, BackendError> {
        let Some(filter) = email_or_crm_filter(email, crm) else {
            return Ok(None);
        };
        let rows: Vec<ProfileRow> = self
            .client
            .select(
                "profiles",
                &[
                    ("select", PROFILE_COLUMNS.to_string()),
                    ("or", filter),
                    // Two rows are enough to detect an ambiguous match.
                    ("limit", "2".to_string()),
                ],
            )
            .await?;
        at_most_one(rows)
    }
}

// ═══════════════════════════════════════════════════════════
// In-memory implementation
// ═══════════════════════════════════════════════════════════

/// In-memory profile store for tests and offline development.
#[derive(Default)]
pub struct MockProfileRepository {
    rows: Vec<ProfileRow>,
    failure: Option<BackendError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockProfileRepository {
    pub fn new(rows: Vec<ProfileRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Every call fails with `err`.
    pub fn failing(err: BackendError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    /// Delay every call, to exercise cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn find_profile_by_email_or_crm(
        &self,
        email: &str,
        crm: &str,
    ) -> Result<Option<ProfileRow>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let matches = self
            .rows
            .iter()
            .filter(|row| {
                (!email.is_empty() && row.email.as_deref() == Some(email))
                    || (!crm.is_empty() && row.crm.as_deref() == Some(crm))
            })
            .cloned()
            .collect();
        at_most_one(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};

    use crate::backend::session::StaticSession;

    fn row(id: &str, email: &str, crm: &str) -> ProfileRow {
        ProfileRow {
            id: id.into(),
            email: Some(email.into()),
            crm: Some(crm.into()),
            ..ProfileRow::default()
        }
    }

    #[derive(Clone, Default)]
    struct Captured {
        query: Arc<Mutex<HashMap<String, String>>>,
        headers: Arc<Mutex<Option<HeaderMap>>>,
    }

    /// Serve `body` with `status` on `/rest/v1/profiles`, capturing requests.
    async fn fake_backend(
        status: StatusCode,
        body: serde_json::Value,
    ) -> (SocketAddr, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/rest/v1/profiles",
                get(
                    move |State(captured): State<Captured>,
                          headers: HeaderMap,
                          Query(query): Query<HashMap<String, String>>| {
                        let body = body.clone();
                        async move {
                            *captured.query.lock().unwrap() = query;
                            *captured.headers.lock().unwrap() = Some(headers);
                            (status, Json(body))
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, captured)
    }

    fn rest_repo(addr: SocketAddr, token: Option<&str>) -> RestProfileRepository {
        let client = BackendClient::new(
            &format!("http://{addr}"),
            "anon-key",
            Duration::from_secs(2),
            Arc::new(StaticSession::new(token.map(String::from))),
        )
        .unwrap();
        RestProfileRepository::new(client)
    }

    #[tokio::test]
    async fn mock_finds_by_email_or_crm() {
        let repo = MockProfileRepository::new(vec![row("u1", "ana@x.com", "1234")]);
        let by_email = repo.find_profile_by_email_or_crm("ana@x.com", "9999").await.unwrap();
        let by_crm = repo.find_profile_by_email_or_crm("other@x.com", "1234").await.unwrap();
        assert_eq!(by_email.unwrap().id, "u1");
        assert_eq!(by_crm.unwrap().id, "u1");
        assert_eq!(repo.calls(), 2);
    }

    #[tokio::test]
    async fn mock_reports_ambiguous_match() {
        let repo = MockProfileRepository::new(vec![
            row("u1", "ana@x.com", "1111"),
            row("u2", "bia@x.com", "2222"),
        ]);
        let err = repo
            .find_profile_by_email_or_crm("ana@x.com", "2222")
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::MultipleRows(2));
    }

    #[tokio::test]
    async fn rest_sends_filter_and_auth_headers() {
        let (addr, captured) = fake_backend(
            StatusCode::OK,
            serde_json::json!([{
                "id": "u1", "first_name": "Ana", "last_name": "Souza",
                "email": "ana@x.com", "phone": null, "crm": "123456",
                "title": null, "bio": null, "role": "doctor"
            }]),
        )
        .await;

        let found = rest_repo(addr, Some("user-jwt"))
            .find_profile_by_email_or_crm("ana@x.com", "123456")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "u1");
        assert_eq!(found.phone, None);

        let query = captured.query.lock().unwrap().clone();
        assert_eq!(query["select"], PROFILE_COLUMNS);
        assert_eq!(query["or"], r#"(email.eq."ana@x.com",crm.eq."123456")"#);

        let headers = captured.headers.lock().unwrap().clone().unwrap();
        assert_eq!(headers["apikey"], "anon-key");
        assert_eq!(headers["authorization"], "Bearer user-jwt");
    }

    #[test]
    fn filter_skips_blank_keys() {
        assert_eq!(
            email_or_crm_filter("ana@x.com", ""),
            Some(r#"(email.eq."ana@x.com")"#.to_string())
        );
        assert_eq!(
            email_or_crm_filter("", "1234"),
            Some(r#"(crm.eq."1234")"#.to_string())
        );
        assert_eq!(email_or_crm_filter("", ""), None);
    }

    #[tokio::test]
    async fn mock_ignores_blank_crm_when_looking_up_by_email() {
        let repo = MockProfileRepository::new(vec![
            row("u1", "admin@x.com", ""),
            row("u2", "staff@x.com", ""),
        ]);
        let found = repo
            .find_profile_by_email_or_crm("admin@x.com", "")
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, "u1");
    }

    #[tokio::test]
    async fn mock_ignores_blank_email_when_looking_up_by_crm() {
        let repo = MockProfileRepository::new(vec![
            row("u1", "", "1111"),
            row("u2", "", "2222"),
        ]);
        let found = repo.find_profile_by_email_or_crm("", "2222").await.unwrap();
        assert_eq!(found.unwrap().id, "u2");
    }

    #[tokio::test]
    async fn rest_email_only_lookup_omits_crm_filter() {
        let (addr, captured) = fake_backend(
            StatusCode::OK,
            serde_json::json!([{ "id": "u1", "email": "admin@x.com", "crm": "" }]),
        )
        .await;

        let found = rest_repo(addr, None)
            .find_profile_by_email_or_crm("admin@x.com", "")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "u1");

        let query = captured.query.lock().unwrap().clone();
        assert_eq!(query["or"], r#"(email.eq."admin@x.com")"#);
    }

    #[tokio::test]
    async fn rest_with_no_keys_skips_backend() {
        let (addr, captured) = fake_backend(StatusCode::OK, serde_json::json!([])).await;
        let found = rest_repo(addr, None)
            .find_profile_by_email_or_crm("", "")
            .await
            .unwrap();
        assert!(found.is_none());
        assert!(captured.headers.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn rest_without_session_uses_api_key_as_bearer() {
        let (addr, captured) = fake_backend(StatusCode::OK, serde_json::json!([])).await;

        let found = rest_repo(addr, None)
            .find_profile_by_email_or_crm("nobody@x.com", "0000")
            .await
            .unwrap();
        assert!(found.is_none());

        let headers = captured.headers.lock().unwrap().clone().unwrap();
        assert_eq!(headers["authorization"], "Bearer anon-key");
    }

    #[tokio::test]
    async fn rest_propagates_status_errors() {
        let (addr, _) = fake_backend(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"message": "JWT expired"}),
        )
        .await;

        let err = rest_repo(addr, Some("stale"))
            .find_profile_by_email_or_crm("ana@x.com", "1234")
            .await
            .unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("JWT expired"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rest_rejects_malformed_payload() {
        let (addr, _) = fake_backend(StatusCode::OK, serde_json::json!({"not": "a list"})).await;
        let err = rest_repo(addr, None)
            .find_profile_by_email_or_crm("ana@x.com", "1234")
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ResponseParsing(_)));
    }
}
