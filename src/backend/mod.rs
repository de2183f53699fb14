//! Access layer for the hosted backend.
//!
//! One shared `BackendClient` carries the base endpoint and static API key;
//! the bearer token comes from a `SessionProvider` and is fetched fresh for
//! every request. Table access sits behind narrow repository traits so the
//! lookup and composition code never talks HTTP directly.

pub mod cancel;
pub mod client;
pub mod profiles;
pub mod session;

pub use cancel::CancelToken;
pub use client::BackendClient;
pub use profiles::{MockProfileRepository, ProfileRepository, ProfileRow, RestProfileRepository};
pub use session::{PreferenceSessionStore, SessionProvider, StaticSession};

/// Errors from backend calls. Propagated to callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("Cannot connect to backend at {0}")]
    Connection(String),
    #[error("HTTP client error: {0}")]
    HttpClient(String),
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Response parsing failed: {0}")]
    ResponseParsing(String),
    #[error("Expected at most one row, backend returned {0}")]
    MultipleRows(usize),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Session store unavailable: {0}")]
    Session(String),
    #[error("Request cancelled")]
    Cancelled,
}
