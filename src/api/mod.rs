//! HTTP API.
//!
//! Exposes form validation, user lookup and request document rendering as
//! JSON endpoints under `/api/`. `api_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiServerSession, ServerError};
pub use types::ApiContext;
