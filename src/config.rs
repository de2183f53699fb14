use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "AngioRequest";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// City used on datelines and addresses when neither the clinic nor the
/// local preference store provides one.
pub const DEFAULT_CITY: &str = "São Paulo";

/// Preference key holding the user's preferred dateline city.
pub const PREFERRED_CITY_KEY: &str = "preferred_city";

/// Preference key holding the access token persisted by the auth provider.
pub const SESSION_TOKEN_KEY: &str = "session.access_token";

const DEFAULT_BACKEND_URL: &str = "http://localhost:54321";
const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8787);
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "angio_request_lib=info,tower_http=info"
}

/// Get the application data directory
/// ~/AngioRequest/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Local preference database (cached city, persisted session).
pub fn preferences_db_path() -> PathBuf {
    app_data_dir().join("preferences.db")
}

/// Directory where rendered request PDFs are written.
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the hosted backend (without `/rest/v1`).
    pub backend_url: String,
    /// Static API key sent as `apikey` on every backend call.
    pub backend_api_key: String,
    /// Address the HTTP service listens on.
    pub bind_addr: SocketAddr,
    /// TCP connect timeout for backend calls. No overall request timeout.
    pub connect_timeout_secs: u64,
    /// Path of the local preference database.
    pub preferences_db: PathBuf,
    /// Directory exported request PDFs are written to.
    pub exports_dir: PathBuf,
}

impl AppConfig {
    /// Build the configuration from `ANGIO_*` environment variables.
    ///
    /// Unset or unparsable values fall back to defaults with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let backend_url = lookup("ANGIO_BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let backend_api_key = lookup("ANGIO_BACKEND_API_KEY").unwrap_or_default();
        if backend_api_key.is_empty() {
            tracing::warn!("ANGIO_BACKEND_API_KEY not set; backend calls will be rejected");
        }

        let bind_addr = match lookup("ANGIO_BIND_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid ANGIO_BIND_ADDR, using default");
                DEFAULT_BIND_ADDR
            }),
            None => DEFAULT_BIND_ADDR,
        };

        let connect_timeout_secs = lookup("ANGIO_CONNECT_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        let preferences_db = lookup("ANGIO_PREFERENCES_DB")
            .map(PathBuf::from)
            .unwrap_or_else(preferences_db_path);

        let exports_dir = lookup("ANGIO_EXPORTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(exports_dir);

        Self {
            backend_url,
            backend_api_key,
            bind_addr,
            connect_timeout_secs,
            preferences_db,
            exports_dir,
        }
    }
}
