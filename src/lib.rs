pub mod api;
pub mod backend;
pub mod config;
pub mod core_state;
pub mod db;
pub mod document;
pub mod models;
pub mod ui;
pub mod user_lookup;
pub mod validation;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Core(#[from] core_state::CoreError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
}

/// Start the service and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = config::AppConfig::from_env();
    let bind_addr = app_config.bind_addr;
    let core = Arc::new(core_state::CoreState::from_config(app_config)?);

    // Creates and migrates the preference store on first launch. A broken
    // store only costs the cached city and session, so keep serving.
    if let Err(e) = core.open_db() {
        tracing::warn!(error = %e, "Preference store unavailable");
    }

    let mut server = api::start_api_server(core, bind_addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }
    server.shutdown();
    server.stopped().await;
    Ok(())
}
