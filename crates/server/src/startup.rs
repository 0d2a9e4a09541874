use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{
    employee::EmployeeService,
    runtime,
    storage::{EmployeeStore, JsonFileStore},
};

/// Load `.env`, then config from `config.toml`/environment, and validate it.
pub fn load_config() -> Result<AppConfig, StartupError> {
    dotenvy::dotenv().ok();
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Build the application from a validated configuration: the file store is
/// initialized up front so a bad data path fails startup instead of requests.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    runtime::ensure_env(&cfg.web.static_dir, &cfg.storage.data_file).await?;

    let store = JsonFileStore::open(&cfg.storage.data_file, cfg.storage.on_corrupt)
        .await?
        .with_pretty(cfg.storage.pretty);
    info!(path = %store.path().display(), policy = ?cfg.storage.on_corrupt, "employee store ready");
    let store: Arc<dyn EmployeeStore> = Arc::new(store);

    let state = ServerState::new(Arc::new(EmployeeService::new(store)));
    let cors = routes::build_cors(&cfg.web.cors_origins);
    Ok(routes::build_router(state, &cfg.web.static_dir, cors))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;
    let addr: SocketAddr = cfg
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {}: {e}", cfg.bind_addr())))?;

    info!(%addr, "employee registry listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Any(anyhow::anyhow!("cannot bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!("server stopped");
    Ok(())
}
