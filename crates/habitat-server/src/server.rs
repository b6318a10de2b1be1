use std::sync::Arc;

use habitat_store::HierarchyStore;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Habitat REST server.
pub struct HabitatServer {
    config: ServerConfig,
    store: Arc<dyn HierarchyStore>,
}

impl HabitatServer {
    pub fn new(config: ServerConfig, store: Arc<dyn HierarchyStore>) -> Self {
        Self { config, store }
    }

    /// Open the store named in `config`.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let store = config.store.open()?;
        Ok(Self::new(config, store))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn HierarchyStore> {
        &self.store
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(Arc::clone(&self.store)))
    }

    /// Record the start time, then serve until ctrl-c.
    pub async fn serve(self) -> ServerResult<()> {
        self.store.refresh_uptime()?;
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("habitat server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
