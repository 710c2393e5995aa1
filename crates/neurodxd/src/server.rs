//! HTTP server for neurodxd

use crate::routes;
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use neurodx_common::{Config, ExplanationService, MockPredictionProvider, PredictionProvider};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub service: Arc<ExplanationService>,
    pub provider: Arc<dyn PredictionProvider>,
    pub start_time: Instant,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        service: ExplanationService,
        provider: Arc<dyn PredictionProvider>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            service: Arc::new(service),
            provider,
            start_time: Instant::now(),
            max_upload_bytes,
        }
    }

    /// Knowledge, chat rules and mock provider as configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let service = ExplanationService::from_config(config)?;
        let provider = Arc::new(MockPredictionProvider::new(&config.prediction)?);
        Ok(Self::new(service, provider, config.server.max_upload_bytes))
    }
}

/// Build the router (separate from `run` so tests can drive it in-process)
pub fn app(state: AppState) -> Router {
    let max_upload = state.max_upload_bytes;
    let state = Arc::new(state);

    Router::new()
        .merge(routes::health_routes())
        .merge(routes::knowledge_routes())
        .merge(routes::ask_routes())
        .merge(routes::analyze_routes())
        .merge(routes::report_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until ctrl-c
pub async fn run(config: &Config) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind_addr))?;

    let state = AppState::from_config(config)?;
    info!("  Knowledge entries: {}", state.service.knowledge().len());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down gracefully");
        })
        .await?;
    Ok(())
}
