//! HTTP server for verdantd.

use crate::gateway::{GenerationTransport, ReportGateway};
use crate::routes;
use crate::store::TelemetryReader;
use anyhow::Result;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers. Everything here is immutable
/// per request; concurrent requests coordinate through nothing.
pub struct AppState<T: GenerationTransport> {
    pub reader: TelemetryReader,
    pub gateway: ReportGateway<T>,
    pub reports_dir: PathBuf,
}

impl<T: GenerationTransport> AppState<T> {
    pub fn new(reader: TelemetryReader, gateway: ReportGateway<T>, reports_dir: PathBuf) -> Self {
        Self {
            reader,
            gateway,
            reports_dir,
        }
    }
}

/// Build the router. Separate from `run` so tests can drive it in-process.
pub fn router<T: GenerationTransport + 'static>(state: Arc<AppState<T>>) -> Router {
    let reports_dir = state.reports_dir.clone();

    Router::new()
        .merge(routes::data_routes())
        .merge(routes::report_routes())
        .nest_service("/reports", ServeDir::new(reports_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The browser UI is served from a different origin in development.
        .layer(CorsLayer::permissive())
}

/// Run the HTTP server until ctrl-c.
pub async fn run<T: GenerationTransport + 'static>(state: AppState<T>, port: u16) -> Result<()> {
    let app = router(Arc::new(state));

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down gracefully");
}
