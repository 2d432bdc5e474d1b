//! Liveness endpoint for the hosting platform.

use std::future::Future;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Body returned by `GET /health`.
pub const HEALTH_BODY: &str = "Bot is running";

/// GET /health
async fn health() -> &'static str {
    HEALTH_BODY
}

/// Build the health routes.
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

/// Serve the health routes until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, health_routes())
        .with_graceful_shutdown(shutdown)
        .await
}
