// Server module - Provides reusable HTTP server functionality

use axum::Router;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::infrastructure::AppState;

/// Build the full router: API under `/api`, the log relay at the root,
/// Swagger UI at `/api/docs`.
///
/// An empty origin list allows any origin.
pub fn build_router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    let mut origins = Vec::new();
    for origin in cors_allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(v) => origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api::api_router(state.clone()))
        .merge(api::relay_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind the listener on all interfaces. The port is fixed because browser
/// clients post their logs to it; a busy port is an error.
pub async fn bind(port: u16) -> Result<tokio::net::TcpListener, String> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))
}

/// Bind and serve until the process is stopped
pub async fn serve(
    state: AppState,
    port: u16,
    cors_allowed_origins: &[String],
) -> Result<(), String> {
    let listener = bind(port).await?;
    let app = build_router(state, cors_allowed_origins);

    tracing::info!("Library desk listening on 0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("HTTP server error: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_busy_port_is_an_error() {
        let held = std::net::TcpListener::bind(("0.0.0.0", 0)).unwrap();
        let port = held.local_addr().unwrap().port();

        let err = bind(port).await.unwrap_err();
        assert!(err.starts_with("Failed to bind"), "unexpected error: {}", err);
    }

    #[tokio::test]
    async fn test_free_port_binds_exactly() {
        let port = {
            let scratch = std::net::TcpListener::bind(("0.0.0.0", 0)).unwrap();
            scratch.local_addr().unwrap().port()
        };

        let listener = bind(port).await.unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }
}
