//! The ambient HTTP surface over the Code Reasoning State core: session
//! lifecycle, reasoning trace and CRS export endpoints, plus the
//! supplementary read endpoints named in the external-interfaces contract.
//!
//! The core crates (`crs-store`, `crs-algorithms`, `crs-session`) know
//! nothing about HTTP or JSON; this crate is the thin adapter, reached
//! through [`services::ExternalServices`] for everything that would
//! otherwise pull an LLM/embedding client into the reasoning core.

#![warn(unreachable_pub)]

pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use error::ServerError;
pub use services::{ExternalServices, NullExternalServices};
pub use state::AppState;

use axum::Router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

/// Bind address and any per-deployment overrides for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: SocketAddr::from(([127, 0, 0, 1], 4950)) }
    }
}

pub struct CrsServer {
    config: ServerConfig,
    router: Router,
}

impl CrsServer {
    #[must_use]
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        let router = routes::api_router(state).layer(TraceLayer::new_for_http());
        Self { config, router }
    }

    /// Bind and serve until the process is interrupted. Errors here are I/O
    /// failures binding the listener, not request-handling errors, which are
    /// always turned into a JSON response by [`ServerError`].
    pub async fn serve(self) -> std::io::Result<()> {
        tracing::info!(addr = %self.config.bind_addr, "starting crs-server");
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        axum::serve(listener, self.router).await
    }

    /// The router on its own, for driving requests through `tower::Service`
    /// directly instead of binding a socket.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn test_server() -> CrsServer {
        CrsServer::new(ServerConfig::default(), AppState::default())
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let router = test_server().router();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn root_endpoint_reports_service_info() {
        let router = test_server().router();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_session_id_returns_not_found() {
        let router = test_server().router();
        let request = Request::builder()
            .uri(format!("/agent/{}", uuid::Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_session_id_is_a_bad_request() {
        let router = test_server().router();
        let request = Request::builder().uri("/agent/not-a-uuid").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn tool_catalog_lists_every_registered_algorithm() {
        let router = test_server().router();
        let request = Request::builder().uri("/tools").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let tools: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert!(!tools.is_empty());
    }

    #[tokio::test]
    async fn run_then_inspect_round_trips_through_the_http_surface() {
        let router = test_server().router();

        let run_request = Request::builder()
            .method("POST")
            .uri("/agent/run")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"project_root":"/tmp/project","query":"why does build fail"}"#))
            .unwrap();
        let run_response = router.clone().oneshot(run_request).await.unwrap();
        assert_eq!(run_response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(run_response.into_body(), usize::MAX).await.unwrap();
        let run: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let session_id = run["session_id"].as_str().unwrap().to_string();

        let get_request = Request::builder().uri(format!("/agent/{session_id}")).body(Body::empty()).unwrap();
        let get_response = router.oneshot(get_request).await.unwrap();
        assert_eq!(get_response.status(), StatusCode::OK);
    }
}
