//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router (`/api/{*path}` proxy, `/healthz`)
//! - Wire up middleware (request ID, tracing, timeout)
//! - Own the pooled upstream client
//! - Serve until shutdown

use std::time::Duration;

use axum::{
    extract::{Request, State},
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{DashboardConfig, UpstreamTarget};
use crate::http::proxy::{proxy_handler, ProxyState};
use crate::http::request::{request_id, MakeUuidRequestId, X_REQUEST_ID};
use crate::lifecycle::wait_for_shutdown;

/// HTTP server fronting the backend API.
pub struct HttpServer {
    router: Router,
    config: DashboardConfig,
    upstream: UpstreamTarget,
}

impl HttpServer {
    /// Create a server forwarding to `upstream`.
    pub fn new(config: DashboardConfig, upstream: UpstreamTarget) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            // Redirects are the caller's business.
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let state = ProxyState {
            client,
            upstream: upstream.clone(),
            max_body_size: config.security.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            upstream,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DashboardConfig, state: ProxyState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route("/api/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeUuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id(request),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The router, for in-process use (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn upstream(&self) -> &UpstreamTarget {
        &self.upstream
    }

    /// Serve on `listener` until `shutdown` fires or an OS signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.upstream,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler(State(state): State<ProxyState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "upstream": state.upstream.as_str(),
    }))
}
