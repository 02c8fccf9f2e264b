//! HTTP server adapter.
//!
//! # Responsibilities
//! - Own the socket and the Axum router
//! - Translate each inbound hyper request into the core's raw request
//!   shape (method, path, host, merged query/form params, Accept)
//! - Invoke the dispatcher and render its triple back to the wire
//! - Map errors the core propagates (405 / 404 / 500 at this edge)
//! - Record dispatch metrics
//!
//! # Design Decisions
//! - The core stays transport-blind; everything hyper-specific lives here
//! - Form-urlencoded bodies are buffered up to the configured limit and
//!   merged into params alongside the query string

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Request as AxumRequest, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{DispatchError, UpstreamError};
use crate::http::request::{Params, Request as CoreRequest};
use crate::http::response::Response as CoreResponse;
use crate::observability::metrics;
use crate::routing::Dispatcher;

/// State injected into the adapter handler.
#[derive(Clone)]
struct AdapterState {
    dispatcher: Arc<Dispatcher>,
    max_body_bytes: usize,
}

/// HTTP server wrapping one frozen dispatcher.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Wire a dispatcher behind the adapter with the given configuration.
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        let state = AdapterState {
            dispatcher: Arc::new(dispatcher),
            max_body_bytes: config.limits.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router: every path funnels into the dispatch handler.
    fn build_router(config: &ServerConfig, state: AdapterState) -> Router {
        Router::new()
            .fallback(dispatch_request)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until Ctrl-C or the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = shutdown.recv() => {}
                }
                tracing::info!("shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Adapter handler: translate, dispatch, render.
async fn dispatch_request(
    State(state): State<AdapterState>,
    request: AxumRequest,
) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4();

    let (parts, body) = request.into_parts();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();
    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(':').next())
        .unwrap_or("")
        .to_string();
    let accept = parts
        .headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let mut params = Params::new();
    if let Some(query) = parts.uri.query() {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.insert(&key, value.into_owned());
        }
    }

    let is_form = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);
    if is_form {
        match axum::body::to_bytes(body, state.max_body_bytes).await {
            Ok(bytes) => {
                for (key, value) in url::form_urlencoded::parse(&bytes) {
                    params.insert(&key, value.into_owned());
                }
            }
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    error = %err,
                    "failed to buffer form body"
                );
                return (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large").into_response();
            }
        }
    }

    let core_request = CoreRequest {
        method: method.clone(),
        path: path.clone(),
        host,
        accept,
        params,
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "dispatching request"
    );

    let wire = match state.dispatcher.dispatch(core_request) {
        Ok(response) => response,
        Err(DispatchError::UnsupportedMethod(raw)) => {
            tracing::warn!(request_id = %request_id, method = %raw, "method outside the routable set");
            CoreResponse::plain(405, "Method Not Allowed")
        }
        Err(DispatchError::Upstream(UpstreamError::Missing { id })) => {
            tracing::warn!(request_id = %request_id, id = %id, "record not found upstream");
            CoreResponse::not_found()
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, error = %err, "dispatch failed");
            CoreResponse::plain(500, "Internal Server Error")
        }
    };

    metrics::record_dispatch(&method, wire.status, started);
    render(wire)
}

/// Render the core triple as an Axum response.
fn render(response: CoreResponse) -> Response {
    let mut builder = axum::http::Response::builder().status(response.status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.body(Body::from(response.body)).unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to render response");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}
