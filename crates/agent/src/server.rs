//! HTTP ingest server for error records.
//!
//! This module implements the Axum server that receives error records as
//! JSON over HTTP, writes them to the configured [`LogSink`], and
//! acknowledges receipt. Every response carries permissive cross-origin
//! headers so browser-based reporters on other origins can complete the
//! request, error responses included.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use balise_common::{ErrorRecord, IngestAck, IngestFailure};

use crate::sink::LogSink;

/// Default port for the ingest endpoint.
pub const DEFAULT_PORT: u16 = 7171;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    sink: Arc<dyn LogSink>,
}

/// Build the ingest router around the given sink.
///
/// Exposed separately from [`run_server`] so the endpoint can be hosted
/// behind any listener, embedded into a larger router, or driven directly
/// in tests.
pub fn router(sink: Arc<dyn LogSink>) -> Router {
    let state = AppState { sink };

    Router::new()
        .route("/v1/errors", post(ingest_error).options(preflight))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(cors_headers))
        .with_state(state)
}

/// Bind `0.0.0.0:<port>` and serve the ingest API (entry point for the
/// `balise-agent` binary). Blocks forever, or until error.
pub async fn serve(port: u16, sink: Arc<dyn LogSink>) -> Result<(), String> {
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {addr}: {e}"))?;
    run_server(listener, sink).await
}

/// Serve the ingest API on an already-bound listener.
pub async fn run_server(listener: TcpListener, sink: Arc<dyn LogSink>) -> Result<(), String> {
    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get listener address: {e}"))?;
    info!("Starting balise ingest endpoint on {addr}");

    axum::serve(listener, router(sink))
        .await
        .map_err(|e| format!("Server error: {e}"))
}

/// Attach the permissive cross-origin headers to every response.
async fn cors_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization, X-Client-Info, Apikey"),
    );
    response
}

/// Liveness probe.
async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// CORS preflight: empty 200, headers come from the middleware.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Handle one incoming error record.
///
/// The body is parsed by hand rather than through the `Json` extractor so
/// that malformed input produces the same wire shape as a sink failure:
/// a 500 with `success: false`. Callers of this endpoint only branch on
/// `success`.
async fn ingest_error(State(state): State<AppState>, body: Bytes) -> Response {
    let record: ErrorRecord = match serde_json::from_slice(&body) {
        Ok(record) => record,
        Err(e) => {
            error!("Failed to parse error record: {e}");
            return failure_response(format!("Invalid error record: {e}"));
        }
    };

    if let Err(e) = record.validate() {
        error!(id = %record.id, "Rejected error record: {e}");
        return failure_response(e);
    }

    match state.sink.write(&record) {
        Ok(()) => {
            debug!(id = %record.id, "Logged error record");
            (StatusCode::OK, Json(IngestAck::logged(record.id.clone()))).into_response()
        }
        Err(e) => {
            error!(id = %record.id, "Failed to write record to log sink: {e}");
            failure_response(format!("Log sink error: {e}"))
        }
    }
}

fn failure_response(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(IngestFailure::failed_to_log(message)),
    )
        .into_response()
}
