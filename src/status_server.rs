//! HTTP status server for monitoring a running gateway.
//!
//! Provides two endpoints on a separate loopback listener:
//! - `/metrics` - Prometheus-compatible metrics
//! - `/status` - JSON status endpoint with counter detail
//!
//! The server runs in the background and does not sit in the request path.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats};

/// Shared state for the status server
#[derive(Clone)]
pub(crate) struct StatusState {
    pub stats: Arc<ProcessingStats>,
    pub start_time: Instant,
}

/// JSON response for `/status` endpoint
#[derive(Serialize)]
struct StatusResponse {
    uptime_seconds: f64,
    requests: usize,
    documents_assembled: usize,
    non_html_passthrough: usize,
    oversize_passthrough: usize,
    fragments_resolved: usize,
    fragments_failed: usize,
    errors: ErrorCounts,
}

#[derive(Serialize)]
struct ErrorCounts {
    total: usize,
    fragment_status: usize,
    fragment_fetch: usize,
    fragment_target: usize,
    document: usize,
}

/// Creates and starts the status server
pub(crate) async fn start_status_server(port: u16, state: StatusState) -> Result<(), anyhow::Error> {
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/status", get(status_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind status server to port {}: {}", port, e))?;

    log::info!("Status server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Metrics: http://127.0.0.1:{}/metrics", port);
    log::info!("  - Status: http://127.0.0.1:{}/status", port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Status server error: {}", e))?;

    Ok(())
}

/// Prometheus-compatible metrics endpoint
async fn metrics_handler(State(state): State<StatusState>) -> Response {
    let stats = &state.stats;
    let metrics = format!(
        r#"# HELP esi_gateway_requests_total Requests passed through the interceptor
# TYPE esi_gateway_requests_total counter
esi_gateway_requests_total {}

# HELP esi_gateway_documents_assembled_total HTML documents scanned and rebuilt
# TYPE esi_gateway_documents_assembled_total counter
esi_gateway_documents_assembled_total {}

# HELP esi_gateway_non_html_passthrough_total Responses returned untouched (non-HTML)
# TYPE esi_gateway_non_html_passthrough_total counter
esi_gateway_non_html_passthrough_total {}

# HELP esi_gateway_fragments_resolved_total Fragments fetched and spliced successfully
# TYPE esi_gateway_fragments_resolved_total counter
esi_gateway_fragments_resolved_total {}

# HELP esi_gateway_fragments_failed_total Fragment resolutions degraded to inline comments
# TYPE esi_gateway_fragments_failed_total counter
esi_gateway_fragments_failed_total {}

# HELP esi_gateway_errors_total Total errors encountered
# TYPE esi_gateway_errors_total counter
esi_gateway_errors_total {}

# HELP esi_gateway_uptime_seconds Seconds since the gateway started
# TYPE esi_gateway_uptime_seconds gauge
esi_gateway_uptime_seconds {}
"#,
        stats.get_info_count(InfoType::RequestServed),
        stats.get_info_count(InfoType::DocumentAssembled),
        stats.get_info_count(InfoType::NonHtmlPassthrough),
        stats.get_info_count(InfoType::FragmentResolved),
        stats.total_fragment_failures(),
        stats.total_errors(),
        state.start_time.elapsed().as_secs_f64()
    );

    (StatusCode::OK, metrics).into_response()
}

/// JSON status endpoint with counter detail
async fn status_handler(State(state): State<StatusState>) -> Response {
    let stats = &state.stats;

    let response = StatusResponse {
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        requests: stats.get_info_count(InfoType::RequestServed),
        documents_assembled: stats.get_info_count(InfoType::DocumentAssembled),
        non_html_passthrough: stats.get_info_count(InfoType::NonHtmlPassthrough),
        oversize_passthrough: stats.get_info_count(InfoType::OversizeDocumentPassthrough),
        fragments_resolved: stats.get_info_count(InfoType::FragmentResolved),
        fragments_failed: stats.total_fragment_failures(),
        errors: ErrorCounts {
            total: stats.total_errors(),
            fragment_status: stats.get_error_count(ErrorType::FragmentStatusError),
            fragment_fetch: stats.get_error_count(ErrorType::FragmentFetchError),
            fragment_target: stats.get_error_count(ErrorType::FragmentTargetError),
            document: stats.get_error_count(ErrorType::DocumentError),
        },
    };

    let json = match serde_json::to_string_pretty(&response) {
        Ok(json) => json,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize status: {}", e),
            )
                .into_response();
        }
    };

    (StatusCode::OK, [("content-type", "application/json")], json).into_response()
}
