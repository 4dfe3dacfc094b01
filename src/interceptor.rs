//! The response interceptor.
//!
//! Middleware over the asset origin (or any inner service): lets the next
//! stage produce its response, then decides whether that response needs
//! include resolution. Non-HTML responses pass through untouched. HTML
//! responses are buffered in full (marker boundaries may span body chunks,
//! so streaming substitution is not an option), handed to the engine, and
//! re-emitted with the assembled body and adjusted headers.
//!
//! Any failure in here (body read, response rebuild) degrades to a generic
//! 500; detail goes to the log, never to the client.

use std::sync::Arc;

use anyhow::Context;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use url::Url;

use crate::config::{HTML_CONTENT_TYPE, NO_CACHE};
use crate::error_handling::{ErrorType, InfoType};
use crate::server::AppState;

/// Intercepts one request/response exchange.
pub(crate) async fn resolve_includes(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    state.stats.increment_info(InfoType::RequestServed);
    let base = request_base_url(&state.public_base, request.uri());

    let response = next.run(request).await;

    // HTML only; everything else passes through byte-identical
    if !is_html(&response) {
        state.stats.increment_info(InfoType::NonHtmlPassthrough);
        return response;
    }

    if let Some(length) = declared_length(&response) {
        if length > state.max_document_bytes {
            state
                .stats
                .increment_info(InfoType::OversizeDocumentPassthrough);
            warn!("Passing {base} through unprocessed: {length} bytes exceeds document cap");
            return response;
        }
    }

    match assemble(response, &base, &state).await {
        Ok(assembled) => assembled,
        Err(err) => {
            state.stats.increment_error(ErrorType::DocumentError);
            error!("Failed to assemble {base}: {err:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Buffers the response body, runs the engine, and rebuilds the response.
///
/// The rebuilt response keeps the original status and headers, with three
/// exceptions: content-type is forced to HTML/UTF-8 (the engine decoded the
/// body as UTF-8), cache-control is forced to `no-cache` (assembled pages
/// are never cacheable), and content-length is dropped so the transport
/// recomputes it for the new body.
async fn assemble(response: Response, base: &Url, state: &AppState) -> anyhow::Result<Response> {
    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, state.max_document_bytes)
        .await
        .context("failed to buffer upstream response body")?;
    let document = String::from_utf8_lossy(&bytes);

    let assembled = state.resolver.resolve(&document, base).await;
    state.stats.increment_info(InfoType::DocumentAssembled);

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(HTML_CONTENT_TYPE),
    );
    parts
        .headers
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));

    Ok(Response::from_parts(parts, Body::from(assembled)))
}

/// The absolute URL of the in-flight request, used as the base for resolving
/// relative include paths.
fn request_base_url(public_base: &Url, uri: &Uri) -> Url {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    public_base
        .join(target)
        .unwrap_or_else(|_| public_base.clone())
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("text/html"))
}

fn declared_length(response: &Response) -> Option<usize> {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}
