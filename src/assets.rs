//! Static asset origin.
//!
//! The "produce next response" stage the interceptor wraps: resolves request
//! paths against the configured document root and serves file contents.
//! Directory requests get `index.html`; extensionless paths also try a
//! `.html` sibling.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use log::{debug, error};

use crate::config::INDEX_FILE;
use crate::server::AppState;

/// Serves one asset from the document root.
pub(crate) async fn serve_asset(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let method = request.method();
    if method != Method::GET && method != Method::HEAD {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    }

    let uri_path = request.uri().path();
    let Some(relative) = sanitize_request_path(uri_path) else {
        debug!("Rejected asset path {uri_path}");
        return not_found();
    };

    let mut file_path = state.root.join(relative);
    if is_directory(&file_path).await {
        file_path.push(INDEX_FILE);
    }

    match read_asset(&file_path).await {
        ReadOutcome::Found(bytes) => asset_response(&file_path, bytes),
        ReadOutcome::Missing => {
            // Pretty URLs: /about falls back to /about.html
            if file_path.extension().is_none() {
                let with_html = file_path.with_extension("html");
                if let ReadOutcome::Found(bytes) = read_asset(&with_html).await {
                    return asset_response(&with_html, bytes);
                }
            }
            not_found()
        }
        ReadOutcome::Failed(err) => {
            error!("Failed to read asset {}: {err}", file_path.display());
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

enum ReadOutcome {
    Found(Vec<u8>),
    Missing,
    Failed(std::io::Error),
}

async fn read_asset(path: &Path) -> ReadOutcome {
    match tokio::fs::read(path).await {
        Ok(bytes) => ReadOutcome::Found(bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => ReadOutcome::Missing,
        Err(err) => ReadOutcome::Failed(err),
    }
}

async fn is_directory(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

/// Turns a request path into a safe, root-relative path.
///
/// Returns `None` for paths that percent-decode badly, embed NUL bytes, or
/// try to climb out of the document root.
fn sanitize_request_path(uri_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(uri_path).ok()?;
    if decoded.contains('\0') {
        return None;
    }

    let mut clean = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            segment => clean.push(segment),
        }
    }
    Some(clean)
}

fn asset_response(path: &Path, bytes: Vec<u8>) -> Response {
    let content_type = content_type_for(path);
    let length = bytes.len();

    let mut response = Response::new(Body::from(bytes));
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    // Declared up front so the interceptor's oversize gate can see it
    if let Ok(value) = HeaderValue::from_str(&length.to_string()) {
        response.headers_mut().insert(header::CONTENT_LENGTH, value);
    }
    response
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Maps a file extension to a content type.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("json") | Some("map") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("pdf") => "application/pdf",
        Some("wasm") => "application/wasm",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
