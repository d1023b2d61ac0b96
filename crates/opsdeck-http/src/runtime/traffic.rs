//! Middleware recording HTTP traffic into the communication trace.
//!
//! Each request adds an incoming `HTTP` entry (method, path and query, with
//! a preview of the body) before it is routed, and an outgoing entry with
//! the response status and content type once the handler has answered.

use super::HttpRuntime;
use super::error::ErrorResponse;
use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use opsdeck_core::truncate;
use tracing::{debug, warn};

/// Characters of the request body kept in the trace entry.
pub const BODY_PREVIEW_CHARS: usize = 800;

pub async fn record_traffic(
    State(runtime): State<HttpRuntime>,
    request: Request,
    next: Next,
) -> Response {
    let trace = runtime.trace();
    let (parts, body) = request.into_parts();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    // The body limit layer wraps this one, so an oversized body surfaces
    // here as a read error.
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(method = %parts.method, path = %target, error = %e, "Failed to read request body");
            trace.add_request(parts.method.as_str(), &target, None);
            let response = ErrorResponse::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body could not be read",
            )
            .into_response();
            trace.add_response(response.status().as_u16(), content_type(&response));
            return response;
        }
    };

    let preview = (!bytes.is_empty())
        .then(|| truncate(&String::from_utf8_lossy(&bytes), BODY_PREVIEW_CHARS));
    trace.add_request(parts.method.as_str(), &target, preview.as_deref());

    let method = parts.method.clone();
    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    let status = response.status().as_u16();
    trace.add_response(status, content_type(&response));
    debug!(method = %method, path = %target, status, "HTTP exchange recorded");
    response
}

fn content_type(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}
