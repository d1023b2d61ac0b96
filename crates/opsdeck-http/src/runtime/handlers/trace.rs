//! Plain views of the communication trace.

use axum::{extract::State, http::header, response::IntoResponse};

use crate::runtime::HttpRuntime;

/// GET /trace/logs - boxed text dump
pub async fn trace_logs(State(runtime): State<HttpRuntime>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        runtime.trace().dump(),
    )
}

/// GET /trace/logs/markdown - markdown table
pub async fn trace_logs_markdown(State(runtime): State<HttpRuntime>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        runtime.trace().dump_markdown(),
    )
}
