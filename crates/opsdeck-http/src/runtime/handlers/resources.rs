//! Resource discovery and reads.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use opsdeck_core::{ResourceContent, ResourceDescriptor};

use crate::runtime::HttpRuntime;

/// GET /resources - templates of every registered resource
pub async fn list_resources(State(runtime): State<HttpRuntime>) -> Json<Vec<ResourceDescriptor>> {
    Json(runtime.dispatcher().list_resources())
}

/// GET /resources/{*uri} - read one resource
///
/// URIs no template matches answer 404 with the fallback content, which
/// lists the available templates.
pub async fn read_resource(
    State(runtime): State<HttpRuntime>,
    Path(uri): Path<String>,
) -> (StatusCode, Json<ResourceContent>) {
    let content = runtime.dispatcher().read(&uri);
    let status = if content.found {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (status, Json(content))
}
