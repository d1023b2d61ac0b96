//! HTTP router configuration
//!
//! This module provides router setup and route registration for the HTTP runtime.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::runtime::{
    HttpRuntime, HttpRuntimeConfig,
    handlers::{
        health_check, invoke_action, list_actions, list_resources, not_found, read_resource,
        trace_logs, trace_logs_markdown,
    },
    traffic::record_traffic,
};

impl HttpRuntime {
    /// Create the Axum router with all endpoints and middleware
    pub fn router(self) -> Router {
        self.router_with_config(&HttpRuntimeConfig::default())
    }

    /// Create the Axum router with custom configuration
    pub fn router_with_config(self, config: &HttpRuntimeConfig) -> Router {
        let routes = Router::new()
            .route("/health", get(health_check))
            .route("/actions", get(list_actions))
            .route("/actions/{name}", post(invoke_action))
            .route("/resources", get(list_resources))
            .route("/resources/{*uri}", get(read_resource))
            .route("/trace/logs", get(trace_logs))
            .route("/trace/logs/markdown", get(trace_logs_markdown))
            .fallback(not_found);

        // Layers added later wrap the earlier ones: the body limit applies
        // before the traffic recorder buffers the body.
        let mut router = routes
            .layer(middleware::from_fn_with_state(self.clone(), record_traffic))
            .with_state(self)
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(RequestBodyLimitLayer::new(config.max_body_size))
            .layer(TraceLayer::new_for_http());

        // Add CORS if enabled
        if config.enable_cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }
}
