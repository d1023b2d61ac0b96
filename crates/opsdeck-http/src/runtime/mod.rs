//! # Runtime Module
//!
//! The HTTP face of an [`OpsDispatcher`]:
//!
//! - **[config]**: environment-driven [`HttpRuntimeConfig`]
//! - **[router]**: route table and middleware stack
//! - **[traffic]**: request/response recording into the trace store
//! - **[shutdown]**: SIGINT/SIGTERM handling for graceful shutdown
//!
//! ## Usage Pattern
//!
//! ```no_run
//! use opsdeck_http::runtime::{HttpRuntime, HttpRuntimeConfigBuilder};
//! use opsdeck_tools::OpsDispatcher;
//!
//! # async fn run(dispatcher: OpsDispatcher) -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpRuntimeConfigBuilder::from_env()?.build()?;
//! HttpRuntime::new(dispatcher).serve(config).await?;
//! # Ok(())
//! # }
//! ```

/// Environment-based runtime configuration.
pub mod config;
/// Server errors and JSON error bodies.
pub mod error;
/// HTTP request handlers organized by functionality.
pub mod handlers;
/// HTTP router configuration and route registration.
pub mod router;
/// Graceful shutdown signal handling.
pub mod shutdown;
/// Communication trace middleware.
pub mod traffic;

pub use config::{ConfigError, HttpRuntimeConfig, HttpRuntimeConfigBuilder};
pub use error::{ErrorResponse, ServerError};
pub use shutdown::{ShutdownSignal, record_shutdown, shutdown_signal, wait_for_signal};

use opsdeck_observability::BoundedTraceStore;
use opsdeck_tools::OpsDispatcher;
use std::{future::Future, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

/// Shared state behind every route.
///
/// Cheap to clone: the dispatcher only holds `Arc`s to the components.
#[derive(Clone)]
pub struct HttpRuntime {
    dispatcher: OpsDispatcher,
}

impl HttpRuntime {
    pub fn new(dispatcher: OpsDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &OpsDispatcher {
        &self.dispatcher
    }

    /// The trace store HTTP traffic is recorded into.
    pub fn trace(&self) -> &Arc<BoundedTraceStore> {
        &self.dispatcher.context().trace
    }

    /// Bind `config.bind_addr` and serve until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address is unavailable and
    /// `ServerError::Serve` if the accept loop fails.
    pub async fn serve(self, config: HttpRuntimeConfig) -> Result<(), ServerError> {
        let addr = config.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let shutdown = shutdown_signal(Arc::clone(self.trace()));
        self.serve_with_listener(listener, config, shutdown)
            .await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// In-flight requests are drained before this returns.
    pub async fn serve_with_listener<F>(
        self,
        listener: TcpListener,
        config: HttpRuntimeConfig,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        let trace = Arc::clone(self.trace());
        let app = self.router_with_config(&config);

        trace.add_system(format!("HTTP runtime listening on {}", local_addr));
        info!(addr = %local_addr, "HTTP runtime listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        trace.add_system("HTTP runtime stopped");
        info!("HTTP runtime stopped");
        Ok(())
    }
}
