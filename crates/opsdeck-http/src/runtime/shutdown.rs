//! Graceful shutdown handling for the HTTP runtime

use opsdeck_observability::BoundedTraceStore;
use std::{fmt, future::Future, sync::Arc};
use tokio::signal;
use tracing::{info, warn};

/// Process signal that asked the runtime to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT, usually Ctrl+C during local runs
    Interrupt,
    /// SIGTERM, sent by process supervisors
    Terminate,
}

impl ShutdownSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve with the first SIGINT or SIGTERM the process receives.
///
/// A handler that cannot be installed is logged and never fires; the
/// other one still does.
pub async fn wait_for_signal() -> ShutdownSignal {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => ShutdownSignal::Interrupt,
        _ = terminate => ShutdownSignal::Terminate,
    }
}

/// Wait for `signal`, then note it in the trace before connections drain.
pub async fn record_shutdown<F>(trace: Arc<BoundedTraceStore>, signal: F)
where
    F: Future<Output = ShutdownSignal>,
{
    let signal = signal.await;
    info!(%signal, "Shutdown signal received, draining in-flight requests");
    trace.add_system(format!("Received {}, draining in-flight requests", signal));
}

/// Shutdown future for [`HttpRuntime::serve`](super::HttpRuntime::serve).
///
/// # Examples
///
/// ```no_run
/// use opsdeck_http::runtime::shutdown_signal;
/// use opsdeck_observability::BoundedTraceStore;
/// use std::sync::Arc;
/// use tokio::net::TcpListener;
/// use axum::Router;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let trace = Arc::new(BoundedTraceStore::default());
///     let listener = TcpListener::bind("127.0.0.1:5000").await?;
///
///     axum::serve(listener, Router::new())
///         .with_graceful_shutdown(shutdown_signal(trace))
///         .await?;
///
///     Ok(())
/// }
/// ```
pub async fn shutdown_signal(trace: Arc<BoundedTraceStore>) {
    record_shutdown(trace, wait_for_signal()).await;
}
