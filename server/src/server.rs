//! Server setup and lifecycle.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use config::Config;

use crate::error::{Result, ServerError};
use crate::routes::create_router;
use crate::state::AppState;
use crate::telemetry::install_metrics_recorder;

/// The Mindnote HTTP server.
pub struct MindnoteServer {
    state: Arc<AppState>,
}

impl MindnoteServer {
    /// Builds the model adapters and, when enabled, the metrics recorder.
    ///
    /// Every failure here is a configuration error: the server never binds.
    pub async fn new(config: Config) -> Result<Self> {
        let metrics_enabled = config.observability.metrics_enabled;
        let mut state = AppState::new(config).await?;

        if metrics_enabled {
            state = state.with_metrics(install_metrics_recorder()?);
        }

        Ok(Self::with_state(Arc::new(state)))
    }

    /// Creates a server instance from an existing `AppState`.
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Runs the HTTP server until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let server = &self.state.config.server;
        let router = create_router(self.state.clone());

        let listener = TcpListener::bind((server.host.as_str(), server.port))
            .await
            .map_err(|e| {
                let target = format!("{}:{}", server.host, server.port);
                ServerError::Server(format!("Failed to bind to {target}: {e}"))
            })?;
        let addr = listener
            .local_addr()
            .map_err(|e| ServerError::Server(format!("Failed to read bound address: {e}")))?;

        tracing::info!(%addr, "Mindnote server starting");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {e}")))?;

        tracing::info!("Mindnote server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM. A handler that cannot be
/// installed never resolves, leaving the other one in charge.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}

/// Entry point for running the server from a resolved configuration.
pub async fn run_server(config: Config) -> Result<()> {
    let server = MindnoteServer::new(config).await?;
    server.run().await
}
