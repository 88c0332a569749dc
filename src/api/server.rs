//! Summary proxy server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::summary_api_router;
use crate::api::types::ApiContext;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind summary server on {addr}: {reason}")]
    Bind { addr: SocketAddr, reason: String },
    #[error("Failed to get server address: {0}")]
    Address(String),
}

/// Metadata for a running server.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub server_addr: SocketAddr,
    pub started_at: String,
}

/// Handle to a running summary proxy server.
pub struct SummaryServer {
    pub info: ServerInfo,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SummaryServer {
    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Summary server shutdown signal sent");
        }
    }

    /// Wait until the server task has exited.
    pub async fn stopped(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Summary server task failed");
            }
        }
    }
}

/// Bind `addr` (port 0 picks an ephemeral port) and serve in the background.
pub async fn start_summary_server(
    ctx: ApiContext,
    addr: SocketAddr,
) -> Result<SummaryServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr,
            reason: e.to_string(),
        })?;
    let server_addr = listener
        .local_addr()
        .map_err(|e| ServerError::Address(e.to_string()))?;

    if !ctx.client.has_credential() {
        tracing::warn!("OPENAI_API_KEY is not set; summary requests will fail with 500");
    }

    let app = summary_api_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Summary server received shutdown signal");
        };

        tracing::info!(%server_addr, "Summary server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Summary server error: {e}");
        }

        tracing::info!("Summary server stopped");
    });

    Ok(SummaryServer {
        info: ServerInfo {
            server_addr,
            started_at: chrono::Utc::now().to_rfc3339(),
        },
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}
