pub mod http;

// std
use std::net::SocketAddr;
use std::sync::Arc;
// crates
use da_proxy_store::Store;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
// internal
use crate::http::backend::axum::{AxumBackend, AxumBackendSettings};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to bind server address: {0}")]
    Bind(#[from] std::io::Error),
    #[error(transparent)]
    Server(#[from] hyper::Error),
    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A simple abstraction so that we can easily
/// change the underlying http server
#[async_trait::async_trait]
pub trait Backend {
    type Error: std::error::Error + Send + Sync + 'static;
    type Settings: Clone + Send + Sync + 'static;

    async fn new(settings: Self::Settings, store: Arc<dyn Store>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    /// Serve requests until `shutdown` fires, then drain in flight requests.
    async fn serve(self, shutdown: CancellationToken) -> Result<(), Self::Error>;
}

/// Running server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<Result<(), ApiError>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Stop accepting requests and wait for the in flight ones. Store operations still running
    /// are cancelled.
    pub async fn stop(self) -> Result<(), ApiError> {
        self.shutdown.cancel();
        self.task.await?
    }
}

/// Bind and start serving in the background. Port `0` picks a free port, see
/// [`ServerHandle::port`].
pub async fn spawn(
    settings: AxumBackendSettings,
    store: Arc<dyn Store>,
) -> Result<ServerHandle, ApiError> {
    let backend = AxumBackend::new(settings, store).await?;
    let local_addr = backend.local_addr();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(backend.serve(shutdown.clone()));
    Ok(ServerHandle {
        local_addr,
        shutdown,
        task,
    })
}
