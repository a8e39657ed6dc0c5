// std
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
// crates
use axum::{extract::DefaultBodyLimit, routing, Router, Server};
use da_proxy_store::Store;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;
// internal
use crate::http::handlers::{get, health, put, AppState};
use crate::http::paths;
use crate::{ApiError, Backend};

const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Configuration for the Http Server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxumBackendSettings {
    /// Socket where the server will be listening on for incoming requests.
    pub address: SocketAddr,
    /// Largest request body accepted before the store sees it.
    #[serde(with = "da_proxy_store::byte_size", default = "default_body_limit")]
    pub body_limit: usize,
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

impl Default for AxumBackendSettings {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([0, 0, 0, 0], 3100)),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

pub struct AxumBackend {
    listener: TcpListener,
    settings: AxumBackendSettings,
    store: Arc<dyn Store>,
}

impl AxumBackend {
    pub fn local_addr(&self) -> SocketAddr {
        // the socket is bound, so the address is always available
        self.listener
            .local_addr()
            .unwrap_or(self.settings.address)
    }
}

#[async_trait::async_trait]
impl Backend for AxumBackend {
    type Error = ApiError;
    type Settings = AxumBackendSettings;

    async fn new(settings: Self::Settings, store: Arc<dyn Store>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let listener = TcpListener::bind(settings.address)?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            settings,
            store,
        })
    }

    async fn serve(self, shutdown: CancellationToken) -> Result<(), Self::Error> {
        let local_addr = self.local_addr();
        let app = Router::new()
            .route(paths::HEALTH, routing::get(health))
            .route(paths::PUT, routing::post(put))
            .route("/put", routing::post(put))
            .route(paths::GET, routing::get(get))
            .layer(DefaultBodyLimit::max(self.settings.body_limit))
            .layer(TraceLayer::new_for_http())
            .with_state(AppState {
                store: self.store,
                shutdown: shutdown.clone(),
            });

        info!(address = %local_addr, "Proxy server listening");
        Server::from_tcp(self.listener)?
            .serve(app.into_make_service())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;
        info!("Proxy server stopped");
        Ok(())
    }
}
