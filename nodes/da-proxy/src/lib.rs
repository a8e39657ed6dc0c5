pub mod config;

// std
use std::net::SocketAddr;
// crates
use color_eyre::eyre::Result;
use da_proxy_api::ServerHandle;
use da_proxy_store::load_store;
use tracing::info;
// internal
pub use config::{Config, LogArgs, ProxyArgs};

/// A running proxy: the selected store behind the HTTP server.
pub struct DaProxy {
    server: ServerHandle,
}

impl DaProxy {
    /// Build the store and start serving. Tracing is left to the caller.
    pub async fn start(config: Config) -> Result<Self> {
        let store = load_store(config.store).await?;
        let server = da_proxy_api::spawn(config.http, store).await?;
        info!(address = %server.local_addr(), "DA proxy started");
        Ok(Self { server })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    pub async fn stop(self) -> Result<()> {
        self.server.stop().await?;
        info!("DA proxy stopped");
        Ok(())
    }
}
