// std
use std::path::PathBuf;
// crates
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Result};
use da_proxy_api::http::backend::axum::AxumBackendSettings;
use da_proxy_store::StoreSettings;
use da_proxy_tracing::{
    logging::local::{FileConfig, FileRotation},
    LoggerLayer, TracingSettings,
};
use serde::{Deserialize, Serialize};
use tracing::Level;
// internal

#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LoggerLayerType {
    File,
    #[default]
    Stdout,
    Stderr,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct LogArgs {
    /// Directory for the File backend
    #[clap(long = "log-dir", env = "LOG_DIR", required_if_eq("backend", "file"))]
    directory: Option<PathBuf>,

    /// Prefix for the File backend
    #[clap(long = "log-path", env = "LOG_PATH")]
    prefix: Option<PathBuf>,

    /// Backend type
    #[clap(long = "log-backend", env = "LOG_BACKEND", value_enum)]
    backend: Option<LoggerLayerType>,

    #[clap(long = "log-level", env = "LOG_LEVEL")]
    level: Option<String>,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ProxyArgs {
    /// Serve from the in-memory store instead of EigenDA
    #[clap(long = "memstore", env = "MEMSTORE_ENABLED")]
    memstore: bool,

    /// Port the HTTP server binds to
    #[clap(long = "port", env = "PORT")]
    port: Option<u16>,

    /// Disperser `host:port`
    #[clap(long = "eigenda-rpc", env = "EIGENDA_RPC")]
    eigenda_rpc: Option<String>,

    /// Hex encoded key identifying this proxy to the disperser
    #[clap(long = "eigenda-signer-key", env = "EIGENDA_SIGNER_PRIVATE_KEY_HEX")]
    signer_private_key_hex: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tracing: TracingSettings,
    pub http: AxumBackendSettings,
    pub store: StoreSettings,
}

impl Config {
    pub fn update_from_args(mut self, log_args: LogArgs, proxy_args: ProxyArgs) -> Result<Self> {
        update_tracing(&mut self.tracing, log_args)?;
        update_proxy(&mut self, proxy_args)?;
        Ok(self)
    }
}

pub fn update_tracing(tracing: &mut TracingSettings, tracing_args: LogArgs) -> Result<()> {
    let LogArgs {
        backend,
        directory,
        prefix,
        level,
    } = tracing_args;

    // Override the file config with the one from env variables.
    if let Some(backend) = backend {
        tracing.logger = match backend {
            LoggerLayerType::File => LoggerLayer::File(FileConfig {
                directory: directory.ok_or_else(|| eyre!("File backend requires a directory."))?,
                prefix,
                rotation: FileRotation::default(),
            }),
            LoggerLayerType::Stdout => LoggerLayer::Stdout,
            LoggerLayerType::Stderr => LoggerLayer::Stderr,
        }
    };

    if let Some(level_str) = level {
        tracing.level = level_str
            .parse::<Level>()
            .map_err(|_| eyre!("Invalid log level provided."))?;
    }
    Ok(())
}

pub fn update_proxy(config: &mut Config, proxy_args: ProxyArgs) -> Result<()> {
    let ProxyArgs {
        memstore,
        port,
        eigenda_rpc,
        signer_private_key_hex,
    } = proxy_args;

    if memstore {
        config.store.memstore.enabled = true;
    }
    if let Some(port) = port {
        config.http.address.set_port(port);
    }
    if eigenda_rpc.is_none() && signer_private_key_hex.is_none() {
        return Ok(());
    }
    let eigenda = config
        .store
        .eigenda
        .as_mut()
        .ok_or_else(|| eyre!("EigenDA overrides require an `eigenda` section in the config."))?;
    if let Some(rpc) = eigenda_rpc {
        eigenda.rpc = rpc;
    }
    if let Some(key) = signer_private_key_hex {
        eigenda.signer_private_key_hex = key;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = include_str!("../config/config.yaml");

    fn config() -> Config {
        serde_yaml::from_str(CONFIG).unwrap()
    }

    #[test]
    fn bundled_config_parses() {
        let config = config();
        assert_eq!(config.http.address.port(), 3100);
        assert!(!config.store.memstore.enabled);
        let eigenda = config.store.eigenda.as_ref().unwrap();
        assert_eq!(eigenda.rpc, "disperser-holesky.eigenda.xyz:443");
        assert_eq!(config.tracing.logger, LoggerLayer::Stdout);
    }

    #[test]
    fn args_override_the_file() {
        let log_args = LogArgs {
            backend: Some(LoggerLayerType::Stderr),
            level: Some("debug".into()),
            ..Default::default()
        };
        let proxy_args = ProxyArgs {
            memstore: true,
            port: Some(4242),
            signer_private_key_hex: Some("0xabcd".into()),
            ..Default::default()
        };
        let config = config().update_from_args(log_args, proxy_args).unwrap();
        assert_eq!(config.tracing.logger, LoggerLayer::Stderr);
        assert_eq!(config.tracing.level, Level::DEBUG);
        assert!(config.store.memstore.enabled);
        assert_eq!(config.http.address.port(), 4242);
        assert_eq!(
            config.store.eigenda.unwrap().signer_private_key_hex,
            "0xabcd"
        );
    }

    #[test]
    fn invalid_overrides() {
        let log_args = LogArgs {
            backend: Some(LoggerLayerType::File),
            ..Default::default()
        };
        assert!(config()
            .update_from_args(log_args, ProxyArgs::default())
            .is_err());

        let log_args = LogArgs {
            level: Some("chatty".into()),
            ..Default::default()
        };
        assert!(config()
            .update_from_args(log_args, ProxyArgs::default())
            .is_err());

        let mut config = config();
        config.store.eigenda = None;
        let proxy_args = ProxyArgs {
            eigenda_rpc: Some("localhost:3200".into()),
            ..Default::default()
        };
        assert!(config
            .update_from_args(LogArgs::default(), proxy_args)
            .is_err());
    }
}
