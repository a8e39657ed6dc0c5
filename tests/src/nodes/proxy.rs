// std
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
// crates
use bytes::Bytes;
use da_commitments::OpCommitment;
use da_proxy::{Config, DaProxy};
use da_proxy_api::http::{backend::axum::AxumBackendSettings, paths};
use da_proxy_store::client::EigenDaClientConfig;
use da_proxy_store::{MemStoreConfig, StoreSettings};
use da_proxy_tracing::{FilterLayer, LoggerLayer, TracingSettings};
use da_verifier::VerifierConfig;
use once_cell::sync::Lazy;
use reqwest::{Client, Response, StatusCode};
use tempfile::TempDir;
use tracing::Level;
// internal

static CLIENT: Lazy<Client> = Lazy::new(Client::new);

pub const SRS_ORDER: usize = 256;
pub const MAX_BLOB_LENGTH: usize = 4096;
const BODY_LIMIT: usize = 64 * 1024;
const SIGNER_KEY: &str = "0x8f6ab47e47e4c8c4eaf5a6c14b9ec2b6d4b3f1b6f1e3a7b28cc52c4a0f3d2e11";

/// Proxy served from this process, one per test.
pub struct ProxyNode {
    addr: SocketAddr,
    proxy: DaProxy,
    _tempdir: Option<TempDir>,
}

impl ProxyNode {
    pub async fn spawn(config: Config) -> Self {
        let proxy = DaProxy::start(config).await.unwrap();
        let node = Self {
            addr: proxy.local_addr(),
            proxy,
            _tempdir: None,
        };
        node.wait_online().await;
        node
    }

    /// In-memory proxy with its own setup cache.
    pub async fn spawn_memstore(blob_expiration: Duration) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = base_config(dir.path());
        config.store.memstore = MemStoreConfig {
            enabled: true,
            blob_expiration,
            // expiry is observed on read
            sweep_interval: Some(Duration::from_secs(3600)),
        };
        let mut node = Self::spawn(config).await;
        node._tempdir = Some(dir);
        node
    }

    /// Proxy dispersing to `disperser_addr`. `srs_cache` must hold the disperser's setup.
    pub async fn spawn_eigenda(disperser_addr: SocketAddr, srs_cache: &Path) -> Self {
        let mut config = base_config(srs_cache);
        config.store.eigenda = Some(EigenDaClientConfig {
            rpc: disperser_addr.to_string(),
            disable_tls: true,
            signer_private_key_hex: SIGNER_KEY.to_string(),
            response_timeout: Duration::from_secs(5),
            status_query_timeout: Duration::from_secs(5),
            status_query_retry_interval: Duration::from_millis(20),
        });
        Self::spawn(config).await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn put(&self, data: impl Into<Bytes>) -> Response {
        CLIENT
            .post(format!("http://{}{}", self.addr, paths::PUT))
            .body(data.into())
            .send()
            .await
            .unwrap()
    }

    /// Put `data` and decode the returned commitment.
    pub async fn put_ok(&self, data: impl Into<Bytes>) -> OpCommitment {
        let response = self.put(data).await;
        assert_eq!(response.status(), StatusCode::OK);
        OpCommitment::decode(&response.bytes().await.unwrap()).unwrap()
    }

    pub async fn get(&self, commitment: &str, domain: Option<&str>) -> Response {
        let mut url = format!("http://{}/get/{commitment}", self.addr);
        if let Some(domain) = domain {
            url.push_str(&format!("?domain={domain}"));
        }
        CLIENT.get(url).send().await.unwrap()
    }

    pub async fn stop(self) {
        self.proxy.stop().await.unwrap();
    }

    async fn wait_online(&self) {
        let url = format!("http://{}{}", self.addr, paths::HEALTH);
        tokio::time::timeout(crate::adjust_timeout(Duration::from_secs(10)), async {
            loop {
                let res = CLIENT.get(&url).send().await;
                if res.is_ok_and(|res| res.status().is_success()) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        })
        .await
        .unwrap();
    }
}

pub fn base_config(srs_cache: &Path) -> Config {
    Config {
        tracing: TracingSettings::new(LoggerLayer::None, FilterLayer::None, Level::INFO),
        http: AxumBackendSettings {
            address: "127.0.0.1:0".parse().unwrap(),
            body_limit: BODY_LIMIT,
        },
        store: StoreSettings {
            max_blob_length: MAX_BLOB_LENGTH,
            put_blob_encoding_version: 0,
            verifier: verifier_config(srs_cache),
            eigenda: None,
            memstore: MemStoreConfig::default(),
        },
    }
}

pub fn verifier_config(srs_cache: &Path) -> VerifierConfig {
    VerifierConfig {
        srs_path: None,
        cache_dir: Some(srs_cache.to_path_buf()),
        srs_order: SRS_ORDER,
        num_workers: 2,
    }
}
