// std
use std::sync::Arc;
use std::time::Duration;
// crates
use bytes::Bytes;
use da_commitments::bytes_serde::bytes_vec;
use da_commitments::{keccak256, BlobInfo};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
// internal

const DISPERSE_BLOB: &str = "/v1/blobs/disperse";
const BLOB_STATUS: &str = "/v1/blobs/status";
const RETRIEVE_BLOB: &str = "/v1/blobs/retrieve";

const ACCOUNT_ID_HEADER: &str = "account-id";

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Disperser error: {0}")]
    Server(String),
    #[error("Blob not found on the disperser")]
    NotFound,
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("Invalid signer key: {0}")]
    SignerKey(String),
}

/// Dispersal state of a blob as reported by the disperser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlobStatus {
    Unknown,
    Processing,
    Dispersing,
    Confirmed,
    Finalized,
    Failed,
    InsufficientSignatures,
}

impl BlobStatus {
    /// The blob has a certificate and can be retrieved.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Finalized)
    }

    /// The disperser gave up on the blob.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed | Self::InsufficientSignatures)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisperseBlobRequest {
    #[serde(with = "bytes_vec")]
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisperseBlobReply {
    pub result: BlobStatus,
    #[serde(with = "bytes_vec")]
    pub request_id: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobStatusRequest {
    #[serde(with = "bytes_vec")]
    pub request_id: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobStatusReply {
    pub status: BlobStatus,
    /// Only present once the blob is confirmed.
    #[serde(default)]
    pub info: Option<BlobInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveBlobRequest {
    #[serde(with = "bytes_vec")]
    pub batch_header_hash: Vec<u8>,
    pub blob_index: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveBlobReply {
    #[serde(with = "bytes_vec")]
    pub data: Vec<u8>,
}

/// Disperser operations the durable store relies on.
#[async_trait::async_trait]
pub trait DisperserClient: Send + Sync {
    /// Submit an encoded blob, returns the request id used to follow its dispersal.
    async fn disperse_blob(&self, blob: &[u8]) -> Result<DisperseBlobReply, ClientError>;

    async fn get_blob_status(&self, request_id: &[u8]) -> Result<BlobStatusReply, ClientError>;

    /// Fetch an encoded blob by its batch header hash and index within the batch.
    async fn retrieve_blob(
        &self,
        batch_header_hash: &[u8],
        blob_index: u32,
    ) -> Result<Bytes, ClientError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EigenDaClientConfig {
    /// Disperser `host:port`.
    pub rpc: String,
    #[serde(default)]
    pub disable_tls: bool,
    #[serde(default)]
    pub signer_private_key_hex: String,
    #[serde(with = "humantime_serde", default = "default_response_timeout")]
    pub response_timeout: Duration,
    #[serde(with = "humantime_serde", default = "default_status_query_timeout")]
    pub status_query_timeout: Duration,
    #[serde(with = "humantime_serde", default = "default_status_query_retry_interval")]
    pub status_query_retry_interval: Duration,
}

fn default_response_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_status_query_timeout() -> Duration {
    Duration::from_secs(45 * 60)
}

fn default_status_query_retry_interval() -> Duration {
    Duration::from_secs(5)
}

impl EigenDaClientConfig {
    pub fn base_url(&self) -> Result<Url, ClientError> {
        let scheme = if self.disable_tls { "http" } else { "https" };
        Ok(Url::parse(&format!("{scheme}://{}/", self.rpc))?)
    }
}

/// JSON over HTTP disperser client.
#[derive(Clone)]
pub struct HttpDisperserClient {
    client: Arc<Client>,
    base_url: Url,
}

impl HttpDisperserClient {
    pub fn new(config: &EigenDaClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url()?;
        let key = const_hex::decode(config.signer_private_key_hex.trim())
            .map_err(|e| ClientError::SignerKey(e.to_string()))?;
        if key.is_empty() {
            return Err(ClientError::SignerKey("missing signer key".to_string()));
        }
        let account_id = HeaderValue::from_str(&const_hex::encode_prefixed(keccak256(&key)))
            .map_err(|e| ClientError::SignerKey(e.to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCOUNT_ID_HEADER, account_id);
        let client = ClientBuilder::new()
            .timeout(config.response_timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    async fn post<Req, Res>(&self, path: &str, request_body: &Req) -> Result<Res, ClientError>
    where
        Req: Serialize + ?Sized + Send + Sync,
        Res: DeserializeOwned + Send + Sync,
    {
        let request_url = self.base_url.join(path.trim_start_matches('/'))?;
        let response = self
            .client
            .post(request_url)
            .json(request_body)
            .send()
            .await?;
        let status = response.status();
        match status {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            _ => {
                let body = response.text().await?;
                Err(ClientError::Server(format!(
                    "Unexpected response [{status}]: {body}"
                )))
            }
        }
    }
}

#[async_trait::async_trait]
impl DisperserClient for HttpDisperserClient {
    async fn disperse_blob(&self, blob: &[u8]) -> Result<DisperseBlobReply, ClientError> {
        let request = DisperseBlobRequest {
            data: blob.to_vec(),
        };
        self.post(DISPERSE_BLOB, &request).await
    }

    async fn get_blob_status(&self, request_id: &[u8]) -> Result<BlobStatusReply, ClientError> {
        let request = BlobStatusRequest {
            request_id: request_id.to_vec(),
        };
        self.post(BLOB_STATUS, &request).await
    }

    async fn retrieve_blob(
        &self,
        batch_header_hash: &[u8],
        blob_index: u32,
    ) -> Result<Bytes, ClientError> {
        let request = RetrieveBlobRequest {
            batch_header_hash: batch_header_hash.to_vec(),
            blob_index,
        };
        let reply: RetrieveBlobReply = self.post(RETRIEVE_BLOB, &request).await?;
        Ok(reply.data.into())
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! Scriptable disperser used to drive the durable store without a network.

    use super::*;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct MockDisperserClient {
        statuses: Mutex<VecDeque<Result<BlobStatusReply, ClientError>>>,
        blobs: Mutex<HashMap<(Vec<u8>, u32), Bytes>>,
        dispersed: Mutex<Vec<Bytes>>,
        stall_retrievals: AtomicBool,
        pub disperse_calls: AtomicUsize,
        pub status_calls: AtomicUsize,
        pub retrieve_calls: AtomicUsize,
    }

    impl MockDisperserClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a status reply. Once the queue is drained the last reply keeps being returned,
        /// `Processing` if nothing was ever queued.
        pub fn push_status(&self, reply: Result<BlobStatusReply, ClientError>) {
            self.statuses.lock().push_back(reply);
        }

        pub fn insert_blob(&self, batch_header_hash: &[u8], blob_index: u32, blob: Bytes) {
            self.blobs
                .lock()
                .insert((batch_header_hash.to_vec(), blob_index), blob);
        }

        /// Retrievals issued from now on never complete.
        pub fn stall_retrievals(&self) {
            self.stall_retrievals.store(true, Ordering::SeqCst);
        }

        pub fn dispersed(&self) -> Vec<Bytes> {
            self.dispersed.lock().clone()
        }

        pub fn calls(&self) -> usize {
            self.disperse_calls.load(Ordering::SeqCst)
                + self.status_calls.load(Ordering::SeqCst)
                + self.retrieve_calls.load(Ordering::SeqCst)
        }
    }

    fn clone_reply(
        reply: &Result<BlobStatusReply, ClientError>,
    ) -> Result<BlobStatusReply, ClientError> {
        match reply {
            Ok(reply) => Ok(reply.clone()),
            Err(e) => Err(ClientError::Server(e.to_string())),
        }
    }

    #[async_trait::async_trait]
    impl DisperserClient for MockDisperserClient {
        async fn disperse_blob(&self, blob: &[u8]) -> Result<DisperseBlobReply, ClientError> {
            let id = self.disperse_calls.fetch_add(1, Ordering::SeqCst);
            self.dispersed.lock().push(Bytes::copy_from_slice(blob));
            Ok(DisperseBlobReply {
                result: BlobStatus::Processing,
                request_id: (id as u64).to_be_bytes().to_vec(),
            })
        }

        async fn get_blob_status(
            &self,
            _request_id: &[u8],
        ) -> Result<BlobStatusReply, ClientError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let mut statuses = self.statuses.lock();
            match statuses.len() {
                0 => Ok(BlobStatusReply {
                    status: BlobStatus::Processing,
                    info: None,
                }),
                1 => statuses.front().map(clone_reply).unwrap_or_else(|| {
                    Err(ClientError::Server("status queue drained".to_string()))
                }),
                _ => statuses.pop_front().unwrap_or_else(|| {
                    Err(ClientError::Server("status queue drained".to_string()))
                }),
            }
        }

        async fn retrieve_blob(
            &self,
            batch_header_hash: &[u8],
            blob_index: u32,
        ) -> Result<Bytes, ClientError> {
            self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
            if self.stall_retrievals.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            self.blobs
                .lock()
                .get(&(batch_header_hash.to_vec(), blob_index))
                .cloned()
                .ok_or(ClientError::NotFound)
        }
    }
}
