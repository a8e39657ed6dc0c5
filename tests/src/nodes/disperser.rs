// std
use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
// crates
use axum::{extract::State, http::StatusCode, routing, Json, Router, Server};
use da_commitments::{keccak256, BlobHeader, BlobInfo, BlobVerificationProof};
use da_proxy_store::client::{
    BlobStatus, BlobStatusReply, BlobStatusRequest, DisperseBlobReply, DisperseBlobRequest,
    RetrieveBlobReply, RetrieveBlobRequest,
};
use da_verifier::{encode_blob, EncodingVersion, Verifier, BYTES_PER_FIELD_ELEMENT};
use parking_lot::Mutex;
use tokio::sync::oneshot;
// internal
use super::proxy::verifier_config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisperserMode {
    /// Confirm every blob and serve it back unchanged.
    Honest,
    /// Report every dispersal as failed.
    Failing,
    /// Confirm blobs but serve different data on retrieval.
    Tampering,
}

struct Dispersal {
    blob: Vec<u8>,
    info: BlobInfo,
}

struct DisperserState {
    mode: DisperserMode,
    verifier: Verifier,
    next_blob_index: AtomicU32,
    requests: Mutex<HashMap<Vec<u8>, Dispersal>>,
}

/// Disperser speaking the JSON API the proxy's client expects. Blobs are confirmed on the first
/// status query.
pub struct FakeDisperser {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl FakeDisperser {
    /// Builds the setup tables into `srs_cache`, a proxy started afterwards with the same cache
    /// commits with the same tables.
    pub async fn spawn(mode: DisperserMode, srs_cache: &Path) -> Self {
        let config = verifier_config(srs_cache);
        let verifier = tokio::task::spawn_blocking(move || Verifier::new(&config))
            .await
            .unwrap()
            .unwrap();
        let state = Arc::new(DisperserState {
            mode,
            verifier,
            next_blob_index: AtomicU32::new(0),
            requests: Mutex::new(HashMap::new()),
        });
        let app = Router::new()
            .route("/v1/blobs/disperse", routing::post(disperse))
            .route("/v1/blobs/status", routing::post(status))
            .route("/v1/blobs/retrieve", routing::post(retrieve))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, signal) = oneshot::channel();
        let server = Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .with_graceful_shutdown(async {
                signal.await.ok();
            });
        tokio::spawn(server);
        Self {
            addr,
            shutdown: Some(shutdown),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for FakeDisperser {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn disperse(
    State(state): State<Arc<DisperserState>>,
    Json(request): Json<DisperseBlobRequest>,
) -> Result<Json<DisperseBlobReply>, (StatusCode, String)> {
    let commitment = state
        .verifier
        .commit(&request.data)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let blob_index = state.next_blob_index.fetch_add(1, Ordering::SeqCst);
    let batch_header_hash = keccak256(commitment.as_bytes()).to_vec();
    let info = BlobInfo {
        blob_header: BlobHeader {
            commitment,
            data_length: (request.data.len() / BYTES_PER_FIELD_ELEMENT) as u32,
        },
        blob_verification_proof: BlobVerificationProof {
            batch_id: 1,
            blob_index,
            batch_header_hash,
            inclusion_proof: vec![0xAB; 32],
            quorum_indexes: vec![0, 1],
        },
    };
    let request_id = keccak256(&blob_index.to_be_bytes()).to_vec();
    state.requests.lock().insert(
        request_id.clone(),
        Dispersal {
            blob: request.data,
            info,
        },
    );
    Ok(Json(DisperseBlobReply {
        result: BlobStatus::Processing,
        request_id,
    }))
}

async fn status(
    State(state): State<Arc<DisperserState>>,
    Json(request): Json<BlobStatusRequest>,
) -> Result<Json<BlobStatusReply>, StatusCode> {
    let requests = state.requests.lock();
    let dispersal = requests
        .get(&request.request_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let reply = match state.mode {
        DisperserMode::Failing => BlobStatusReply {
            status: BlobStatus::Failed,
            info: None,
        },
        DisperserMode::Honest | DisperserMode::Tampering => BlobStatusReply {
            status: BlobStatus::Confirmed,
            info: Some(dispersal.info.clone()),
        },
    };
    Ok(Json(reply))
}

async fn retrieve(
    State(state): State<Arc<DisperserState>>,
    Json(request): Json<RetrieveBlobRequest>,
) -> Result<Json<RetrieveBlobReply>, StatusCode> {
    let requests = state.requests.lock();
    let dispersal = requests
        .values()
        .find(|dispersal| {
            let proof = &dispersal.info.blob_verification_proof;
            proof.batch_header_hash == request.batch_header_hash
                && proof.blob_index == request.blob_index
        })
        .ok_or(StatusCode::NOT_FOUND)?;
    let data = match state.mode {
        DisperserMode::Tampering => encode_blob(EncodingVersion::V0, b"not what was dispersed")
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        DisperserMode::Honest | DisperserMode::Failing => dispersal.blob.clone(),
    };
    Ok(Json(RetrieveBlobReply { data }))
}
