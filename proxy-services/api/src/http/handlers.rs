// std
use std::sync::Arc;
// crates
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use da_commitments::OpCommitment;
use da_proxy_store::{Domain, Store, StoreError};
use hyper::StatusCode;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
// internal

#[derive(Clone)]
pub(crate) struct AppState {
    pub store: Arc<dyn Store>,
    /// Parent of every request token, fired when the server shuts down.
    pub shutdown: CancellationToken,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GetQuery {
    #[serde(default)]
    domain: Domain,
}

pub(crate) fn status_code(error: &StoreError) -> StatusCode {
    match error {
        StoreError::Commitment(_)
        | StoreError::UnsupportedCommitment(_)
        | StoreError::Certificate(_) => StatusCode::BAD_REQUEST,
        StoreError::BlobTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Expired => StatusCode::GONE,
        StoreError::Verification(_) | StoreError::Codec(_) | StoreError::VerificationTask(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        StoreError::BackendUnavailable(_) | StoreError::Cancelled => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        StoreError::DispersalFailed { .. } => StatusCode::BAD_GATEWAY,
        StoreError::DispersalTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

fn error_response(error: StoreError) -> Response {
    let status = status_code(&error);
    if status.is_server_error() {
        warn!(%status, error = %error, "Store request failed");
    } else {
        debug!(%status, error = %error, "Store request rejected");
    }
    (status, error.to_string()).into_response()
}

pub(crate) async fn health() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn put(State(state): State<AppState>, body: Bytes) -> Response {
    let cancel = state.shutdown.child_token();
    match state.store.put(&cancel, body).await {
        Ok(commitment) => (StatusCode::OK, commitment.encode()).into_response(),
        Err(e) => error_response(e),
    }
}

pub(crate) async fn get(
    State(state): State<AppState>,
    Path(commitment): Path<String>,
    Query(query): Query<GetQuery>,
) -> Response {
    let commitment = match OpCommitment::from_hex(&commitment) {
        Ok(commitment) => commitment,
        Err(e) => return error_response(e.into()),
    };
    let cancel = state.shutdown.child_token();
    match state.store.get(&cancel, &commitment, query.domain).await {
        Ok(data) => (StatusCode::OK, data).into_response(),
        Err(e) => error_response(e),
    }
}
