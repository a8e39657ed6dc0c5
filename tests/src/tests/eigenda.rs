use reqwest::StatusCode;
use tests::{DisperserMode, FakeDisperser, ProxyNode};

const DATA: &[u8] = b"Four score and seven years ago";

async fn spawn(mode: DisperserMode) -> (FakeDisperser, ProxyNode, tempfile::TempDir) {
    let srs_cache = tempfile::tempdir().unwrap();
    let disperser = FakeDisperser::spawn(mode, srs_cache.path()).await;
    let node = ProxyNode::spawn_eigenda(disperser.addr(), srs_cache.path()).await;
    (disperser, node, srs_cache)
}

#[tokio::test]
async fn disperse_and_retrieve() {
    let (_disperser, node, _srs_cache) = spawn(DisperserMode::Honest).await;

    let commitment = node.put_ok(DATA).await;
    let certificate = commitment.as_eigenda().unwrap().certificate().unwrap();
    assert_eq!(certificate.blob_verification_proof.quorum_indexes, vec![0, 1]);

    let response = node.get(&commitment.to_hex(), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), DATA);

    node.stop().await;
}

#[tokio::test]
async fn failed_dispersal_is_a_bad_gateway() {
    let (_disperser, node, _srs_cache) = spawn(DisperserMode::Failing).await;

    let response = node.put(DATA).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    node.stop().await;
}

#[tokio::test]
async fn tampered_retrieval_fails_verification() {
    let (_disperser, node, _srs_cache) = spawn(DisperserMode::Tampering).await;

    let commitment = node.put_ok(DATA).await;
    let response = node.get(&commitment.to_hex(), None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Verification failed"));

    node.stop().await;
}

#[tokio::test]
async fn unreachable_disperser_is_unavailable() {
    let srs_cache = tempfile::tempdir().unwrap();
    let _disperser = FakeDisperser::spawn(DisperserMode::Honest, srs_cache.path()).await;
    // nothing listens here once the probe socket is dropped
    let closed = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let node = ProxyNode::spawn_eigenda(closed, srs_cache.path()).await;

    let response = node.put(DATA).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    node.stop().await;
}
