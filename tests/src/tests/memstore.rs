use std::time::Duration;

use da_commitments::OpCommitment;
use reqwest::StatusCode;
use tests::nodes::proxy::MAX_BLOB_LENGTH;
use tests::ProxyNode;

const DATA: &[u8] = b"Four score and seven years ago";

#[tokio::test]
async fn put_then_get() {
    let node = ProxyNode::spawn_memstore(Duration::from_secs(1000 * 60 * 60)).await;

    let commitment = node.put_ok(DATA).await;
    assert!(commitment.as_eigenda().is_some());

    let response = node.get(&commitment.to_hex(), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), DATA);

    // the 0x prefix is optional
    let response = node
        .get(commitment.to_hex().trim_start_matches("0x"), Some("binary"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), DATA);

    let response = node.get(&commitment.to_hex(), Some("polynomial")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let blob = response.bytes().await.unwrap();
    assert_eq!(blob.len() % 32, 0);
    assert!(blob.len() > DATA.len());

    node.stop().await;
}

#[tokio::test]
async fn oversized_blob_is_rejected() {
    let node = ProxyNode::spawn_memstore(Duration::from_secs(60)).await;

    let response = node.put(vec![7u8; MAX_BLOB_LENGTH + 1]).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let response = node.put(vec![7u8; MAX_BLOB_LENGTH]).await;
    assert_eq!(response.status(), StatusCode::OK);

    node.stop().await;
}

#[tokio::test]
async fn malformed_commitments_are_rejected() {
    let node = ProxyNode::spawn_memstore(Duration::from_secs(60)).await;

    for commitment in ["0xnothex", "0x", "0xff00", "0x0100", "0x010007"] {
        let response = node.get(commitment, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{commitment}");
    }

    // well formed, but this store only serves EigenDA certificates
    let keccak = OpCommitment::keccak256(DATA).to_hex();
    let response = node.get(&keccak, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    node.stop().await;
}

#[tokio::test]
async fn unknown_commitment_is_not_found() {
    let first = ProxyNode::spawn_memstore(Duration::from_secs(60)).await;
    let second = ProxyNode::spawn_memstore(Duration::from_secs(60)).await;

    let commitment = first.put_ok(DATA).await;
    let response = second.get(&commitment.to_hex(), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    first.stop().await;
    second.stop().await;
}

#[tokio::test]
async fn expired_blob_is_gone() {
    let node = ProxyNode::spawn_memstore(Duration::from_millis(10)).await;

    let commitment = node.put_ok(DATA).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let response = node.get(&commitment.to_hex(), None).await;
    assert_eq!(response.status(), StatusCode::GONE);
    // dropped once observed
    let response = node.get(&commitment.to_hex(), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    node.stop().await;
}
