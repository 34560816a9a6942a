//! Integration tests for the Bitea API endpoints
//!
//! These tests drive the router in-process and check the JSON shapes the
//! request layer relies on.

use axum_test::TestServer;
use bitea_chain::api::{build_api_router, AppState};
use bitea_chain::blockchain::Ledger;
use serde_json::{json, Value};

fn test_server(difficulty: u32, batch: usize) -> (TestServer, Ledger) {
    let ledger = Ledger::new(difficulty, batch).expect("Failed to create ledger");
    let app = build_api_router(AppState::new(ledger.clone()));
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, ledger)
}

#[tokio::test]
async fn test_read_endpoints() {
    let (server, _ledger) = test_server(1, 5);

    let response = server.get("/api/health").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());

    let response = server.get("/api").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["name"], "Bitea API");
    assert_eq!(json["blockchain"]["blocks"], 1);
    assert_eq!(json["blockchain"]["pending"], 0);
    assert_eq!(json["blockchain"]["valid"], true);

    let response = server.get("/api/blockchain").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["total"], 1);
    assert_eq!(json["blocks"][0]["index"], 0);
    assert_eq!(json["blocks"][0]["previous_hash"], "0");
    assert_eq!(json["blocks"][0]["transactions"], 1);

    let response = server.get("/api/blockchain/info").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["difficulty"], 1);
    assert_eq!(json["max_transactions_per_block"], 5);

    let response = server.get("/api/blockchain/block/0").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["transactions"][0]["sender"], "SYSTEM");
    assert_eq!(json["transactions"][0]["type"], "USER_REGISTRATION");

    let response = server.get("/api/blockchain/block/999").await;
    assert_eq!(response.status_code(), 404);
    let json: Value = response.json();
    assert!(json["error"].is_string());

    let response = server.get("/api/blockchain/validate").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json, json!({ "valid": true }));
}

#[tokio::test]
async fn test_submit_and_auto_mine() {
    let (server, ledger) = test_server(1, 2);

    let response = server
        .post("/api/transaction")
        .json(&json!({ "sender": "alice", "type": "POST", "payload": "{\"content\":\"hi\"}" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert!(json["id"].as_str().unwrap().starts_with("alice-0-"));
    assert_eq!(json["mined_blocks"], json!([]));
    assert_eq!(json["pending"], 1);

    let response = server.get("/api/mempool").await;
    let json: Value = response.json();
    assert_eq!(json["count"], 1);
    assert_eq!(json["transactions"][0]["sender"], "alice");

    let response = server
        .post("/api/transaction")
        .json(&json!({ "sender": "bob", "type": "LIKE", "payload": "{}" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["mined_blocks"], json!([1]));
    assert_eq!(json["blocks"], 2);
    assert_eq!(json["pending"], 0);

    assert_eq!(ledger.chain_length(), 2);
    assert!(ledger.is_valid());
}

#[tokio::test]
async fn test_force_mine() {
    let (server, _ledger) = test_server(1, 10);

    let response = server.post("/api/mine").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["mined"], Value::Null);
    assert_eq!(json["blocks"], 1);

    server
        .post("/api/transaction")
        .json(&json!({ "sender": "carol", "type": "FOLLOW", "payload": "{\"target\":\"dave\"}" }))
        .await;

    let response = server.get("/api/mine").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["message"], "Block mined successfully");
    assert_eq!(json["mined"], 1);
    assert_eq!(json["blocks"], 2);
    assert_eq!(json["pending"], 0);
}

#[tokio::test]
async fn test_rejects_bad_descriptors() {
    let (server, ledger) = test_server(1, 5);

    let response = server
        .post("/api/transaction")
        .json(&json!({ "sender": "  ", "type": "POST", "payload": "{}" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = server
        .post("/api/transaction")
        .json(&json!({ "sender": " eve", "type": "POST", "payload": "{}" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = server
        .post("/api/transaction")
        .json(&json!({ "sender": "eve", "type": "RETWEET", "payload": "{}" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid transaction: unknown transaction type"));

    assert_eq!(ledger.pending_count(), 0);
}

#[tokio::test]
async fn test_type_names_are_case_insensitive() {
    let (server, ledger) = test_server(1, 5);

    let response = server
        .post("/api/transaction")
        .json(&json!({ "sender": "frank", "type": "topic_like", "payload": "{}" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["id"].as_str().unwrap().split('-').nth(1), Some("7"));

    let pending = ledger.pending_transactions();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].sender(), "frank");
}
