//! 수신 서버 HTTP 엔드포인트 통합 테스트 (임시 포트)

use protobench_core::config::ServerConfig;
use protobench_core::generator::generate_records;
use protobench_core::models::batch::{BatchRequest, BatchResult};
use protobench_server::{ReceiverServer, ServerState};
use serde_json::Value;
use tokio::sync::watch;

struct Running {
    base_url: String,
    state: ServerState,
    shutdown: watch::Sender<bool>,
}

async fn start() -> Running {
    let config = ServerConfig {
        http_port: 0,
        grpc_port: 0,
        ..ServerConfig::default()
    };
    let server = ReceiverServer::bind(&config, ServerState::default())
        .await
        .unwrap();
    let base_url = format!("http://{}", server.http_addr().unwrap());
    let state = server.state();
    let (shutdown, rx) = watch::channel(false);
    tokio::spawn(server.run(rx));

    Running {
        base_url,
        state,
        shutdown,
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let server = start().await;
    let body: Value = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    server.shutdown.send(true).unwrap();
}

#[tokio::test]
async fn batch_endpoint_counts_items() {
    let server = start().await;
    let client = reqwest::Client::new();

    let result: BatchResult = client
        .post(format!("{}/api/data/batch", server.base_url))
        .json(&BatchRequest {
            items: generate_records(5),
        })
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.processed_count, 5);
    assert!(result.records.is_none());
    server.shutdown.send(true).unwrap();
}

#[tokio::test]
async fn generate_records_metrics_and_clear() {
    let server = start().await;
    let client = reqwest::Client::new();

    let result: BatchResult = client
        .post(format!("{}/api/data/generate", server.base_url))
        .json(&serde_json::json!({ "count": 4 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(result.is_complete_generation(4));

    let http_metrics: Vec<Value> = client
        .get(format!("{}/api/metrics/http", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(http_metrics.len(), 1);
    assert_eq!(http_metrics[0]["protocol"], "HTTP");
    assert_eq!(http_metrics[0]["count"], 4);

    let unknown: Vec<Value> = client
        .get(format!("{}/api/metrics/carrier-pigeon", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(unknown.is_empty());

    let cleared: Value = client
        .delete(format!("{}/api/metrics", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared["status"], "cleared");
    assert!(server.state.metrics.get_all().is_empty());

    server.shutdown.send(true).unwrap();
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let server = start().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/data/batch", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
    server.shutdown.send(true).unwrap();
}
