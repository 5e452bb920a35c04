//! Serves the router on a real socket and exercises it over HTTP

use api::{create_router, AppState, PredictionResponse};
use inference_engine::{PrognosticsConfig, RulPredictor};
use std::path::PathBuf;
use std::sync::Arc;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../inference-engine/tests/fixtures")
        .join(name)
}

async fn spawn_server() -> String {
    let config = PrognosticsConfig::from_path(fixture("config.json")).unwrap();
    let predictor = RulPredictor::load(fixture("model.json"), config).unwrap();
    let app = create_router(Arc::new(AppState::new(predictor)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn test_signals() -> serde_json::Value {
    serde_json::json!({
        "signals": [
            [0.1, -0.2, 0.1, 0.0, -0.1, 0.2, 0.3, -0.3, 0.1, 0.2],
            [0.2, -0.1, 0.2, 0.1, -0.2, 0.3, 0.2, -0.2, 0.0, 0.1],
            [0.1, 0.0, 0.1, 0.2, -0.1, 0.2, 0.4, -0.4, 0.2, 0.3],
            [0.3, -0.2, 0.2, 0.1, -0.1, 0.1, 0.3, -0.2, 0.1, 0.2],
            [0.2, -0.3, 0.1, 0.0, -0.2, 0.2, 0.2, -0.3, 0.1, 0.1],
            [0.1, -0.1, 0.2, 0.2, -0.1, 0.3, 0.4, -0.3, 0.1, 0.2],
            [0.4, -0.2, 0.1, 0.1, -0.1, 0.2, 0.3, -0.4, 0.0, 0.1],
            [0.2, 0.1, 0.1, 0.0, -0.2, 0.1, 0.2, -0.2, 0.1, 0.2],
            [0.3, -0.2, 0.2, 0.1, -0.1, 0.2, 0.5, -0.5, 0.1, 0.3],
            [0.5, -0.4, 0.3, 0.2, -0.3, 0.4, 0.6, -0.6, 0.2, 0.4],
            [0.4, -0.3, 0.4, 0.3, -0.2, 0.5, 0.7, -0.5, 0.3, 0.5],
            [0.6, -0.5, 0.5, 0.4, -0.4, 0.6, 0.8, -0.7, 0.4, 0.6],
            [0.7, -0.6, 0.6, 0.5, -0.5, 0.7, 0.9, -0.8, 0.5, 0.7],
            [0.8, -0.7, 0.7, 0.6, -0.6, 0.8, 1.0, -0.9, 0.6, 0.8],
            [0.9, -0.8, 0.8, 0.7, -0.7, 0.9, 1.1, -1.0, 0.7, 0.9]
        ]
    })
}

#[tokio::test]
async fn test_predict_over_http() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/predict", base))
        .json(&test_signals())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert!(body["predicted_rul"].is_number());
}

#[tokio::test]
async fn test_short_window_over_http() {
    let base = spawn_server().await;
    let mut payload = test_signals();
    payload["signals"].as_array_mut().unwrap().pop();

    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("14"));
    assert!(detail.contains("15"));
}

#[tokio::test]
async fn test_concurrent_requests_agree() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let requests = (0..8).map(|_| {
        let client = client.clone();
        let url = format!("{}/predict", base);
        async move {
            client
                .post(url)
                .json(&test_signals())
                .send()
                .await
                .unwrap()
                .json::<PredictionResponse>()
                .await
                .unwrap()
        }
    });

    let handles: Vec<_> = requests.map(tokio::spawn).collect();
    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().predicted_rul);
    }

    assert!(results.iter().all(|&r| r == results[0]));
}
