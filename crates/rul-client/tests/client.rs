//! Client behavior against a mocked prediction endpoint

use rul_client::{ClientError, PredictionClient, DEFAULT_TIMEOUT};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signals() -> Vec<Vec<f64>> {
    (0..15).map(|i| vec![0.1 * i as f64, -0.2, 0.3]).collect()
}

#[tokio::test]
async fn test_predict_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(serde_json::json!({ "signals": signals() })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "predicted_rul": 123.0, "status": "success" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = PredictionClient::new(&server.uri(), DEFAULT_TIMEOUT).unwrap();
    let response = client.predict(&signals()).await.unwrap();
    assert_eq!(response.predicted_rul, 123.0);
    assert_eq!(response.status, "success");
    assert_eq!(response.predicted_hours(), 20.5);
}

#[tokio::test]
async fn test_api_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Input sequence length (14) does not match the required window size (15)."
        })))
        .mount(&server)
        .await;

    let client = PredictionClient::new(&server.uri(), DEFAULT_TIMEOUT).unwrap();
    let err = client.predict(&signals()[..14]).await.unwrap_err();
    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("(14)"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_prediction_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "success" })),
        )
        .mount(&server)
        .await;

    let client = PredictionClient::new(&server.uri(), DEFAULT_TIMEOUT).unwrap();
    assert!(matches!(
        client.predict(&signals()).await,
        Err(ClientError::MissingPrediction(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server() {
    let client = PredictionClient::new("http://127.0.0.1:9", DEFAULT_TIMEOUT).unwrap();
    assert!(matches!(
        client.predict(&signals()).await,
        Err(ClientError::Http(_))
    ));
}
