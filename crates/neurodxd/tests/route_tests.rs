//! In-process tests for the HTTP routes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use neurodx_common::{AnswerSource, Config, ExplanationService, MockPredictionProvider};
use neurodxd::routes::{AnalyzeResponse, AskResponse, HealthResponse};
use neurodxd::server::{app, AppState};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let state = AppState::new(
        ExplanationService::builtin(),
        Arc::new(MockPredictionProvider::seeded(11)),
        1024 * 1024,
    );
    app(state)
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn test_health() {
    let response = test_app()
        .oneshot(Request::get("/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.knowledge_entries, 5);
}

#[tokio::test]
async fn test_ask_knowledge_match() {
    let response = test_app()
        .oneshot(json_post(
            "/v1/ask",
            serde_json::json!({"question": "What is LIME?", "diagnosis": "MCI", "confidence": 0.8}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ask: AskResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(ask.source, AnswerSource::KnowledgeMatch);
    assert!(ask.answer.starts_with("LIME (Local Interpretable"));
}

#[tokio::test]
async fn test_ask_override() {
    let response = test_app()
        .oneshot(json_post(
            "/v1/ask",
            serde_json::json!({"question": "Please give me the diagnosis", "diagnosis": "Alzheimer's Disease (AD)"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ask: AskResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(ask.source, AnswerSource::DiagnosisOverride);
    assert!(ask.answer.contains("Alzheimer's Disease (AD)"));
}

#[tokio::test]
async fn test_ask_blank_question_is_bad_request() {
    let response = test_app()
        .oneshot(json_post(
            "/v1/ask",
            serde_json::json!({"question": "   ", "diagnosis": "HC", "confidence": 0.9}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ask_unknown_condition_is_bad_request() {
    let response = test_app()
        .oneshot(json_post(
            "/v1/ask",
            serde_json::json!({"question": "diagnosis?", "diagnosis": "flu", "confidence": 0.9}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("flu"));
}

#[tokio::test]
async fn test_analyze_scan() {
    let request = Request::post("/v1/analyze?file_name=subject.nii")
        .body(Body::from(vec![7u8; 64]))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let analysis: AnalyzeResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!((0.7..=0.99).contains(&analysis.confidence));
    assert_eq!(analysis.progression.len(), 36);
    assert!(analysis.diagnosis.ends_with(')'));
}

#[tokio::test]
async fn test_analyze_rejects_unsupported_file() {
    let request = Request::post("/v1/analyze?file_name=holiday.jpg")
        .body(Body::from(vec![1u8; 8]))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_text() {
    let response = test_app()
        .oneshot(json_post(
            "/v1/report",
            serde_json::json!({"diagnosis": "HC", "confidence": 0.93}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("Diagnosis: Healthy Control (HC)"));
    assert!(text.contains("Confidence: 93.00%"));
}

#[tokio::test]
async fn test_knowledge_listing() {
    let response = test_app()
        .oneshot(Request::get("/v1/knowledge").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let entries: Vec<serde_json::Value> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[3]["trigger"], "What is LIME?");
}

#[test]
fn test_state_rejects_inverted_confidence_range() {
    let mut config = Config::default();
    config.prediction.min_confidence = 0.95;
    config.prediction.max_confidence = 0.6;
    assert!(AppState::from_config(&config).is_err());
    assert!(AppState::from_config(&Config::default()).is_ok());
}
