//! API routes for neurodxd
//!
//! Every route is stateless with respect to the caller: the diagnosis
//! context travels in the request body, so requests can be served in any
//! order and concurrently.

use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use neurodx_common::{
    AnswerSource, DiagnosisContext, DiagnosisReport, KnowledgeEntry, NeuroError, ScanInput,
    VERSION,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

type AppStateArc = Arc<AppState>;

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Map core errors: bad input is the caller's problem, the rest is ours
fn api_error(e: NeuroError) -> (StatusCode, String) {
    if e.is_client_error() {
        warn!("  Rejected request: {}", e);
        (StatusCode::BAD_REQUEST, e.to_string())
    } else {
        error!("  Request failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub knowledge_entries: usize,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        knowledge_entries: state.service.knowledge().len(),
    })
}

// ============================================================================
// Knowledge Routes
// ============================================================================

pub fn knowledge_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/knowledge", get(list_knowledge))
}

async fn list_knowledge(State(state): State<AppStateArc>) -> Json<Vec<KnowledgeEntry>> {
    Json(state.service.knowledge().entries().to_vec())
}

// ============================================================================
// Ask Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Short code or full label
    pub diagnosis: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub source: AnswerSource,
}

pub fn ask_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/ask", post(ask))
}

async fn ask(
    State(state): State<AppStateArc>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<AskResponse>> {
    let context = DiagnosisContext::parse(&req.diagnosis, req.confidence).map_err(api_error)?;
    let answer = state
        .service
        .explain(&req.question, &context)
        .map_err(api_error)?;

    info!("  Answered question ({})", answer.source);
    Ok(Json(AskResponse {
        answer: answer.text,
        source: answer.source,
    }))
}

// ============================================================================
// Analyze Routes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub file_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub diagnosis: String,
    pub confidence: f64,
    pub heatmap_mean: f64,
    pub shap_mean: f64,
    pub lime_mean: f64,
    pub progression: Vec<f64>,
}

pub fn analyze_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/analyze", post(analyze))
}

async fn analyze(
    State(state): State<AppStateArc>,
    Query(params): Query<AnalyzeParams>,
    body: Bytes,
) -> ApiResult<Json<AnalyzeResponse>> {
    let scan = ScanInput::new(params.file_name, body.to_vec()).map_err(api_error)?;
    info!("  Analyzing scan: {} ({} bytes)", scan.file_name, scan.bytes.len());

    // Map generation is CPU-bound; keep it off the async workers
    let provider = state.provider.clone();
    let prediction = tokio::task::spawn_blocking(move || provider.predict(&scan))
        .await
        .map_err(|e| {
            error!("  Prediction task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .map_err(api_error)?;

    Ok(Json(AnalyzeResponse {
        diagnosis: prediction.context.label().label().to_string(),
        confidence: prediction.context.confidence(),
        heatmap_mean: prediction.heatmap.mean_intensity(),
        shap_mean: prediction.shap.mean_intensity(),
        lime_mean: prediction.lime.mean_intensity(),
        progression: prediction.progression,
    }))
}

// ============================================================================
// Report Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportRequest {
    pub diagnosis: String,
    pub confidence: f64,
}

pub fn report_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/report", post(report))
}

async fn report(Json(req): Json<ReportRequest>) -> ApiResult<String> {
    let context = DiagnosisContext::parse(&req.diagnosis, req.confidence).map_err(api_error)?;
    Ok(DiagnosisReport::new(context).render())
}
