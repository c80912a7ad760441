use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use docquery_core::{DocumentMeta, EngineError, RankedResult, SearchEngine};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};

pub mod summary;

use summary::DocumentAnalysis;

/// Shared application state: one engine per server process. The engine core
/// is single-threaded, so cross-request sharing goes through this lock.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<SearchEngine>>,
}

pub fn build_app() -> Router {
    build_app_with(SearchEngine::new())
}

pub fn build_app_with(engine: SearchEngine) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let state = AppState {
        engine: Arc::new(RwLock::new(engine)),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/documents", post(ingest_handler).get(list_handler))
        .route("/documents/:doc_id", get(doc_handler))
        .route("/search", get(search_handler))
        .route("/clear", post(clear_handler))
        .with_state(state)
        .layer(cors)
}

#[derive(Deserialize)]
pub struct IngestRequest {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: DocumentMeta,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub id: String,
    pub token_count: usize,
    pub document_count: usize,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub k: Option<usize>,
    pub window: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<RankedResult>,
}

#[derive(Serialize)]
pub struct DocumentEntry {
    pub id: String,
    pub filename: String,
    pub size_bytes: u64,
    pub token_count: usize,
    pub preview: String,
}

#[derive(Serialize)]
pub struct DocumentDetail {
    pub id: String,
    pub filename: String,
    pub metadata: DocumentMeta,
    pub token_count: usize,
    pub preview: String,
    pub analysis: DocumentAnalysis,
}

fn engine_error(err: EngineError) -> (StatusCode, String) {
    let status = match err {
        EngineError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        EngineError::InternalInvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

async fn ingest_handler(
    State(state): State<AppState>,
    Json(req): Json<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), (StatusCode, String)> {
    let mut engine = state.engine.write();
    engine.ingest(&req.id, &req.text, req.metadata).map_err(engine_error)?;
    let token_count = engine.get(&req.id).map(|d| d.token_count).unwrap_or(0);
    tracing::info!(doc = %req.id, "document ingested via api");
    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            id: req.id,
            token_count,
            document_count: engine.len(),
        }),
    ))
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let engine = state.engine.read();
    let top_n = params.k.unwrap_or(engine.config().default_top_n).clamp(1, 100);
    let window = params.window.unwrap_or(engine.config().window_size);
    let results = engine.search_with(&params.q, top_n, window).map_err(engine_error)?;
    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: results.len(),
        results,
    }))
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<DocumentEntry>> {
    let engine = state.engine.read();
    let entries = engine
        .documents()
        .into_iter()
        .map(|doc| DocumentEntry {
            id: doc.id.clone(),
            filename: doc.meta.filename.clone(),
            size_bytes: doc.meta.size_bytes,
            token_count: doc.token_count,
            preview: preview(&doc.text, 500),
        })
        .collect();
    Json(entries)
}

async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<DocumentDetail>, (StatusCode, String)> {
    let engine = state.engine.read();
    let doc = engine
        .get(&doc_id)
        .ok_or((StatusCode::NOT_FOUND, format!("unknown document: {doc_id}")))?;
    Ok(Json(DocumentDetail {
        id: doc.id.clone(),
        filename: doc.meta.filename.clone(),
        metadata: doc.meta.clone(),
        token_count: doc.token_count,
        preview: preview(&doc.text, 500),
        analysis: summary::analyze(&doc.text, &doc.meta),
    }))
}

async fn clear_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut engine = state.engine.write();
    engine.clear();
    tracing::info!("engine cleared via api");
    Json(serde_json::json!({ "cleared": true }))
}

fn preview(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
