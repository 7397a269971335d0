//! HTTP façade over a ranking session

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::corpus::records_from_values;
use crate::{
    OverviewEvent, PaperEntry, RankingError, RankingSession, ScoreBreakdown, SeedPaperRef,
    StateSummary, Weights, WordCount,
};

pub type SharedSession = Arc<RwLock<RankingSession>>;

/// Number of top-ranked papers echoed back after each mutation
const SUMMARY_TOP: usize = 10;

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsBody {
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordBody {
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedPapersBody {
    pub seed_papers: Vec<SeedPaperRef>,
}

#[derive(Debug, Deserialize)]
pub struct MarkedPapersBody {
    pub marked_papers: Vec<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(e: RankingError) -> ApiError {
    let status = match e {
        RankingError::UnknownPaper(_) | RankingError::HistoryOutOfRange { .. } => {
            StatusCode::NOT_FOUND
        }
        _ => StatusCode::BAD_REQUEST,
    };
    warn!("Request rejected: {}", e);
    (
        status,
        Json(ErrorResponse {
            error: "Request rejected".to_string(),
            details: Some(e.to_string()),
        }),
    )
}

/// Apply one event under the write lock and summarize the new state
async fn mutate(
    session: &SharedSession,
    event: OverviewEvent,
) -> Result<Json<StateSummary>, ApiError> {
    let mut session = session.write().await;
    let state = session.dispatch(event).map_err(api_error)?;
    Ok(Json(state.summary(SUMMARY_TOP)))
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "paper-ranker".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_papers(
    State(session): State<SharedSession>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<PaperEntry>> {
    let session = session.read().await;
    let entries = session.state().paper_entries();
    let limit = query.limit.unwrap_or(entries.len());
    Json(entries.iter().take(limit).cloned().collect())
}

async fn explain_paper(
    State(session): State<SharedSession>,
    Path(doi): Path<String>,
) -> Result<Json<ScoreBreakdown>, ApiError> {
    let session = session.read().await;
    session.state().explain(&doi).map(Json).map_err(api_error)
}

async fn load_corpus(
    State(session): State<SharedSession>,
    Json(items): Json<Vec<serde_json::Value>>,
) -> Result<Json<StateSummary>, ApiError> {
    let records = records_from_values(items);
    info!("Loading corpus of {} records", records.len());
    mutate(&session, OverviewEvent::LoadCorpus(records)).await
}

async fn set_keywords(
    State(session): State<SharedSession>,
    Json(body): Json<KeywordsBody>,
) -> Result<Json<StateSummary>, ApiError> {
    mutate(&session, OverviewEvent::SetKeywords(body.keywords)).await
}

async fn toggle_keyword(
    State(session): State<SharedSession>,
    Json(body): Json<KeywordBody>,
) -> Result<Json<StateSummary>, ApiError> {
    mutate(&session, OverviewEvent::ToggleKeyword(body.keyword)).await
}

async fn keyword_suggestions(
    State(session): State<SharedSession>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<WordCount>> {
    let session = session.read().await;
    Json(session.state().suggest_keywords(query.limit))
}

async fn set_seed_papers(
    State(session): State<SharedSession>,
    Json(body): Json<SeedPapersBody>,
) -> Result<Json<StateSummary>, ApiError> {
    mutate(&session, OverviewEvent::SetSeedPapers(body.seed_papers)).await
}

async fn set_marked_papers(
    State(session): State<SharedSession>,
    Json(body): Json<MarkedPapersBody>,
) -> Result<Json<StateSummary>, ApiError> {
    mutate(&session, OverviewEvent::SetMarkedPapers(body.marked_papers)).await
}

async fn get_weights(State(session): State<SharedSession>) -> Json<Weights> {
    let session = session.read().await;
    Json(session.state().weights().clone())
}

async fn set_weights(
    State(session): State<SharedSession>,
    Json(weights): Json<Weights>,
) -> Result<Json<StateSummary>, ApiError> {
    mutate(&session, OverviewEvent::SetWeights(weights)).await
}

async fn list_histories(State(session): State<SharedSession>) -> Json<Vec<StateSummary>> {
    let session = session.read().await;
    Json(
        session
            .state()
            .histories()
            .iter()
            .map(|snapshot| snapshot.summary(SUMMARY_TOP))
            .collect(),
    )
}

async fn select_history(
    State(session): State<SharedSession>,
    Path(index): Path<usize>,
) -> Result<Json<StateSummary>, ApiError> {
    mutate(&session, OverviewEvent::SelectHistory(index)).await
}

async fn clear_histories(
    State(session): State<SharedSession>,
) -> Result<Json<StateSummary>, ApiError> {
    mutate(&session, OverviewEvent::ClearHistories).await
}

/// Create and configure the HTTP router
pub fn create_router(session: SharedSession) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/papers", get(list_papers))
        .route("/papers/:doi/explain", get(explain_paper))
        .route("/corpus", post(load_corpus))
        .route("/keywords", put(set_keywords))
        .route("/keywords/toggle", post(toggle_keyword))
        .route("/keywords/suggestions", get(keyword_suggestions))
        .route("/seed_papers", put(set_seed_papers))
        .route("/marked_papers", put(set_marked_papers))
        .route("/weights", get(get_weights).put(set_weights))
        .route("/histories", get(list_histories).delete(clear_histories))
        .route("/histories/:index/select", post(select_history))
        .with_state(session)
}

/// Run the HTTP server
pub async fn run_server(session: SharedSession, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.addr();
    info!("Starting paper-ranker server on {}", addr);

    let app = create_router(session);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
