use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::analysis::{AnalysisDocument, AnalysisService};
use crate::ecfr::TitlesResponse;
use crate::error::ApiError;
use crate::projection::{self, SelectionState, TimeRange, ViewProjection};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/titles", get(get_titles))
        .route("/api/titles/{title_number}/analysis", get(get_analysis))
        .route("/api/titles/{title_number}/projection", get(get_projection))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Same router, with the static dashboard bundle mounted at `/` when a UI
/// directory is configured.
pub fn create_router_with_ui(state: AppState, ui_dir: Option<&str>) -> Router {
    let router = create_router(state);
    match ui_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

async fn get_titles(State(state): State<AppState>) -> Result<Json<TitlesResponse>, ApiError> {
    let titles = state
        .service
        .list_titles()
        .await
        .map_err(|e| ApiError::Upstream(format!("{e:#}")))?;
    Ok(Json(titles))
}

async fn get_analysis(
    State(state): State<AppState>,
    Path(title_number): Path<u32>,
) -> Result<Json<AnalysisDocument>, ApiError> {
    let doc = state.service.analyze_title(title_number, today()).await?;
    Ok(Json(doc))
}

#[derive(Debug, Default, Deserialize)]
struct ProjectionQuery {
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    show_all: Option<bool>,
}

async fn get_projection(
    State(state): State<AppState>,
    Path(title_number): Path<u32>,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<ViewProjection>, ApiError> {
    let doc = state.service.analyze_title(title_number, today()).await?;
    let selection = SelectionState {
        time_range: query
            .range
            .as_deref()
            .map(TimeRange::parse)
            .unwrap_or_default(),
        show_all: query.show_all.unwrap_or(false),
    };
    Ok(Json(projection::project(&doc, &selection, today())))
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
