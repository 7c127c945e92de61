//! Catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use armory_core::{Item, PassOutcome, RefreshError, RefreshPhase, ALL_CATEGORIES};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Category filter; omitted means all categories.
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive substring match against item names.
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub total: usize,
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub phase: RefreshPhase,
    pub sources: Vec<String>,
    pub total_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_pass: Option<PassOutcome>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    pub sources_failed: std::collections::HashMap<String, String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            sources_failed: std::collections::HashMap::new(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/catalog?category=&search=
///
/// Query the last-settled snapshot: category partition first, then search,
/// composed exactly like the consumer-side filtering they replace.
pub async fn list_catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogResponse> {
    let snapshot = state.orchestrator().snapshot().await;

    let category = query
        .category
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let search = query.search.unwrap_or_default();

    let items: Vec<Item> = snapshot
        .search(&search, snapshot.by_category(&category))
        .into_iter()
        .cloned()
        .collect();

    Json(CatalogResponse {
        category,
        search: (!search.is_empty()).then_some(search),
        total: items.len(),
        items,
    })
}

/// GET /api/v1/catalog/categories
pub async fn list_categories(State(state): State<Arc<AppState>>) -> Json<CategoriesResponse> {
    let snapshot = state.orchestrator().snapshot().await;
    Json(CategoriesResponse {
        categories: snapshot.categories(),
    })
}

/// GET /api/v1/catalog/{category}/{id}
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path((category, id)): Path<(String, String)>,
) -> Result<Json<Item>, impl IntoResponse> {
    let snapshot = state.orchestrator().snapshot().await;
    match snapshot.get(&category, &id) {
        Some(item) => Ok(Json(item.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!(
                "no item '{}' in category '{}'",
                id, category
            ))),
        )),
    }
}

/// GET /api/v1/catalog/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let orchestrator = state.orchestrator();
    Json(StatusResponse {
        phase: orchestrator.phase().await,
        sources: orchestrator.source_names(),
        total_items: orchestrator.snapshot().await.len(),
        last_pass: orchestrator.last_pass().await,
    })
}

/// POST /api/v1/catalog/refresh
///
/// Run one aggregation pass. Re-entrant calls are rejected with 409; a pass
/// where every source failed surfaces as 502 and the previous snapshot
/// stays in place.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PassOutcome>, impl IntoResponse> {
    match state.orchestrator().refresh().await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(RefreshError::AlreadyInProgress) => Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("a refresh pass is already in progress")),
        )),
        Err(RefreshError::CatalogUnavailable { sources }) => Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: "catalog unavailable: all configured sources failed".to_string(),
                sources_failed: sources,
            }),
        )),
    }
}
