use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{catalog, handlers, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog queries (served from the last-settled snapshot)
        .route("/catalog", get(catalog::list_catalog))
        .route("/catalog/categories", get(catalog::list_categories))
        .route("/catalog/status", get(catalog::get_status))
        .route("/catalog/refresh", post(catalog::refresh))
        .route("/catalog/{category}/{id}", get(catalog::get_item));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
