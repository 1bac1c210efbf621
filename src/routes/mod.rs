use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    db::ListingStore,
    middleware::{make_span_with_request_context, request_context_middleware},
    services::{Recommender, RecommenderSettings},
};

pub mod favorites;
pub mod interactions;
pub mod preferences;
pub mod recommendations;

/// Shared state of all handlers
pub struct AppState {
    pub store: Arc<dyn ListingStore>,
    pub recommender: Recommender,
    pub default_recommendation_count: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn ListingStore>, config: &Config) -> Self {
        Self {
            recommender: Recommender::new(store.clone(), RecommenderSettings::from(config)),
            store,
            default_recommendation_count: config.default_recommendation_count,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_context_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_context))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend_for_session))
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::recommend_for_user),
        )
        .route(
            "/preferences",
            get(preferences::get_preferences).put(preferences::update_preferences),
        )
        .route(
            "/listings/:listing_id/interactions",
            post(interactions::record_interaction),
        )
        .route(
            "/listings/:listing_id/favorite",
            put(favorites::add_favorite).delete(favorites::remove_favorite),
        )
        .route("/favorites", get(favorites::list_favorites))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
