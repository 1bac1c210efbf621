use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestContext,
    models::UserId,
    routes::AppState,
    services::scoring::{result_count, Recommendation},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Maximum number of recommendations; the configured default when absent
    pub n: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_id: UserId,
    pub recommendations: Vec<Recommendation>,
}

/// Recommendations for the user of the current session
pub async fn recommend_for_session(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let user_id = context.require_session()?.user_id;
    recommend(&state, &context, user_id, query.n).await
}

/// Recommendations for an explicit user, subject to role access
pub async fn recommend_for_user(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
    Path(user_id): Path<UserId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    recommend(&state, &context, user_id, query.n).await
}

async fn recommend(
    state: &AppState,
    context: &RequestContext,
    user_id: UserId,
    n: Option<i64>,
) -> AppResult<Json<RecommendationResponse>> {
    let session = context.require_session()?;
    if !session.can_view_recommendations_for(user_id) {
        return Err(AppError::Forbidden(format!(
            "{:?} {} may not view recommendations of user {}",
            session.role, session.user_id, user_id
        )));
    }

    let n = match n {
        Some(n) => result_count(n)?,
        None => state.default_recommendation_count,
    };

    tracing::info!(
        request_id = %context.request_id,
        user_id,
        n,
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend(user_id, n).await?;

    Ok(Json(RecommendationResponse {
        user_id,
        recommendations,
    }))
}
