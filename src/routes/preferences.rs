use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestContext,
    models::{PreferenceProfile, UserId},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub user_id: UserId,
    pub preferences: Option<PreferenceProfile>,
}

/// Stored preferences of the session user
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
) -> AppResult<Json<PreferencesResponse>> {
    let user_id = context.require_session()?.user_id;
    let preferences = state.store.fetch_preferences(user_id).await?;

    Ok(Json(PreferencesResponse {
        user_id,
        preferences,
    }))
}

/// Replaces the preferences of the session user
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
    Json(profile): Json<PreferenceProfile>,
) -> AppResult<Json<PreferencesResponse>> {
    let user_id = context.require_session()?.user_id;
    validate(&profile)?;

    state.store.save_preferences(user_id, &profile).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id,
        "Preferences updated"
    );

    Ok(Json(PreferencesResponse {
        user_id,
        preferences: Some(profile),
    }))
}

fn validate(profile: &PreferenceProfile) -> AppResult<()> {
    if let Some(max_price) = profile.max_price {
        if !max_price.is_finite() || max_price < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "max_price must be a non-negative number, got {}",
                max_price
            )));
        }
    }
    if let Some(min_bedrooms) = profile.min_bedrooms {
        if min_bedrooms < 0 {
            return Err(AppError::InvalidInput(format!(
                "min_bedrooms must be non-negative, got {}",
                min_bedrooms
            )));
        }
    }
    Ok(())
}
