use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestContext,
    models::{Listing, ListingId},
    routes::AppState,
};

/// Favourite listings of the session user, most recent first
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
) -> AppResult<Json<Vec<Listing>>> {
    let user_id = context.require_session()?.user_id;
    let listings = state.store.list_favorites(user_id).await?;
    Ok(Json(listings))
}

/// Marks a listing as favourite. Adding an existing favourite is a no-op.
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
    Path(listing_id): Path<ListingId>,
) -> AppResult<StatusCode> {
    let user_id = context.require_session()?.user_id;

    if state.store.add_favorite(user_id, listing_id).await? {
        Ok(StatusCode::CREATED)
    } else {
        Ok(StatusCode::OK)
    }
}

pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
    Path(listing_id): Path<ListingId>,
) -> AppResult<StatusCode> {
    let user_id = context.require_session()?.user_id;

    if state.store.remove_favorite(user_id, listing_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "listing {} is not a favourite",
            listing_id
        )))
    }
}
