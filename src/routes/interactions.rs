use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestContext,
    models::{InteractionKind, ListingId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecordInteractionRequest {
    pub kind: InteractionKind,
}

/// Appends a view, click or contact of the session user to the interaction log
pub async fn record_interaction(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
    Path(listing_id): Path<ListingId>,
    Json(request): Json<RecordInteractionRequest>,
) -> AppResult<StatusCode> {
    let user_id = context.require_session()?.user_id;

    state
        .store
        .record_interaction(user_id, listing_id, request.kind)
        .await?;

    tracing::debug!(
        request_id = %context.request_id,
        user_id,
        listing_id,
        kind = request.kind.as_str(),
        "Interaction recorded"
    );

    Ok(StatusCode::CREATED)
}
