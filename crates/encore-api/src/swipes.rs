use axum::{
    Json,
    extract::{Query, State},
};

use encore_types::api::{MatchesQuery, MatchesResponse, SwipeRequest, SwipeResponse};
use encore_types::models::SwipeAction;

use crate::error::{ApiError, join_error};
use crate::state::AppState;

pub async fn like_user(
    State(state): State<AppState>,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, ApiError> {
    record(state, req, SwipeAction::Like).await
}

pub async fn dislike_user(
    State(state): State<AppState>,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, ApiError> {
    record(state, req, SwipeAction::Dislike).await
}

async fn record(
    state: AppState,
    req: SwipeRequest,
    action: SwipeAction,
) -> Result<Json<SwipeResponse>, ApiError> {
    // Run blocking DB work off the async runtime
    let outcome = tokio::task::spawn_blocking(move || {
        state.engine.record_swipe(req.user_id, req.target_user_id, action)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(SwipeResponse {
        message: outcome.message.to_string(),
        matched: outcome.matched,
    }))
}

pub async fn get_matches(
    State(state): State<AppState>,
    Query(query): Query<MatchesQuery>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let matches = tokio::task::spawn_blocking(move || state.engine.get_matches(query.user_id))
        .await
        .map_err(join_error)??;

    Ok(Json(MatchesResponse { matches }))
}
