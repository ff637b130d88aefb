use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use encore_types::api::{
    AddMemberRequest, CreateGroupRequest, GroupDetailsResponse, GroupMessagesResponse,
    GroupResponse, SendMessageRequest, SendMessageResponse,
};

use crate::error::{ApiError, join_error};
use crate::state::AppState;

pub async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let group = tokio::task::spawn_blocking(move || {
        state.chats.create_group(&req.group_name, req.creator_id, &req.members)
    })
    .await
    .map_err(join_error)??;

    Ok((
        StatusCode::CREATED,
        Json(GroupResponse {
            message: "Chat group created successfully".to_string(),
            group,
        }),
    ))
}

pub async fn add_member(
    State(state): State<AppState>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<GroupResponse>, ApiError> {
    let group = tokio::task::spawn_blocking(move || {
        state.chats.add_member(req.group_id, req.new_member_id, req.creator_id)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(GroupResponse {
        message: "Member added successfully".to_string(),
        group,
    }))
}

pub async fn get_group_details(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupDetailsResponse>, ApiError> {
    let group = tokio::task::spawn_blocking(move || state.chats.get_group_details(group_id))
        .await
        .map_err(join_error)??;

    Ok(Json(GroupDetailsResponse { group }))
}

pub async fn get_group_messages(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupMessagesResponse>, ApiError> {
    let messages = tokio::task::spawn_blocking(move || state.chats.get_group_messages(group_id))
        .await
        .map_err(join_error)??;

    Ok(Json(GroupMessagesResponse { messages }))
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let result = tokio::task::spawn_blocking(move || {
        state.chats.send_message(req.group_id, req.sender_id, &req.message)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(SendMessageResponse {
        message: "Message sent successfully".to_string(),
        result,
    }))
}
