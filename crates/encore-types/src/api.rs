use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ChatGroup, ChatMessage};

// -- Swipes --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SwipeRequest {
    pub user_id: Uuid,
    pub target_user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub message: String,
    /// True only when this swipe was a like and a reciprocal like already
    /// existed at check time.
    #[serde(rename = "match")]
    pub matched: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<Uuid>,
}

// -- Chats --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateGroupRequest {
    pub group_name: String,
    pub creator_id: Uuid,
    pub members: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddMemberRequest {
    pub group_id: Uuid,
    pub new_member_id: Uuid,
    pub creator_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub message: String,
    pub group: ChatGroup,
}

#[derive(Debug, Serialize)]
pub struct GroupDetailsResponse {
    pub group: ChatGroup,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendMessageRequest {
    pub group_id: Uuid,
    pub sender_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message: String,
    pub result: ChatMessage,
}

#[derive(Debug, Serialize)]
pub struct GroupMessagesResponse {
    pub messages: Vec<ChatMessage>,
}

// -- Errors --

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
