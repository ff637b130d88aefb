pub mod chats;
pub mod error;
pub mod state;
pub mod swipes;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/swipe/like", post(swipes::like_user))
        .route("/swipe/dislike", post(swipes::dislike_user))
        .route("/swipe/matches", get(swipes::get_matches))
        .route("/chats/create-group", post(chats::create_group))
        .route("/chats/add-member", post(chats::add_member))
        .route("/chats/group/{group_id}", get(chats::get_group_details))
        .route("/chats/group/{group_id}/messages", get(chats::get_group_messages))
        .route("/chats/send-message", post(chats::send_message))
        .with_state(state)
}
