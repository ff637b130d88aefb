use std::sync::Arc;

use encore_core::chats::ChatAuthority;
use encore_core::matching::MatchEngine;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub engine: MatchEngine,
    pub chats: ChatAuthority,
}
