/// Database row types — these map directly to SQLite rows.
/// Distinct from encore-types API models to keep the DB layer independent.

pub struct SwipeRow {
    pub id: String,
    pub actor_id: String,
    pub target_id: String,
    pub action: String,
    pub created_at: String,
}

pub struct GroupRow {
    pub id: String,
    pub group_name: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: String,
    pub group_id: String,
    pub sender_id: String,
    pub body: String,
    pub sent_at: String,
}
