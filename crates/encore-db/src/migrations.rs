use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS swipes (
            id          TEXT PRIMARY KEY,
            actor_id    TEXT NOT NULL,
            target_id   TEXT NOT NULL,
            action      TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        -- No uniqueness on (actor_id, target_id): the swipe log is
        -- append-only and re-swipes coexist with earlier records.
        CREATE INDEX IF NOT EXISTS idx_swipes_actor
            ON swipes(actor_id, action);

        CREATE INDEX IF NOT EXISTS idx_swipes_reciprocal
            ON swipes(target_id, actor_id, action);

        CREATE TABLE IF NOT EXISTS chat_groups (
            id          TEXT PRIMARY KEY,
            group_name  TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chat_members (
            group_id    TEXT NOT NULL REFERENCES chat_groups(id),
            user_id     TEXT NOT NULL,
            UNIQUE(group_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS chat_messages (
            id          TEXT PRIMARY KEY,
            group_id    TEXT NOT NULL REFERENCES chat_groups(id),
            sender_id   TEXT NOT NULL,
            body        TEXT NOT NULL,
            sent_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_group
            ON chat_messages(group_id, sent_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
