use crate::Database;
use crate::models::{GroupRow, MessageRow, SwipeRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Swipes --

    pub fn insert_swipe(
        &self,
        id: &str,
        actor_id: &str,
        target_id: &str,
        action: &str,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO swipes (id, actor_id, target_id, action, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, actor_id, target_id, action, created_at],
            )?;
            Ok(())
        })
    }

    /// Lookup by (actor, target, action). Multiple records can exist for the
    /// same triple; any one of them answers an existence check.
    pub fn find_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        action: &str,
    ) -> Result<Option<SwipeRow>> {
        self.with_conn(|conn| query_swipe(conn, actor_id, target_id, action))
    }

    /// All swipes authored by `actor_id` with the given action.
    pub fn find_swipes_by_actor(&self, actor_id: &str, action: &str) -> Result<Vec<SwipeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, actor_id, target_id, action, created_at
                 FROM swipes
                 WHERE actor_id = ?1 AND action = ?2",
            )?;

            let rows = stmt
                .query_map([actor_id, action], |row| {
                    Ok(SwipeRow {
                        id: row.get(0)?,
                        actor_id: row.get(1)?,
                        target_id: row.get(2)?,
                        action: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Chat groups --

    pub fn create_chat_group(
        &self,
        id: &str,
        group_name: &str,
        created_at: &str,
        member_ids: &[String],
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_groups (id, group_name, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, group_name, created_at],
            )?;
            for member_id in member_ids {
                conn.execute(
                    "INSERT OR IGNORE INTO chat_members (group_id, user_id) VALUES (?1, ?2)",
                    rusqlite::params![id, member_id],
                )?;
            }
            Ok(())
        })
    }

    /// Set-semantics append: adding an existing member is a no-op, enforced
    /// by UNIQUE(group_id, user_id).
    pub fn add_member_to_group(&self, group_id: &str, user_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO chat_members (group_id, user_id) VALUES (?1, ?2)",
                rusqlite::params![group_id, user_id],
            )?;
            Ok(())
        })
    }

    pub fn get_chat_group(&self, group_id: &str) -> Result<Option<GroupRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, group_name, created_at FROM chat_groups WHERE id = ?1")?;

            let row = stmt
                .query_row([group_id], |row| {
                    Ok(GroupRow {
                        id: row.get(0)?,
                        group_name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    /// Members in insertion order, so the creator comes first.
    pub fn get_group_members(&self, group_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT user_id FROM chat_members WHERE group_id = ?1 ORDER BY rowid")?;

            let rows = stmt
                .query_map([group_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;

            Ok(rows)
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        id: &str,
        group_id: &str,
        sender_id: &str,
        body: &str,
        sent_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_messages (id, group_id, sender_id, body, sent_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, group_id, sender_id, body, sent_at],
            )?;
            Ok(())
        })
    }

    pub fn get_messages_for_group(&self, group_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, group_id, sender_id, body, sent_at
                 FROM chat_messages
                 WHERE group_id = ?1
                 ORDER BY sent_at",
            )?;

            let rows = stmt
                .query_map([group_id], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        group_id: row.get(1)?,
                        sender_id: row.get(2)?,
                        body: row.get(3)?,
                        sent_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_swipe(
    conn: &Connection,
    actor_id: &str,
    target_id: &str,
    action: &str,
) -> Result<Option<SwipeRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, actor_id, target_id, action, created_at
         FROM swipes
         WHERE actor_id = ?1 AND target_id = ?2 AND action = ?3
         LIMIT 1",
    )?;

    let row = stmt
        .query_row([actor_id, target_id, action], |row| {
            Ok(SwipeRow {
                id: row.get(0)?,
                actor_id: row.get(1)?,
                target_id: row.get(2)?,
                action: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn swipe_lookup_by_triple_and_by_actor() {
        let db = Database::open_in_memory().unwrap();

        db.insert_swipe("s1", "alice", "bob", "like", "2026-01-01T00:00:00Z").unwrap();
        db.insert_swipe("s2", "alice", "carol", "dislike", "2026-01-01T00:00:01Z").unwrap();

        assert!(db.find_swipe("alice", "bob", "like").unwrap().is_some());
        assert!(db.find_swipe("alice", "bob", "dislike").unwrap().is_none());
        assert!(db.find_swipe("bob", "alice", "like").unwrap().is_none());

        let likes = db.find_swipes_by_actor("alice", "like").unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].target_id, "bob");
    }

    #[test]
    fn reswipe_appends_instead_of_replacing() {
        let db = Database::open_in_memory().unwrap();

        db.insert_swipe("s1", "alice", "bob", "like", "2026-01-01T00:00:00Z").unwrap();
        db.insert_swipe("s2", "alice", "bob", "like", "2026-01-01T00:00:01Z").unwrap();

        let likes = db.find_swipes_by_actor("alice", "like").unwrap();
        assert_eq!(likes.len(), 2);
    }

    #[test]
    fn group_membership_is_a_set() {
        let db = Database::open_in_memory().unwrap();

        db.create_chat_group("g1", "trip", "2026-01-01T00:00:00Z", &["alice".into(), "bob".into()])
            .unwrap();

        db.add_member_to_group("g1", "bob").unwrap();
        db.add_member_to_group("g1", "carol").unwrap();
        db.add_member_to_group("g1", "carol").unwrap();

        let members = db.get_group_members("g1").unwrap();
        assert_eq!(members, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn missing_group_reads_as_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_chat_group("nope").unwrap().is_none());
    }

    #[test]
    fn messages_come_back_in_send_order() {
        let db = Database::open_in_memory().unwrap();

        db.create_chat_group("g1", "trip", "2026-01-01T00:00:00Z", &["alice".into()]).unwrap();
        db.insert_message("m2", "g1", "alice", "second", "2026-01-01T00:01:00Z").unwrap();
        db.insert_message("m1", "g1", "alice", "first", "2026-01-01T00:00:30Z").unwrap();

        let messages = db.get_messages_for_group("g1").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body, "first");
        assert_eq!(messages[1].body, "second");
    }
}
