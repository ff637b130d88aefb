use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use encore_db::Database;
use encore_db::models::{GroupRow, MessageRow};
use encore_types::models::{ChatGroup, ChatMessage};

use crate::error::{Error, Result};
use crate::matching::MatchEngine;

/// Gates group membership and messaging on match state.
///
/// Every check re-reads current state through the match engine or the group
/// store; no write to membership or message history happens unless its check
/// passed first.
#[derive(Clone)]
pub struct ChatAuthority {
    engine: MatchEngine,
    db: Arc<Database>,
}

impl ChatAuthority {
    pub fn new(engine: MatchEngine, db: Arc<Database>) -> Self {
        Self { engine, db }
    }

    /// Creates a group containing the creator plus `members`, all of whom
    /// must be matched with the creator. An empty member list is legal and
    /// yields a group of one.
    pub fn create_group(
        &self,
        group_name: &str,
        creator_id: Uuid,
        members: &[Uuid],
    ) -> Result<ChatGroup> {
        let matches = self.engine.get_matches(creator_id)?;
        for member in members {
            if !matches.contains(member) {
                return Err(Error::Authorization(format!(
                    "user {member} is not matched with the creator and cannot be added to the group"
                )));
            }
        }

        // Creator first, then requested members, deduplicated.
        let mut group_members = vec![creator_id];
        for member in members {
            if !group_members.contains(member) {
                group_members.push(*member);
            }
        }

        let group_id = Uuid::new_v4();
        let created_at = Utc::now();
        let member_ids: Vec<String> = group_members.iter().map(Uuid::to_string).collect();
        self.db.create_chat_group(
            &group_id.to_string(),
            group_name,
            &created_at.to_rfc3339(),
            &member_ids,
        )?;

        Ok(ChatGroup {
            id: group_id,
            group_name: group_name.to_string(),
            members: group_members,
            created_at,
        })
    }

    /// Adds a member, gated on the creator's match set. Adding someone who
    /// is already a member is a no-op. Returns the refreshed group.
    pub fn add_member(
        &self,
        group_id: Uuid,
        new_member_id: Uuid,
        creator_id: Uuid,
    ) -> Result<ChatGroup> {
        let matches = self.engine.get_matches(creator_id)?;
        if !matches.contains(&new_member_id) {
            return Err(Error::Authorization(format!(
                "user {new_member_id} is not matched with the creator and cannot be added"
            )));
        }

        // Existence check before the membership write.
        self.load_group(group_id)?;

        self.db
            .add_member_to_group(&group_id.to_string(), &new_member_id.to_string())?;

        self.load_group(group_id)
    }

    pub fn get_group_details(&self, group_id: Uuid) -> Result<ChatGroup> {
        self.load_group(group_id)
    }

    /// Persists a message after verifying the sender is a current member.
    pub fn send_message(&self, group_id: Uuid, sender_id: Uuid, text: &str) -> Result<ChatMessage> {
        let group = self.load_group(group_id)?;
        if !group.members.contains(&sender_id) {
            return Err(Error::Authorization(
                "sender is not a member of this chat group".into(),
            ));
        }

        let message_id = Uuid::new_v4();
        let sent_at = Utc::now();
        self.db.insert_message(
            &message_id.to_string(),
            &group_id.to_string(),
            &sender_id.to_string(),
            text,
            &sent_at.to_rfc3339(),
        )?;

        Ok(ChatMessage {
            id: message_id,
            group_id,
            sender_id,
            text: text.to_string(),
            sent_at,
        })
    }

    /// Full message history of a group in send order.
    pub fn get_group_messages(&self, group_id: Uuid) -> Result<Vec<ChatMessage>> {
        self.load_group(group_id)?;

        let rows = self.db.get_messages_for_group(&group_id.to_string())?;
        rows.into_iter().map(message_from_row).collect()
    }

    fn load_group(&self, group_id: Uuid) -> Result<ChatGroup> {
        let row = self
            .db
            .get_chat_group(&group_id.to_string())?
            .ok_or_else(|| Error::NotFound("chat group not found".into()))?;
        let members = self.db.get_group_members(&group_id.to_string())?;
        group_from_row(row, members)
    }
}

fn group_from_row(row: GroupRow, members: Vec<String>) -> Result<ChatGroup> {
    Ok(ChatGroup {
        id: parse_uuid(&row.id, "group id")?,
        group_name: row.group_name,
        members: members
            .iter()
            .map(|m| parse_uuid(m, "group member"))
            .collect::<Result<_>>()?,
        created_at: parse_timestamp(&row.created_at, "group created_at")?,
    })
}

fn message_from_row(row: MessageRow) -> Result<ChatMessage> {
    Ok(ChatMessage {
        id: parse_uuid(&row.id, "message id")?,
        group_id: parse_uuid(&row.group_id, "message group_id")?,
        sender_id: parse_uuid(&row.sender_id, "message sender_id")?,
        text: row.body,
        sent_at: parse_timestamp(&row.sent_at, "message sent_at")?,
    })
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Storage(anyhow!("corrupt {what} '{value}': {e}")))
}

fn parse_timestamp(value: &str, what: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Storage(anyhow!("corrupt {what} '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_types::models::SwipeAction;

    fn fixture() -> (MatchEngine, ChatAuthority) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let engine = MatchEngine::new(db.clone());
        let chats = ChatAuthority::new(engine.clone(), db);
        (engine, chats)
    }

    fn matched_pair(engine: &MatchEngine) -> (Uuid, Uuid) {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        engine.record_swipe(a, b, SwipeAction::Like).unwrap();
        engine.record_swipe(b, a, SwipeAction::Like).unwrap();
        (a, b)
    }

    #[test]
    fn group_creation_requires_matches() {
        let (engine, chats) = fixture();
        let (a, b) = matched_pair(&engine);
        let stranger = Uuid::new_v4();

        let group = chats.create_group("trip", a, &[b]).unwrap();
        assert_eq!(group.members, vec![a, b]);

        let err = chats.create_group("trip", a, &[b, stranger]).unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
    }

    #[test]
    fn solo_group_is_legal() {
        let (_, chats) = fixture();
        let a = Uuid::new_v4();

        let group = chats.create_group("just me", a, &[]).unwrap();
        assert_eq!(group.members, vec![a]);
    }

    #[test]
    fn creator_listed_as_member_is_not_duplicated() {
        let (engine, chats) = fixture();
        let (a, b) = matched_pair(&engine);

        // Creator can only appear in the member list if matched with
        // themselves, which record_swipe forbids; b twice exercises dedup.
        let group = chats.create_group("trip", a, &[b, b]).unwrap();
        assert_eq!(group.members, vec![a, b]);
    }

    #[test]
    fn add_member_is_idempotent() {
        let (engine, chats) = fixture();
        let (a, b) = matched_pair(&engine);
        let c = Uuid::new_v4();
        engine.record_swipe(a, c, SwipeAction::Like).unwrap();
        engine.record_swipe(c, a, SwipeAction::Like).unwrap();

        let group = chats.create_group("trip", a, &[b]).unwrap();

        let once = chats.add_member(group.id, c, a).unwrap();
        assert_eq!(once.members, vec![a, b, c]);

        let twice = chats.add_member(group.id, c, a).unwrap();
        assert_eq!(twice.members, vec![a, b, c]);
    }

    #[test]
    fn add_member_rejects_unmatched_user() {
        let (engine, chats) = fixture();
        let (a, b) = matched_pair(&engine);
        let stranger = Uuid::new_v4();

        let group = chats.create_group("trip", a, &[b]).unwrap();

        let err = chats.add_member(group.id, stranger, a).unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));

        let unchanged = chats.get_group_details(group.id).unwrap();
        assert_eq!(unchanged.members, vec![a, b]);
    }

    #[test]
    fn add_member_to_unknown_group_is_not_found() {
        let (engine, chats) = fixture();
        let (a, b) = matched_pair(&engine);

        let err = chats.add_member(Uuid::new_v4(), b, a).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn unknown_group_details_are_not_found() {
        let (_, chats) = fixture();

        let err = chats.get_group_details(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn messages_are_gated_on_membership() {
        let (engine, chats) = fixture();
        let (a, b) = matched_pair(&engine);
        let outsider = Uuid::new_v4();

        let group = chats.create_group("trip", a, &[b]).unwrap();

        let sent = chats.send_message(group.id, b, "hi").unwrap();
        assert_eq!(sent.sender_id, b);
        assert_eq!(sent.text, "hi");

        let err = chats.send_message(group.id, outsider, "hi").unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));

        let history = chats.get_group_messages(group.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender_id, b);
        assert_eq!(history[0].text, "hi");
    }

    #[test]
    fn message_to_unknown_group_is_not_found() {
        let (_, chats) = fixture();

        let err = chats.send_message(Uuid::new_v4(), Uuid::new_v4(), "hi").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn history_of_unknown_group_is_not_found() {
        let (_, chats) = fixture();

        let err = chats.get_group_messages(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    // The full walkthrough: like both ways, form a group, message it.
    #[test]
    fn swipe_to_message_walkthrough() {
        let (engine, chats) = fixture();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let c = Uuid::new_v4();

        assert!(!engine.record_swipe(a, b, SwipeAction::Like).unwrap().matched);
        assert!(engine.record_swipe(b, a, SwipeAction::Like).unwrap().matched);

        assert_eq!(engine.get_matches(a).unwrap(), vec![b]);
        assert_eq!(engine.get_matches(b).unwrap(), vec![a]);

        let group = chats.create_group("trip", a, &[b]).unwrap();
        assert_eq!(group.members, vec![a, b]);

        chats.send_message(group.id, b, "hi").unwrap();
        let err = chats.send_message(group.id, c, "hi").unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
    }
}
