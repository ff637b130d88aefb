use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use uuid::Uuid;

use encore_db::Database;
use encore_types::models::SwipeAction;

use crate::error::{Error, Result};

/// What a single swipe did: whether it completed a mutual like, plus the
/// status line surfaced to the caller.
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    pub message: &'static str,
    pub matched: bool,
}

/// Records swipes and derives match state from the swipe log.
///
/// Matches are computed, never stored: a pair is matched exactly when a like
/// exists in both directions, so match state cannot drift out of sync with
/// the underlying swipes.
#[derive(Clone)]
pub struct MatchEngine {
    db: Arc<Database>,
}

impl MatchEngine {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Persists one swipe. A like triggers a reciprocity check against the
    /// opposite direction; a dislike never does.
    ///
    /// Two reciprocal likes landing near-simultaneously can both miss the
    /// other's write and report `matched: false` — tolerated, since match
    /// status is recomputable via [`get_matches`](Self::get_matches).
    pub fn record_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        action: SwipeAction,
    ) -> Result<SwipeOutcome> {
        if actor_id == target_id {
            return Err(Error::Validation("cannot swipe on yourself".into()));
        }

        let swipe_id = Uuid::new_v4();
        self.db.insert_swipe(
            &swipe_id.to_string(),
            &actor_id.to_string(),
            &target_id.to_string(),
            action.as_str(),
            &Utc::now().to_rfc3339(),
        )?;

        if action == SwipeAction::Like {
            let reciprocal = self.db.find_swipe(
                &target_id.to_string(),
                &actor_id.to_string(),
                SwipeAction::Like.as_str(),
            )?;
            if reciprocal.is_some() {
                return Ok(SwipeOutcome {
                    message: "It's a match!",
                    matched: true,
                });
            }
        }

        Ok(SwipeOutcome {
            message: "Swipe recorded",
            matched: false,
        })
    }

    /// Everyone matched with `user_id`: the distinct like-targets of the
    /// user, filtered to those who liked back. One reciprocity lookup per
    /// distinct target.
    pub fn get_matches(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let likes = self
            .db
            .find_swipes_by_actor(&user_id.to_string(), SwipeAction::Like.as_str())?;

        // Repeated likes of the same target collapse to one candidate.
        let targets: BTreeSet<String> = likes.into_iter().map(|s| s.target_id).collect();

        let mut matches = Vec::new();
        for target in targets {
            let reciprocal = self.db.find_swipe(
                &target,
                &user_id.to_string(),
                SwipeAction::Like.as_str(),
            )?;
            if reciprocal.is_some() {
                let id = Uuid::parse_str(&target)
                    .map_err(|e| Error::Storage(anyhow!("corrupt swipe target '{}': {}", target, e)))?;
                matches.push(id);
            }
        }

        Ok(matches)
    }
}
