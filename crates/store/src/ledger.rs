/// Group score updates.
use crate::error::{Result, StoreError};
use crate::group::GroupRecord;
use crate::RosterStore;

/// Validates raw score input and rewrites the group's score field.
///
/// The text is trimmed and must be non-empty. It is not required to be
/// numeric: whatever the caller typed is stored.
#[derive(Debug, Clone, Copy)]
pub struct ScoreLedger<'a> {
    store: &'a RosterStore,
}

impl<'a> ScoreLedger<'a> {
    pub fn new(store: &'a RosterStore) -> Self {
        Self { store }
    }

    pub fn update_score(&self, class: &str, group: &str, raw_score: &str) -> Result<GroupRecord> {
        if class.trim().is_empty() {
            return Err(StoreError::InvalidInput("no class selected".into()));
        }
        if group.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "no group selected; settle a group first".into(),
            ));
        }
        let score = raw_score.trim();
        if score.is_empty() {
            return Err(StoreError::InvalidInput("score must not be empty".into()));
        }
        self.store.update_group_score(class, group, score)
    }

    /// Current score of a group, `None` if it has never been scored.
    pub fn score(&self, class: &str, group: &str) -> Result<Option<String>> {
        Ok(self.store.read_group(class, group)?.score)
    }
}
