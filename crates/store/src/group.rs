/// Group operations.
///
/// A group is a directory holding its record file (`<group>.txt`) and its
/// append-only member list (`students.txt`). The score is the only field
/// that changes after creation, through a read-modify-write of the record.
use std::fs;
use std::io;

use codec::{labels, Record};
use tracing::info;

use crate::error::{EntityKind, IoContext, Result, StoreError};
use crate::{fsio, now_stamp, validate_component, validate_text, RosterStore};

/// Decoded group record. Every field other than the name may be absent in
/// files written by older versions or edited by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub name: String,
    pub created_at: Option<String>,
    pub class: Option<String>,
    pub score: Option<String>,
}

impl GroupRecord {
    /// Builds the typed view of a record. `dir_name` supplies the name when
    /// the record lacks one.
    pub(crate) fn from_record(dir_name: &str, rec: &Record) -> Self {
        Self {
            name: rec.get(labels::GROUP_NAME).unwrap_or(dir_name).to_string(),
            created_at: rec.get(labels::GROUP_CREATED_AT).map(str::to_string),
            class: rec.get(labels::GROUP_CLASS).map(str::to_string),
            score: rec.get(labels::GROUP_SCORE).map(str::to_string),
        }
    }
}

impl RosterStore {
    /// Creates `groups/<name>/` with a record file {name, createdAt, class}
    /// and an empty member list.
    ///
    /// # Errors
    ///
    /// `ClassNotFound` if the class is missing, `AlreadyExists` if the group
    /// directory is present.
    pub fn create_group(&self, class: &str, name: &str) -> Result<GroupRecord> {
        validate_component("class name", class)?;
        validate_group_name(name)?;
        self.require_class(class)?;

        let groups_dir = self.groups_dir(class);
        fs::create_dir_all(&groups_dir).at(&groups_dir)?;

        let dir = self.group_dir(class, name);
        if dir.exists() {
            return Err(already_exists(name));
        }
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(already_exists(name)),
            Err(e) => return Err(e).at(&dir),
        }

        let rec = Record::new()
            .with(labels::GROUP_NAME, name)
            .with(labels::GROUP_CREATED_AT, now_stamp())
            .with(labels::GROUP_CLASS, class);
        fsio::atomic_write(&self.group_record_path(class, name), &rec.encode()?)?;

        let roster = self.roster_path(class, name);
        fsio::append_line(&roster, "").at(&roster)?;

        info!(class, group = name, "created group");
        Ok(GroupRecord::from_record(name, &rec))
    }

    /// Reads a group record. A missing record file inside an existing group
    /// directory reads as a record with only the name set.
    pub fn read_group(&self, class: &str, name: &str) -> Result<GroupRecord> {
        validate_component("class name", class)?;
        validate_component("group name", name)?;
        self.require_group_dir(class, name)?;

        let rec = fsio::read_optional(&self.group_record_path(class, name))?
            .map(|text| Record::decode(&text))
            .unwrap_or_default();
        Ok(GroupRecord::from_record(name, &rec))
    }

    /// Overwrites the group's score with `score`, trimmed.
    ///
    /// Every other line of the record is kept in its original order; any
    /// previous score line is dropped and the new score is written last. If
    /// the record file itself is missing the rewritten record holds only the
    /// score.
    ///
    /// # Errors
    ///
    /// `ClassNotFound`, or `NotFound` if the group directory is missing.
    pub fn update_group_score(&self, class: &str, name: &str, score: &str) -> Result<GroupRecord> {
        validate_component("class name", class)?;
        validate_component("group name", name)?;
        let score = score.trim();
        if score.is_empty() {
            return Err(StoreError::InvalidInput("score must not be empty".into()));
        }
        validate_text("score", score)?;
        self.require_group_dir(class, name)?;

        let path = self.group_record_path(class, name);
        let mut rec = fsio::read_optional(&path)?
            .map(|text| Record::decode(&text))
            .unwrap_or_default();
        rec.remove(labels::GROUP_SCORE);
        rec.push(labels::GROUP_SCORE, score);
        fsio::atomic_write(&path, &rec.encode()?)?;

        info!(class, group = name, score, "updated group score");
        Ok(GroupRecord::from_record(name, &rec))
    }

    /// Renames a group: the directory first, then its record file, whose name
    /// field is rewritten to `new`.
    ///
    /// Student records that name the old group and the member list are left
    /// as they are.
    pub fn rename_group(&self, class: &str, old: &str, new: &str) -> Result<()> {
        validate_component("class name", class)?;
        validate_component("group name", old)?;
        validate_group_name(new)?;
        let from = self.require_group_dir(class, old)?;
        let to = self.group_dir(class, new);
        if to.exists() {
            return Err(already_exists(new));
        }
        fsio::move_dir(&from, &to)?;

        let stale = to.join(format!("{old}.txt"));
        if let Some(text) = fsio::read_optional(&stale)? {
            let mut rec = Record::decode(&text);
            rec.set(labels::GROUP_NAME, new);
            fsio::atomic_write(&self.group_record_path(class, new), &rec.encode()?)?;
            fs::remove_file(&stale).at(&stale)?;
        }

        info!(class, from = old, to = new, "renamed group");
        Ok(())
    }

    /// Recursively deletes a group directory, record and member list included.
    pub fn delete_group(&self, class: &str, name: &str) -> Result<()> {
        validate_component("class name", class)?;
        validate_component("group name", name)?;
        let dir = self.require_group_dir(class, name)?;

        fs::remove_dir_all(&dir).at(&dir)?;
        info!(class, group = name, "deleted group");
        Ok(())
    }

    pub(crate) fn require_group_dir(&self, class: &str, name: &str) -> Result<std::path::PathBuf> {
        self.require_class(class)?;
        let dir = self.group_dir(class, name);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StoreError::NotFound {
                kind: EntityKind::Group,
                name: name.to_string(),
            })
        }
    }
}

/// A group named like the member list would share its file with it.
fn validate_group_name(name: &str) -> Result<()> {
    validate_component("group name", name)?;
    if format!("{name}.txt") == crate::ROSTER_FILENAME {
        return Err(StoreError::InvalidInput(format!(
            "group name {name:?} is reserved"
        )));
    }
    Ok(())
}

fn already_exists(name: &str) -> StoreError {
    StoreError::AlreadyExists {
        kind: EntityKind::Group,
        name: name.to_string(),
    }
}
