//! # Store - Filesystem Roster Store
//!
//! Persists classes, groups, students and status events as a directory
//! hierarchy. There is no index file and no database: the directory listing
//! is the catalog.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//! └── <class>/
//!     ├── groups/
//!     │   └── <group>/
//!     │       ├── <group>.txt      group record (name, createdAt, class, score)
//!     │       └── students.txt     append-only "id,name" member list
//!     ├── students/
//!     │   └── <id>.txt             student record (id, name, group, joinedAt, photo)
//!     └── status/
//!         └── <epoch-ms>.txt       immutable status event
//! ```
//!
//! ## Module Responsibilities
//!
//! | Module         | Purpose                                                    |
//! |----------------|------------------------------------------------------------|
//! | [`lib.rs`]     | `RosterStore`, path construction, name validation          |
//! | [`class`]      | create / list / rename / delete classes                    |
//! | [`group`]      | group records, score read-modify-write, rename / delete    |
//! | [`student`]    | student records and the roster append                      |
//! | [`status`]     | `Status` labels and immutable status events                |
//! | [`index`]      | `RosterIndex`: uncached listings straight from disk        |
//! | [`attendance`] | `AttendanceRecorder`: validated status recording           |
//! | [`ledger`]     | `ScoreLedger`: validated group score updates               |
//! | [`fsio`]       | atomic write (temp + rename), append, directory moves      |
//!
//! ## Consistency
//!
//! Uniqueness is enforced by checking for an existing path before create,
//! never by locking. Every whole-file write is atomic at the file level.
//! Multi-step operations are not atomic as a whole:
//!
//! - `create_student` writes the student record, then appends to the group
//!   roster. If the append fails the record stays and
//!   [`StoreError::RosterAppend`] is returned.
//! - `rename_group` renames the directory, then the record file inside it.
//! - A group's `students.txt` is never rewritten, so deleting or renaming a
//!   student or group leaves stale member lines behind.
//!
//! All operations are synchronous and keep no in-memory state between calls,
//! so a `RosterStore` can be shared across threads by reference.
mod attendance;
mod class;
mod error;
mod fsio;
mod group;
mod index;
mod ledger;
mod status;
mod student;

pub use attendance::AttendanceRecorder;
pub use codec::RosterEntry;
pub use error::{EntityKind, Result, StoreError};
pub use group::GroupRecord;
pub use index::{GroupSummary, RosterIndex, StudentSummary};
pub use ledger::ScoreLedger;
pub use status::{Status, StatusEvent};
pub use student::StudentRecord;

use std::fs;
use std::path::{Path, PathBuf};

use codec::SEPARATOR;
use error::IoContext;

const GROUPS_DIR: &str = "groups";
const STUDENTS_DIR: &str = "students";
const STATUS_DIR: &str = "status";
const PHOTOS_DIR: &str = "photos";
const ROSTER_FILENAME: &str = "students.txt";

/// Timestamp format used for `createdAt` / `joinedAt` / status times.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filesystem-backed CRUD for classes, groups, students and status events.
///
/// Every path under the root is built here; no other component touches the
/// filesystem directly.
#[derive(Debug, Clone)]
pub struct RosterStore {
    root: PathBuf,
}

impl RosterStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).at(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read-only listings over this store.
    pub fn index(&self) -> RosterIndex<'_> {
        RosterIndex::new(self)
    }

    pub fn recorder(&self) -> AttendanceRecorder<'_> {
        AttendanceRecorder::new(self)
    }

    pub fn ledger(&self) -> ScoreLedger<'_> {
        ScoreLedger::new(self)
    }

    // -------------------- Paths --------------------

    pub(crate) fn class_dir(&self, class: &str) -> PathBuf {
        self.root.join(class)
    }

    pub(crate) fn groups_dir(&self, class: &str) -> PathBuf {
        self.class_dir(class).join(GROUPS_DIR)
    }

    pub(crate) fn group_dir(&self, class: &str, group: &str) -> PathBuf {
        self.groups_dir(class).join(group)
    }

    pub(crate) fn group_record_path(&self, class: &str, group: &str) -> PathBuf {
        self.group_dir(class, group).join(format!("{group}.txt"))
    }

    pub(crate) fn roster_path(&self, class: &str, group: &str) -> PathBuf {
        self.group_dir(class, group).join(ROSTER_FILENAME)
    }

    pub(crate) fn students_dir(&self, class: &str) -> PathBuf {
        self.class_dir(class).join(STUDENTS_DIR)
    }

    pub(crate) fn student_path(&self, class: &str, id: &str) -> PathBuf {
        self.students_dir(class).join(format!("{id}.txt"))
    }

    pub(crate) fn status_dir(&self, class: &str) -> PathBuf {
        self.class_dir(class).join(STATUS_DIR)
    }

    pub(crate) fn default_photo_path(&self, class: &str, id: &str) -> PathBuf {
        self.class_dir(class).join(PHOTOS_DIR).join(format!("{id}.jpg"))
    }

    /// Fails with `ClassNotFound` unless the class directory exists.
    pub(crate) fn require_class(&self, class: &str) -> Result<PathBuf> {
        let dir = self.class_dir(class);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StoreError::ClassNotFound(class.to_string()))
        }
    }
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub(crate) fn now_stamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Validates a name that becomes a single path component (class, group,
/// student id).
pub(crate) fn validate_component(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!("{what} must not be empty")));
    }
    if name != name.trim() {
        return Err(StoreError::InvalidInput(format!(
            "{what} must not start or end with whitespace: {name:?}"
        )));
    }
    if name == "." || name == ".." {
        return Err(StoreError::InvalidInput(format!("{what} must not be {name:?}")));
    }
    if name.contains(['/', '\\']) {
        return Err(StoreError::InvalidInput(format!(
            "{what} must not contain a path separator: {name:?}"
        )));
    }
    validate_text(what, name)
}

/// Validates free text stored inside a record or roster line.
pub(crate) fn validate_text(what: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r', SEPARATOR, codec::roster::DELIMITER]) {
        return Err(StoreError::InvalidInput(format!(
            "{what} must not contain a line break, '{SEPARATOR}' or '{}': {value:?}",
            codec::roster::DELIMITER
        )));
    }
    Ok(())
}

/// Whether `name` could ever be a stored component. Read paths use this to
/// answer "empty" for unusable names instead of probing arbitrary paths.
pub(crate) fn is_valid_component(name: &str) -> bool {
    validate_component("name", name).is_ok()
}

#[cfg(test)]
mod tests;
