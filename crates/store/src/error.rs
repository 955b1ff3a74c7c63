use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use codec::CodecError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Which kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Class,
    Group,
    Student,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Class => "class",
            EntityKind::Group => "group",
            EntityKind::Student => "student",
        })
    }
}

/// Errors returned by every roster operation.
///
/// Validation variants (`InvalidInput`, `ClassNotFound`, `GroupNotFound`,
/// `NotFound`, `AlreadyExists`) are raised before anything on disk changes.
/// `Io` means the filesystem failed part-way and the caller decides whether
/// to retry. `RosterAppend` is the one partial-success outcome: the student
/// record exists but the group's member list was not updated.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: EntityKind, name: String },

    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("group not found: {group} (class {class})")]
    GroupNotFound { class: String, group: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("student {id} was saved but appending to the roster of group {group} failed: {source}")]
    RosterAppend {
        id: String,
        group: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. }
                | StoreError::ClassNotFound(_)
                | StoreError::GroupNotFound { .. }
        )
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}

/// Attaches the offending path to a raw I/O error.
pub(crate) trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
