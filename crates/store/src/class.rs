/// Class operations: a class is nothing but a directory under the root.
use std::fs;
use std::io;

use tracing::{debug, info};

use crate::error::{EntityKind, IoContext, Result, StoreError};
use crate::{fsio, validate_component, RosterStore};

impl RosterStore {
    /// Creates `<root>/<name>/` with its `groups/`, `students/` and `status/`
    /// subdirectories.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a class directory with this name is present.
    pub fn create_class(&self, name: &str) -> Result<()> {
        validate_component("class name", name)?;
        let dir = self.class_dir(name);
        if dir.exists() {
            return Err(already_exists(name));
        }

        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(already_exists(name)),
            Err(e) => return Err(e).at(&dir),
        }
        for sub in [self.groups_dir(name), self.students_dir(name), self.status_dir(name)] {
            fs::create_dir_all(&sub).at(&sub)?;
        }

        info!(class = name, "created class");
        Ok(())
    }

    /// Lists class names.
    ///
    /// The order is whatever the directory listing returns and is not
    /// guaranteed to be alphabetical or stable across platforms. Callers that
    /// need a particular order must sort.
    pub fn list_classes(&self) -> Result<Vec<String>> {
        let names = fsio::child_names(&self.root, |p| p.is_dir())?;
        debug!(count = names.len(), "listed classes");
        Ok(names)
    }

    pub fn class_exists(&self, name: &str) -> bool {
        crate::is_valid_component(name) && self.class_dir(name).is_dir()
    }

    /// Renames a class directory.
    ///
    /// Uses a single directory rename where possible. Otherwise the tree is
    /// copied and the original removed; a failed copy is cleaned up so the
    /// original stays intact.
    ///
    /// # Errors
    ///
    /// `NotFound` if `old` is missing, `AlreadyExists` if `new` is taken.
    pub fn rename_class(&self, old: &str, new: &str) -> Result<()> {
        validate_component("class name", old)?;
        validate_component("class name", new)?;

        let from = self.class_dir(old);
        if !from.is_dir() {
            return Err(StoreError::NotFound {
                kind: EntityKind::Class,
                name: old.to_string(),
            });
        }
        let to = self.class_dir(new);
        if to.exists() {
            return Err(already_exists(new));
        }
        fsio::move_dir(&from, &to)?;
        info!(from = old, to = new, "renamed class");
        Ok(())
    }

    /// Recursively deletes a class and everything in it.
    ///
    /// A failure part-way leaves some files removed and is reported as `Io`.
    pub fn delete_class(&self, name: &str) -> Result<()> {
        validate_component("class name", name)?;
        let dir = self.class_dir(name);
        if !dir.is_dir() {
            return Err(StoreError::NotFound {
                kind: EntityKind::Class,
                name: name.to_string(),
            });
        }

        fs::remove_dir_all(&dir).at(&dir)?;
        info!(class = name, "deleted class");
        Ok(())
    }
}

fn already_exists(name: &str) -> StoreError {
    StoreError::AlreadyExists {
        kind: EntityKind::Class,
        name: name.to_string(),
    }
}
