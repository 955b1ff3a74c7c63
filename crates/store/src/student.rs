/// Student operations.
///
/// Adding a student is a two-step write: the record file under `students/`,
/// then one `id,name` line appended to the group's member list. The second
/// step can fail after the first succeeded; that outcome is reported as
/// [`StoreError::RosterAppend`] and nothing is rolled back.
use std::fs;
use std::path::PathBuf;

use codec::{labels, Record, RosterEntry};
use tracing::{info, warn};

use crate::error::{EntityKind, IoContext, Result, StoreError};
use crate::{fsio, now_stamp, validate_component, validate_text, RosterStore};

/// Decoded student record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: String,
    pub name: Option<String>,
    pub group: Option<String>,
    pub joined_at: Option<String>,
    pub photo: Option<PathBuf>,
}

impl StudentRecord {
    pub(crate) fn from_record(file_stem: &str, rec: &Record) -> Self {
        Self {
            id: rec.get(labels::STUDENT_ID).unwrap_or(file_stem).to_string(),
            name: rec.get(labels::STUDENT_NAME).map(str::to_string),
            group: rec.get(labels::STUDENT_GROUP).map(str::to_string),
            joined_at: rec.get(labels::STUDENT_JOINED_AT).map(str::to_string),
            photo: rec
                .get(labels::STUDENT_PHOTO)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl RosterStore {
    /// Adds a student to a class and to one of its groups.
    ///
    /// # Errors
    ///
    /// - `ClassNotFound` / `GroupNotFound` if the class or target group is
    ///   missing when the call starts.
    /// - `AlreadyExists` if `students/<id>.txt` is present.
    /// - `RosterAppend` if the record was written but the member list append
    ///   failed (for example because the group was deleted in between).
    pub fn create_student(&self, class: &str, id: &str, name: &str, group: &str) -> Result<StudentRecord> {
        validate_component("class name", class)?;
        validate_component("student id", id)?;
        validate_component("group name", group)?;
        if name.trim().is_empty() {
            return Err(StoreError::InvalidInput("student name must not be empty".into()));
        }
        validate_text("student name", name)?;
        let name = name.trim();

        self.require_class(class)?;
        if !self.group_dir(class, group).is_dir() {
            return Err(StoreError::GroupNotFound {
                class: class.to_string(),
                group: group.to_string(),
            });
        }

        let students_dir = self.students_dir(class);
        fs::create_dir_all(&students_dir).at(&students_dir)?;
        let path = self.student_path(class, id);
        if path.exists() {
            return Err(StoreError::AlreadyExists {
                kind: EntityKind::Student,
                name: id.to_string(),
            });
        }

        let rec = Record::new()
            .with(labels::STUDENT_ID, id)
            .with(labels::STUDENT_NAME, name)
            .with(labels::STUDENT_GROUP, group)
            .with(labels::STUDENT_JOINED_AT, now_stamp());
        fsio::atomic_write(&path, &rec.encode()?)?;
        info!(class, id, group, "created student");

        // The group may have vanished since the check above; do not recreate it.
        let roster = self.roster_path(class, group);
        let appended = if self.group_dir(class, group).is_dir() {
            fsio::append_line(&roster, &RosterEntry::new(id, name).to_line())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "group directory disappeared",
            ))
        };
        if let Err(source) = appended {
            warn!(class, id, group, error = %source, "student saved but roster append failed");
            return Err(StoreError::RosterAppend {
                id: id.to_string(),
                group: group.to_string(),
                source,
            });
        }

        Ok(StudentRecord::from_record(id, &rec))
    }

    pub fn read_student(&self, class: &str, id: &str) -> Result<StudentRecord> {
        validate_component("class name", class)?;
        validate_component("student id", id)?;
        self.require_class(class)?;

        let text = fsio::read_optional(&self.student_path(class, id))?.ok_or_else(|| {
            StoreError::NotFound {
                kind: EntityKind::Student,
                name: id.to_string(),
            }
        })?;
        Ok(StudentRecord::from_record(id, &Record::decode(&text)))
    }

    /// Deletes a student record. The group member list keeps its line.
    pub fn delete_student(&self, class: &str, id: &str) -> Result<()> {
        validate_component("class name", class)?;
        validate_component("student id", id)?;
        self.require_class(class)?;

        let path = self.student_path(class, id);
        if !path.is_file() {
            return Err(StoreError::NotFound {
                kind: EntityKind::Student,
                name: id.to_string(),
            });
        }
        fs::remove_file(&path).at(&path)?;
        info!(class, id, "deleted student");
        Ok(())
    }

    /// Sets or replaces the photo path recorded for a student.
    pub fn set_student_photo(&self, class: &str, id: &str, photo: &str) -> Result<StudentRecord> {
        validate_component("class name", class)?;
        validate_component("student id", id)?;
        let photo = photo.trim();
        validate_text("photo path", photo)?;
        self.require_class(class)?;

        let path = self.student_path(class, id);
        let text = fsio::read_optional(&path)?.ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::Student,
            name: id.to_string(),
        })?;
        let mut rec = Record::decode(&text);
        rec.set(labels::STUDENT_PHOTO, photo);
        fsio::atomic_write(&path, &rec.encode()?)?;
        Ok(StudentRecord::from_record(id, &rec))
    }
}
