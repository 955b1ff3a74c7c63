/// Read path: listings built from directory enumeration.
///
/// Nothing is cached. Every call re-reads the directories involved, so a
/// listing always reflects the disk at call time. A class or group that does
/// not exist, or a name that could never be stored, lists as empty rather
/// than failing.
use std::path::PathBuf;

use codec::{roster, Record, RosterEntry};
use tracing::debug;

use crate::error::Result;
use crate::group::GroupRecord;
use crate::status::StatusEvent;
use crate::student::StudentRecord;
use crate::{fsio, is_valid_component, RosterStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub name: String,
    /// `None` when the group has never been scored.
    pub score: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub group: Option<String>,
}

impl From<StudentRecord> for StudentSummary {
    fn from(rec: StudentRecord) -> Self {
        Self {
            name: rec.name.unwrap_or_default(),
            id: rec.id,
            group: rec.group,
        }
    }
}

impl From<&StudentSummary> for RosterEntry {
    fn from(s: &StudentSummary) -> Self {
        RosterEntry::new(s.id.clone(), s.name.clone())
    }
}

/// Uncached queries over a [`RosterStore`].
#[derive(Debug, Clone, Copy)]
pub struct RosterIndex<'a> {
    store: &'a RosterStore,
}

impl<'a> RosterIndex<'a> {
    pub fn new(store: &'a RosterStore) -> Self {
        Self { store }
    }

    /// Same as [`RosterStore::list_classes`].
    pub fn list_classes(&self) -> Result<Vec<String>> {
        self.store.list_classes()
    }

    /// Groups of a class with their current scores, in directory order.
    pub fn list_groups(&self, class: &str) -> Result<Vec<GroupSummary>> {
        if !is_valid_component(class) {
            return Ok(Vec::new());
        }
        let names = fsio::child_names(&self.store.groups_dir(class), |p| p.is_dir())?;

        let mut groups = Vec::with_capacity(names.len());
        for name in names {
            let rec = fsio::read_optional(&self.store.group_record_path(class, &name))?
                .map(|text| Record::decode(&text))
                .unwrap_or_default();
            let GroupRecord { score, .. } = GroupRecord::from_record(&name, &rec);
            groups.push(GroupSummary { name, score });
        }
        debug!(class, count = groups.len(), "listed groups");
        Ok(groups)
    }

    /// Students of a class, in directory order.
    ///
    /// A record deleted between the directory listing and the read is skipped.
    pub fn list_students(&self, class: &str) -> Result<Vec<StudentSummary>> {
        if !is_valid_component(class) {
            return Ok(Vec::new());
        }
        let stems = fsio::record_stems(&self.store.students_dir(class))?;

        let mut students = Vec::with_capacity(stems.len());
        for stem in stems {
            if let Some(text) = fsio::read_optional(&self.store.student_path(class, &stem))? {
                let rec = StudentRecord::from_record(&stem, &Record::decode(&text));
                students.push(StudentSummary::from(rec));
            }
        }
        debug!(class, count = students.len(), "listed students");
        Ok(students)
    }

    /// Member references from the group's `students.txt`, in append order.
    ///
    /// These are whatever was appended; entries are not checked against the
    /// student records.
    pub fn list_group_members(&self, class: &str, group: &str) -> Result<Vec<RosterEntry>> {
        if !is_valid_component(class) || !is_valid_component(group) {
            return Ok(Vec::new());
        }
        let members = fsio::read_optional(&self.store.roster_path(class, group))?
            .map(|text| roster::decode(&text))
            .unwrap_or_default();
        debug!(class, group, count = members.len(), "listed group members");
        Ok(members)
    }

    /// Number of student record files in a class.
    pub fn student_count(&self, class: &str) -> Result<usize> {
        if !is_valid_component(class) {
            return Ok(0);
        }
        Ok(fsio::record_stems(&self.store.students_dir(class))?.len())
    }

    /// Where the student's photo is expected: the recorded path when there
    /// is one, otherwise `<class>/photos/<id>.jpg`. The file itself is not
    /// checked.
    pub fn photo_path(&self, class: &str, id: &str) -> Result<PathBuf> {
        if is_valid_component(class) && is_valid_component(id) {
            if let Some(text) = fsio::read_optional(&self.store.student_path(class, id))? {
                if let Some(photo) = StudentRecord::from_record(id, &Record::decode(&text)).photo {
                    return Ok(photo);
                }
            }
        }
        Ok(self.store.default_photo_path(class, id))
    }

    /// Status events of a class, oldest first.
    ///
    /// Files whose name is not an epoch timestamp, or whose content lacks a
    /// subject or a known status, are skipped.
    pub fn list_status_events(&self, class: &str) -> Result<Vec<StatusEvent>> {
        if !is_valid_component(class) {
            return Ok(Vec::new());
        }
        let dir = self.store.status_dir(class);
        let mut stamps: Vec<i64> = fsio::record_stems(&dir)?
            .into_iter()
            .filter_map(|stem| stem.parse().ok())
            .collect();
        stamps.sort_unstable();

        let mut events = Vec::with_capacity(stamps.len());
        for ts in stamps {
            let Some(text) = fsio::read_optional(&dir.join(format!("{ts}.txt")))? else {
                continue;
            };
            match StatusEvent::from_record(ts, &Record::decode(&text)) {
                Some(ev) => events.push(ev),
                None => debug!(class, timestamp_ms = ts, "skipping unreadable status event"),
            }
        }
        Ok(events)
    }
}
