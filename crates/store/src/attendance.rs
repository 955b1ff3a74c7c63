/// Attendance and participation recording on top of status events.
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::status::{Status, StatusEvent};
use crate::RosterStore;

/// Records the outcome for a settled selection.
///
/// Clearing the caller's "current selection" after a successful record is
/// left to the caller.
#[derive(Debug, Clone, Copy)]
pub struct AttendanceRecorder<'a> {
    store: &'a RosterStore,
}

impl<'a> AttendanceRecorder<'a> {
    pub fn new(store: &'a RosterStore) -> Self {
        Self { store }
    }

    /// Writes one status event for `subject`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` without touching the disk when no class is selected or
    /// the subject is empty (nothing has settled yet).
    pub fn record_status(&self, class: &str, subject: &str, status: Status) -> Result<StatusEvent> {
        if class.trim().is_empty() {
            return Err(StoreError::InvalidInput("no class selected".into()));
        }
        if subject.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "no student selected; settle a selection first".into(),
            ));
        }
        debug!(class, subject, %status, "recording status");
        self.store.append_status_event(class, subject, status)
    }

    /// Parses `status` (English name or on-disk label) and records it.
    pub fn record_status_str(&self, class: &str, subject: &str, status: &str) -> Result<StatusEvent> {
        let status: Status = status.parse()?;
        self.record_status(class, subject, status)
    }
}
