/// Status events: immutable, one file per event, named by epoch millis.
///
/// Two events in the same millisecond map to the same file. The second write
/// replaces the first (last writer wins); nothing else ever rewrites a
/// status file.
use std::fmt;
use std::fs;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use codec::{labels, Record};
use tracing::{info, warn};

use crate::error::{IoContext, Result, StoreError};
use crate::{fsio, validate_component, validate_text, RosterStore, TIMESTAMP_FORMAT};

/// The closed set of attendance / participation outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Absent,
    Leave,
    Answered,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Absent, Status::Leave, Status::Answered];

    /// The word written to disk.
    pub fn label(self) -> &'static str {
        match self {
            Status::Absent => "缺勤",
            Status::Leave => "请假",
            Status::Answered => "答题",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Absent => "absent",
            Status::Leave => "leave",
            Status::Answered => "answered",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the English name (any case) or the on-disk label.
impl FromStr for Status {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Status::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s) || st.label() == s)
            .ok_or_else(|| StoreError::InvalidInput(format!("unknown status: {s:?}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// Epoch milliseconds; also the file stem.
    pub timestamp_ms: i64,
    pub subject: String,
    pub status: Status,
    /// Human-readable time as stored in the file.
    pub time: Option<String>,
}

impl StatusEvent {
    /// Returns `None` for files missing a subject or carrying an unknown status.
    pub(crate) fn from_record(timestamp_ms: i64, rec: &Record) -> Option<Self> {
        let subject = rec.get(labels::STATUS_SUBJECT)?.to_string();
        let status = rec.get(labels::STATUS_LABEL)?.parse().ok()?;
        Some(Self {
            timestamp_ms,
            subject,
            status,
            time: rec.get(labels::STATUS_TIME).map(str::to_string),
        })
    }
}

impl RosterStore {
    /// Writes a new status event stamped with the current time.
    pub fn append_status_event(&self, class: &str, subject: &str, status: Status) -> Result<StatusEvent> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| StoreError::InvalidInput(format!("system clock before epoch: {e}")))?;
        self.append_status_event_at(class, subject, status, now.as_millis() as i64)
    }

    /// Writes a status event for an explicit timestamp.
    ///
    /// An existing event with the same timestamp is overwritten.
    pub fn append_status_event_at(
        &self,
        class: &str,
        subject: &str,
        status: Status,
        timestamp_ms: i64,
    ) -> Result<StatusEvent> {
        validate_component("class name", class)?;
        if subject.trim().is_empty() {
            return Err(StoreError::InvalidInput("status subject must not be empty".into()));
        }
        validate_text("status subject", subject)?;
        self.require_class(class)?;

        let time = DateTime::from_timestamp_millis(timestamp_ms)
            .map(|t| t.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string())
            .ok_or_else(|| StoreError::InvalidInput(format!("timestamp out of range: {timestamp_ms}")))?;

        let dir = self.status_dir(class);
        fs::create_dir_all(&dir).at(&dir)?;
        let path = dir.join(format!("{timestamp_ms}.txt"));
        if path.exists() {
            warn!(class, timestamp_ms, "status event collision, overwriting");
        }

        let rec = Record::new()
            .with(labels::STATUS_SUBJECT, subject.trim())
            .with(labels::STATUS_LABEL, status.label())
            .with(labels::STATUS_TIME, time.clone());
        fsio::atomic_write(&path, &rec.encode()?)?;

        info!(class, subject, %status, timestamp_ms, "recorded status");
        Ok(StatusEvent {
            timestamp_ms,
            subject: subject.trim().to_string(),
            status,
            time: Some(time),
        })
    }
}
