//! # Codec - Roster Record Format
//!
//! Serializes a single roster entity (group, student, status event) to and
//! from the line-oriented text format used on disk.
//!
//! ## Record Format
//!
//! ```text
//! 小组名称：G1
//! 创建时间：2026-10-19 09:30:00
//! 所属班级：C1
//! 分数：95
//! ```
//!
//! One `label：value` pair per line, separated by the full-width colon `：`
//! (U+FF1A). Values are written verbatim: there is no escaping, so a value
//! must not contain the separator or a line break, and must not start or end
//! with whitespace. [`Record::encode`] rejects such values instead of
//! producing a file that would read back differently.
//!
//! Writing is strict (fixed layout, one newline per field) while reading is
//! lenient: lines without a separator are skipped, surrounding whitespace is
//! trimmed, and a label that is missing simply reads as `None`. Older files
//! that predate a field therefore still load.
//!
//! ## Group Roster Format
//!
//! A group's member list is a separate append-only file, one `id,name` pair
//! per line with no header. See [`roster`].
//!
//! ## Example
//!
//! ```rust
//! use codec::{labels, Record};
//!
//! let text = Record::new()
//!     .with(labels::GROUP_NAME, "G1")
//!     .with(labels::GROUP_CLASS, "C1")
//!     .encode()
//!     .unwrap();
//! assert_eq!(text, "小组名称：G1\n所属班级：C1\n");
//!
//! let rec = Record::decode(&text);
//! assert_eq!(rec.get(labels::GROUP_NAME), Some("G1"));
//! assert_eq!(rec.get(labels::GROUP_SCORE), None);
//! ```

pub mod labels;
pub mod roster;

pub use roster::RosterEntry;

use thiserror::Error;

/// Separator between a label and its value (full-width colon).
pub const SEPARATOR: char = '：';

/// Errors raised when a record cannot be encoded faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A label or value contains `\n` or `\r`.
    #[error("field `{label}` contains a line break")]
    LineBreak { label: String },

    /// A label or value contains the `：` separator.
    #[error("field `{label}` contains the separator '：'")]
    Separator { label: String },

    /// A label or value starts or ends with whitespace, which a read would
    /// trim away.
    #[error("field `{label}` has leading or trailing whitespace")]
    Padded { label: String },

    /// A label is empty.
    #[error("empty field label")]
    EmptyLabel,
}

/// An ordered sequence of `(label, value)` pairs.
///
/// Order is preserved on both encode and decode. Labels are not required to
/// be known to the caller; unrecognized pairs survive a decode/encode cycle,
/// which lets read-modify-write callers rewrite a file without dropping
/// fields they do not understand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder form of [`Record::push`].
    #[must_use]
    pub fn with(mut self, label: &str, value: impl Into<String>) -> Self {
        self.push(label, value);
        self
    }

    /// Appends a field at the end, even if the label is already present.
    pub fn push(&mut self, label: &str, value: impl Into<String>) {
        self.fields.push((label.to_string(), value.into()));
    }

    /// Returns the value of the first field with this label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the value of the first field with this label in place, or
    /// appends the field if the label is absent.
    pub fn set(&mut self, label: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(l, _)| l == label) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((label.to_string(), value)),
        }
    }

    /// Removes every field with this label, returning the first removed value.
    pub fn remove(&mut self, label: &str) -> Option<String> {
        let first = self.get(label).map(str::to_string);
        self.fields.retain(|(l, _)| l != label);
        first
    }

    /// Iterates over `(label, value)` pairs in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serializes the record: one `label：value\n` line per field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if any label is empty, or if a label or value
    /// contains a line break or the separator or carries surrounding
    /// whitespace.
    pub fn encode(&self) -> Result<String, CodecError> {
        let mut out = String::with_capacity(self.fields.len() * 24);
        for (label, value) in &self.fields {
            check_field(label, value)?;
            out.push_str(label);
            out.push(SEPARATOR);
            out.push_str(value);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parses record text. Never fails.
    ///
    /// Each line is split on its first separator; label and value are
    /// trimmed. Lines without a separator or with an empty label are skipped.
    pub fn decode(text: &str) -> Self {
        let fields = text
            .lines()
            .filter_map(|line| {
                let (label, value) = line.split_once(SEPARATOR)?;
                let label = label.trim();
                if label.is_empty() {
                    return None;
                }
                Some((label.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { fields }
    }
}

/// Checks that a value reads back exactly as written.
fn check_value(label: &str, value: &str) -> Result<(), CodecError> {
    if value.contains(['\n', '\r']) {
        return Err(CodecError::LineBreak {
            label: label.to_string(),
        });
    }
    if value.contains(SEPARATOR) {
        return Err(CodecError::Separator {
            label: label.to_string(),
        });
    }
    if value != value.trim() {
        return Err(CodecError::Padded {
            label: label.to_string(),
        });
    }
    Ok(())
}

fn check_field(label: &str, value: &str) -> Result<(), CodecError> {
    if label.trim().is_empty() {
        return Err(CodecError::EmptyLabel);
    }
    check_value(label, label)?;
    check_value(label, value)
}
