//! Group roster lines: `id,name`, one member per line, append-only.

/// Delimiter between id and name on a roster line.
pub const DELIMITER: char = ',';

/// A member reference stored in a group's `students.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
}

impl RosterEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Formats the entry as a complete roster line, newline included.
    pub fn to_line(&self) -> String {
        format!("{}{}{}\n", self.id, DELIMITER, self.name)
    }
}

impl std::fmt::Display for RosterEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Parses roster text.
///
/// Lines with fewer than two fields are skipped; anything after the second
/// field is ignored.
pub fn decode(text: &str) -> Vec<RosterEntry> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.split(DELIMITER);
            let id = parts.next()?.trim();
            let name = parts.next()?.trim();
            if id.is_empty() {
                return None;
            }
            Some(RosterEntry::new(id, name))
        })
        .collect()
}
