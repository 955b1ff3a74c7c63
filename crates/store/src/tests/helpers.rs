use std::fs;
use std::path::Path;

use tempfile::{tempdir, TempDir};

use crate::RosterStore;

/// A store rooted in a fresh temporary directory. Keep the `TempDir` alive
/// for the duration of the test.
pub fn temp_store() -> (TempDir, RosterStore) {
    let dir = tempdir().unwrap();
    let store = RosterStore::open(dir.path().join("classes")).unwrap();
    (dir, store)
}

/// A store with class `C1` and group `G1` already created.
pub fn seeded_store() -> (TempDir, RosterStore) {
    let (dir, store) = temp_store();
    store.create_class("C1").unwrap();
    store.create_group("C1", "G1").unwrap();
    (dir, store)
}

pub fn count_txt_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| ext == "txt")
                .unwrap_or(false)
        })
        .count()
}
