use super::helpers::temp_store;
use crate::*;
use anyhow::Result;
use std::fs;

// --------------------- create / list ---------------------

#[test]
fn create_then_list_contains_name_once() -> Result<()> {
    let (_dir, store) = temp_store();
    store.create_class("C1")?;
    store.create_class("C2")?;

    let classes = store.list_classes()?;
    assert_eq!(classes.iter().filter(|c| *c == "C1").count(), 1);
    assert_eq!(classes.len(), 2);
    Ok(())
}

#[test]
fn create_builds_subdirectories() -> Result<()> {
    let (_dir, store) = temp_store();
    store.create_class("C1")?;
    let class_dir = store.root().join("C1");
    assert!(class_dir.join("groups").is_dir());
    assert!(class_dir.join("students").is_dir());
    assert!(class_dir.join("status").is_dir());
    Ok(())
}

#[test]
fn create_duplicate_fails_with_already_exists() -> Result<()> {
    let (_dir, store) = temp_store();
    store.create_class("C1")?;
    let err = store.create_class("C1").unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(store.list_classes()?, vec!["C1".to_string()]);
    Ok(())
}

#[test]
fn invalid_names_are_rejected_before_touching_disk() {
    let (_dir, store) = temp_store();
    for bad in ["", "   ", "..", "a/b", "a\\b", "x\ny", "a：b", "a,b", " padded "] {
        let err = store.create_class(bad).unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)), "accepted {bad:?}");
    }
    assert!(store.list_classes().unwrap().is_empty());
}

#[test]
fn list_ignores_plain_files_in_root() -> Result<()> {
    let (_dir, store) = temp_store();
    store.create_class("C1")?;
    fs::write(store.root().join("notes.txt"), "stray")?;
    assert_eq!(store.list_classes()?, vec!["C1".to_string()]);
    Ok(())
}

#[test]
fn list_on_empty_root_is_empty() -> Result<()> {
    let (_dir, store) = temp_store();
    assert!(store.list_classes()?.is_empty());
    Ok(())
}

// --------------------- rename ---------------------

#[test]
fn rename_moves_class_and_contents() -> Result<()> {
    let (_dir, store) = temp_store();
    store.create_class("C1")?;
    store.create_group("C1", "G1")?;

    store.rename_class("C1", "C2")?;

    let classes = store.list_classes()?;
    assert!(classes.contains(&"C2".to_string()));
    assert!(!classes.contains(&"C1".to_string()));
    assert_eq!(store.read_group("C2", "G1")?.name, "G1");
    Ok(())
}

#[test]
fn rename_onto_existing_fails_and_leaves_source() -> Result<()> {
    let (_dir, store) = temp_store();
    store.create_class("C1")?;
    store.create_group("C1", "G1")?;
    store.create_class("C2")?;

    let err = store.rename_class("C1", "C2").unwrap_err();
    assert!(err.is_already_exists());
    assert!(store.class_exists("C1"));
    assert!(store.read_group("C1", "G1").is_ok());
    Ok(())
}

#[test]
fn rename_missing_class_is_not_found() {
    let (_dir, store) = temp_store();
    let err = store.rename_class("ghost", "C2").unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            kind: EntityKind::Class,
            ..
        }
    ));
}

// --------------------- delete ---------------------

#[test]
fn delete_removes_whole_tree() -> Result<()> {
    let (_dir, store) = temp_store();
    store.create_class("C1")?;
    store.create_group("C1", "G1")?;
    store.create_student("C1", "S1", "Alice", "G1")?;

    store.delete_class("C1")?;
    assert!(!store.root().join("C1").exists());
    assert!(store.list_classes()?.is_empty());
    Ok(())
}

#[test]
fn delete_missing_class_is_not_found() {
    let (_dir, store) = temp_store();
    assert!(store.delete_class("ghost").unwrap_err().is_not_found());
}

#[test]
fn open_creates_root() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("a").join("b");
    let store = RosterStore::open(&root)?;
    assert!(root.is_dir());
    assert_eq!(store.root(), root.as_path());
    Ok(())
}
