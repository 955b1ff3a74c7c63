use crate::fsio;
use anyhow::Result;
use std::fs;
use tempfile::tempdir;

#[test]
fn atomic_write_replaces_whole_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("r.txt");
    fsio::atomic_write(&path, "a：1\nb：2\n")?;
    fsio::atomic_write(&path, "a：3\n")?;
    assert_eq!(fs::read_to_string(&path)?, "a：3\n");
    // Only the target remains; no temp files are left behind.
    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn atomic_write_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("r.txt");
    assert!(fsio::atomic_write(&path, "x：1\n").is_err());
    assert!(!path.exists());
}

#[test]
fn copy_then_remove_moves_whole_tree() -> Result<()> {
    let dir = tempdir()?;
    let from = dir.path().join("G1");
    fs::create_dir_all(from.join("nested"))?;
    fs::write(from.join("G1.txt"), "小组名称：G1\n")?;
    fs::write(from.join("nested").join("students.txt"), "S1,Alice\n")?;

    let to = dir.path().join("G2");
    fsio::copy_then_remove(&from, &to)?;

    assert!(!from.exists());
    assert_eq!(fs::read_to_string(to.join("G1.txt"))?, "小组名称：G1\n");
    assert_eq!(
        fs::read_to_string(to.join("nested").join("students.txt"))?,
        "S1,Alice\n"
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn failed_copy_removes_partial_destination_and_keeps_source() -> Result<()> {
    let dir = tempdir()?;
    let from = dir.path().join("C1");
    fs::create_dir_all(from.join("groups"))?;
    fs::write(from.join("a.txt"), "x：1\n")?;
    // A dangling link cannot be copied, whatever the user's permissions.
    std::os::unix::fs::symlink(dir.path().join("nowhere"), from.join("broken.txt"))?;

    let to = dir.path().join("C2");
    assert!(fsio::copy_then_remove(&from, &to).is_err());

    assert!(!to.exists());
    assert_eq!(fs::read_to_string(from.join("a.txt"))?, "x：1\n");
    assert!(from.join("groups").is_dir());
    Ok(())
}

#[test]
fn copy_onto_existing_destination_leaves_both_alone() -> Result<()> {
    let dir = tempdir()?;
    let from = dir.path().join("C1");
    fs::create_dir(&from)?;
    fs::write(from.join("a.txt"), "x：1\n")?;
    let to = dir.path().join("C2");
    fs::create_dir(&to)?;
    fs::write(to.join("b.txt"), "y：2\n")?;

    assert!(fsio::copy_then_remove(&from, &to).is_err());
    assert!(from.join("a.txt").is_file());
    assert_eq!(fs::read_to_string(to.join("b.txt"))?, "y：2\n");
    Ok(())
}
