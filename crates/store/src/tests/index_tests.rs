use super::helpers::{seeded_store, temp_store};
use crate::*;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;

#[test]
fn missing_class_lists_empty() -> Result<()> {
    let (_dir, store) = temp_store();
    let idx = store.index();
    assert!(idx.list_groups("ghost")?.is_empty());
    assert!(idx.list_students("ghost")?.is_empty());
    assert!(idx.list_group_members("ghost", "G1")?.is_empty());
    assert!(idx.list_status_events("ghost")?.is_empty());
    assert_eq!(idx.student_count("ghost")?, 0);
    Ok(())
}

#[test]
fn unselected_or_unusable_names_list_empty() -> Result<()> {
    let (_dir, store) = seeded_store();
    let idx = store.index();
    assert!(idx.list_groups("")?.is_empty());
    assert!(idx.list_students("..")?.is_empty());
    assert!(idx.list_group_members("C1", "../G1")?.is_empty());
    Ok(())
}

#[test]
fn list_groups_reports_scores() -> Result<()> {
    let (_dir, store) = seeded_store();
    store.create_group("C1", "G2")?;
    store.update_group_score("C1", "G2", "88")?;

    let mut groups = store.index().list_groups("C1")?;
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(
        groups,
        vec![
            GroupSummary {
                name: "G1".into(),
                score: None
            },
            GroupSummary {
                name: "G2".into(),
                score: Some("88".into())
            },
        ]
    );
    Ok(())
}

#[test]
fn list_groups_tolerates_missing_record_file() -> Result<()> {
    let (_dir, store) = seeded_store();
    fs::create_dir(store.root().join("C1/groups/bare"))?;
    let groups = store.index().list_groups("C1")?;
    assert!(groups.iter().any(|g| g.name == "bare" && g.score.is_none()));
    Ok(())
}

#[test]
fn list_students_reads_every_record() -> Result<()> {
    let (_dir, store) = seeded_store();
    store.create_student("C1", "S1", "Alice", "G1")?;
    store.create_student("C1", "S2", "Bob", "G1")?;
    // Leftover temp files and foreign files are not students.
    fs::write(store.root().join("C1/students/S3.txt.tmp"), "学号：S3\n")?;
    fs::write(store.root().join("C1/students/readme.md"), "x")?;

    let mut students = store.index().list_students("C1")?;
    students.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(students.len(), 2);
    assert_eq!(students[0].name, "Alice");
    assert_eq!(students[1].group.as_deref(), Some("G1"));
    assert_eq!(store.index().student_count("C1")?, 2);
    Ok(())
}

#[test]
fn listings_always_reflect_disk() -> Result<()> {
    let (_dir, store) = seeded_store();
    let idx = store.index();
    assert_eq!(idx.list_groups("C1")?.len(), 1);

    fs::remove_dir_all(store.root().join("C1/groups/G1"))?;
    assert!(idx.list_groups("C1")?.is_empty());
    Ok(())
}

#[test]
fn members_come_from_roster_file_not_student_records() -> Result<()> {
    let (_dir, store) = seeded_store();
    fs::write(
        store.root().join("C1/groups/G1/students.txt"),
        "S1,Alice\nbad line\nS9,Ghost\n",
    )?;
    let members = store.index().list_group_members("C1", "G1")?;
    assert_eq!(
        members,
        vec![RosterEntry::new("S1", "Alice"), RosterEntry::new("S9", "Ghost")]
    );
    Ok(())
}

#[test]
fn photo_path_defaults_under_class_photos() -> Result<()> {
    let (_dir, store) = seeded_store();
    store.create_student("C1", "S1", "Alice", "G1")?;
    let expected: PathBuf = store.root().join("C1").join("photos").join("S1.jpg");
    assert_eq!(store.index().photo_path("C1", "S1")?, expected);

    store.set_student_photo("C1", "S1", "/pics/a.png")?;
    assert_eq!(store.index().photo_path("C1", "S1")?, PathBuf::from("/pics/a.png"));
    Ok(())
}

#[test]
fn status_events_are_listed_oldest_first() -> Result<()> {
    let (_dir, store) = seeded_store();
    store.append_status_event_at("C1", "Bob", Status::Leave, 2_000)?;
    store.append_status_event_at("C1", "Alice", Status::Absent, 1_000)?;
    fs::write(store.root().join("C1/status/notes.txt"), "学生：x\n状态：缺勤\n")?;
    fs::write(store.root().join("C1/status/3000.txt"), "学生：x\n状态：迟到\n")?;

    let events = store.index().list_status_events("C1")?;
    let got: Vec<_> = events
        .iter()
        .map(|e| (e.timestamp_ms, e.subject.as_str(), e.status))
        .collect();
    assert_eq!(
        got,
        vec![(1_000, "Alice", Status::Absent), (2_000, "Bob", Status::Leave)]
    );
    Ok(())
}
