/// End-to-end tests for the roll-call CLI.
/// Each test drives the real binary over stdin against a temporary class root.
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Helper to run CLI commands and capture stdout
fn run_cli_command(root: &Path, command: &str) -> String {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new(env!("CARGO_BIN_EXE_cli"))
        .env("ROLLCALL_ROOT", root.to_str().unwrap())
        .env("ROLLCALL_TICK_MS", "5")
        .env("ROLLCALL_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        stdin
            .write_all(command.as_bytes())
            .expect("Failed to write to stdin");
        stdin.write_all(b"EXIT\n").expect("Failed to write EXIT");
    }

    let output = child.wait_with_output().expect("Failed to read output");
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn count_status_files(root: &Path, class: &str) -> usize {
    fs::read_dir(root.join(class).join("status"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("txt"))
        .count()
}

const SEED: &str = "CLASS ADD C1\nUSE C1\nGROUP ADD G1\nSTUDENT ADD S1 Alice G1\n";

#[test]
fn test_full_roll_call_flow() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    let commands = format!(
        "{SEED}SPIN GROUPS\nSTOP\nSPIN MEMBERS\nSTOP\nSCORE 88\nRECORD absent\n"
    );
    let output = run_cli_command(&root, &commands);

    assert!(!output.contains("ERR"), "unexpected error:\n{output}");
    assert!(output.contains("SELECTED group G1"));
    assert!(output.contains("SELECTED student Alice (S1)"));
    assert!(output.contains("~ G1"));
    assert!(output.contains("OK (Alice absent)"));

    assert_eq!(count_status_files(&root, "C1"), 1);
    let record = fs::read_to_string(root.join("C1/groups/G1/G1.txt")).unwrap();
    assert!(record.contains("分数：88"));
}

#[test]
fn test_data_survives_restart() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    run_cli_command(&root, SEED);
    let output = run_cli_command(&root, "CLASS LIST\nUSE C1\nSTUDENT LIST\nGROUP LIST\n");

    assert!(output.contains("C1 (1 students)"));
    assert!(output.contains("S1 Alice G1"));
    // Never scored groups show 0.
    assert!(output.contains("G1 score=0"));
}

#[test]
fn test_duplicate_names_rejected() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    let output = run_cli_command(
        &root,
        &format!("{SEED}CLASS ADD C1\nGROUP ADD G1\nSTUDENT ADD S1 Bob G1\n"),
    );
    assert!(output.contains("ERR class already exists: C1"));
    assert!(output.contains("ERR group already exists: G1"));
    assert!(output.contains("ERR student already exists: S1"));
}

#[test]
fn test_commands_require_class() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    let output = run_cli_command(&root, "GROUP LIST\nSPIN GROUPS\nUSE ghost\n");
    assert!(output.contains("ERR no class selected"));
    assert!(output.contains("ERR class not found: ghost"));
}

#[test]
fn test_record_requires_settled_student() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    let output = run_cli_command(&root, &format!("{SEED}RECORD absent\nSCORE 5\n"));
    assert!(output.contains("ERR no student selected"));
    assert!(output.contains("ERR no group selected"));
    assert_eq!(count_status_files(&root, "C1"), 0);
}

#[test]
fn test_spin_on_empty_class() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    let output = run_cli_command(&root, "CLASS ADD C2\nUSE C2\nSPIN GROUPS\nSTOP\n");
    assert!(output.contains("ERR no groups in class C2"));
    assert!(output.contains("ERR no spin in progress"));
}

#[test]
fn test_rename_and_delete() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    let output = run_cli_command(
        &root,
        &format!("{SEED}GROUP RENAME G1 G9\nGROUP LIST\nCLASS RENAME C1 C2\nGROUP LIST\nCLASS DEL C2\nCLASS LIST\n"),
    );
    assert!(output.contains("G9 score=0"));
    // Renaming the current class drops it from the session.
    assert!(output.contains("ERR no class selected"));
    assert!(output.contains("(0 classes)"));
    assert!(!root.join("C2").exists());
}

#[test]
fn test_status_list_and_photo() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    let output = run_cli_command(
        &root,
        &format!("{SEED}SPIN STUDENTS\nSTOP\nRECORD leave\nSTATUS LIST\nPHOTO S1\n"),
    );
    assert!(output.contains("Alice leave"));
    assert!(output.contains(&format!("photos{}S1.jpg", std::path::MAIN_SEPARATOR)));
}

#[test]
fn test_invalid_names_rejected() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    let output = run_cli_command(&root, "CLASS ADD ..\nCLASS ADD a,b\n");
    assert_eq!(output.matches("ERR invalid input").count(), 2);
}

#[test]
fn test_unknown_command() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("classes");

    let output = run_cli_command(&root, "FROB\n");
    assert!(output.contains("ERR unknown command: FROB"));
    assert!(output.contains("bye"));
}
