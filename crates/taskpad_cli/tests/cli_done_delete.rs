use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskpad-{nanos}-{file_name}"))
}

const SEED: &str = "Task,Done,Category,Due Date,Priority\n\
Prepare slides,False,Work,2024-05-01,High\n\
Buy milk,False,Shopping,2024-05-02,Low\n";

fn run(exe: &str, store_path: &PathBuf, args: &[&str]) -> std::process::Output {
    Command::new(exe)
        .args(args)
        .env("TASKPAD_STORE_PATH", store_path)
        .output()
        .expect("failed to run taskpad")
}

#[test]
fn done_command_toggles_and_persists() {
    let exe = env!("CARGO_BIN_EXE_taskpad");
    let store_path = temp_path("cli-done.csv");
    std::fs::write(&store_path, SEED).unwrap();

    let output = run(exe, &store_path, &["done", "task-2"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Marked task done: Buy milk"));

    let content = std::fs::read_to_string(&store_path).unwrap();
    assert!(content.contains("Buy milk,True,Shopping,2024-05-02,Low"));
    assert!(content.contains("Prepare slides,False,Work,2024-05-01,High"));

    // A second toggle restores the original value.
    let output = run(exe, &store_path, &["done", "task-2"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Marked task not done: Buy milk"));

    let content = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();
    assert!(content.contains("Buy milk,False,Shopping,2024-05-02,Low"));
}

#[test]
fn done_command_rejects_unknown_id() {
    let exe = env!("CARGO_BIN_EXE_taskpad");
    let store_path = temp_path("cli-done-missing.csv");
    std::fs::write(&store_path, SEED).unwrap();

    let output = run(exe, &store_path, &["done", "task-9"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(stderr.contains("task not found"));
}

#[test]
fn delete_command_removes_only_the_addressed_row() {
    let exe = env!("CARGO_BIN_EXE_taskpad");
    let store_path = temp_path("cli-delete.csv");
    std::fs::write(&store_path, SEED).unwrap();

    let output = run(exe, &store_path, &["delete", "task-1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Deleted task: Prepare slides"));

    let content = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();
    assert!(!content.contains("Prepare slides"));
    assert!(content.contains("Buy milk,False,Shopping,2024-05-02,Low"));
}

#[test]
fn delete_command_json_output_reports_removed_task() {
    let exe = env!("CARGO_BIN_EXE_taskpad");
    let store_path = temp_path("cli-delete-json.csv");
    std::fs::write(&store_path, SEED).unwrap();

    let output = run(exe, &store_path, &["--json", "delete", "task-2"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let task: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json output");
    assert_eq!(task["id"], "task-2");
    assert_eq!(task["text"], "Buy milk");
}

#[test]
fn show_command_prints_task_detail() {
    let exe = env!("CARGO_BIN_EXE_taskpad");
    let store_path = temp_path("cli-show.csv");
    std::fs::write(&store_path, SEED).unwrap();

    let output = run(exe, &store_path, &["show", "task-1"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("task-1"));
    assert!(stdout.contains("Prepare slides"));
    assert!(stdout.contains("Category: Work"));
    assert!(stdout.contains("Due Date: 2024-05-01"));
    assert!(stdout.contains("Priority: High"));
}
