use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskpad-{nanos}-{file_name}"))
}

fn run_interactive(store_path: &PathBuf, input: &str) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_taskpad");

    let mut child = Command::new(exe)
        .env("TASKPAD_STORE_PATH", store_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    child
        .wait_with_output()
        .expect("failed to read interactive output")
}

#[test]
fn interactive_help_shows_usage() {
    let store_path = temp_path("interactive-help.csv");
    let output = run_interactive(&store_path, "help\nexit\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_question_mark_shows_usage() {
    let store_path = temp_path("interactive-qmark.csv");
    let output = run_interactive(&store_path, "?\nexit\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_invalid_command_prints_error_and_continues() {
    let store_path = temp_path("interactive-invalid.csv");
    let output = run_interactive(&store_path, "nope\nadd \"demo task\"\nexit\n");
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task:"));
}

#[test]
fn interactive_session_persists_each_mutation() {
    let store_path = temp_path("interactive-session.csv");
    let script = "add \"Buy milk\" --category Shopping --due 2024-01-01 --priority High\n\
done task-1\n\
list\n\
exit\n";
    let output = run_interactive(&store_path, script);

    let content = std::fs::read_to_string(&store_path).expect("store file written");
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: Buy milk (task-1)"));
    assert!(stdout.contains("Marked task done: Buy milk"));
    assert!(stdout.contains("[x]"));
    assert!(content.contains("Buy milk,True,Shopping,2024-01-01,High"));
}

#[test]
fn interactive_blank_add_is_rejected_without_exiting() {
    let store_path = temp_path("interactive-blank.csv");
    let output = run_interactive(&store_path, "add \"   \"\nexit\n");

    assert!(output.status.success());
    assert!(!store_path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
