use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("todolist-{nanos}-{file_name}"))
}

fn run_interactive_with_config(config_path: &Path, args: &[&str], input: &str) -> Output {
    let exe = env!("CARGO_BIN_EXE_todolist");

    let mut child = Command::new(exe)
        .args(args)
        .env("TODOLIST_CONFIG_PATH", config_path)
        .env_remove("TODOLIST_LOG")
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

fn run_interactive(input: &str) -> Output {
    run_interactive_with_config(&temp_path("missing-config.json"), &[], input)
}

#[test]
fn interactive_help_shows_usage() {
    let output = run_interactive("help\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_question_mark_shows_usage() {
    let output = run_interactive("?\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_invalid_command_prints_error() {
    let output = run_interactive("nope\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn interactive_session_keeps_tasks_between_commands() {
    let output = run_interactive(
        "add \"Buy milk\"\ndone 1\nadd \"Call bank\"\ndelete 1\nlist --json\nexit\n",
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: Buy milk (1)"));
    assert!(stdout.contains("Completed task: Buy milk (1)"));
    assert!(stdout.contains("Deleted task: Buy milk (1)"));

    let listing = stdout.lines().last().unwrap();
    let value: serde_json::Value = serde_json::from_str(listing).unwrap();
    let tasks = value.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["text"], "Call bank");
    assert_eq!(tasks[0]["id"], 2);
    assert_eq!(tasks[0]["completed"], false);
}

#[test]
fn interactive_edit_form_round_trip() {
    let output = run_interactive(
        "add milk --title Groceries\nedit 1\nset text oat milk\nsave\nshow 1 --json\n",
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Editing task 1"));
    assert!(stdout.contains("Updated task: oat milk (1)"));

    let shown: serde_json::Value =
        serde_json::from_str(stdout.lines().last().unwrap()).unwrap();
    assert_eq!(shown["text"], "oat milk");
    assert_eq!(shown["title"], "Groceries");
}

#[test]
fn interactive_errors_do_not_end_session() {
    let output = run_interactive("delete 4\nadd after\nexit\n");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stderr.contains("ERROR: not_found"));
    assert!(stdout.contains("Added task: after (1)"));
}

#[test]
fn interactive_uses_config_aliases() {
    let config_path = temp_path("alias-config.json");
    std::fs::write(&config_path, r#"{ "aliases": { "a": "add", "ls": "list --json" } }"#)
        .unwrap();

    let output = run_interactive_with_config(&config_path, &[], "a milk\nls\nexit\n");
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(stdout.lines().last().unwrap()).unwrap();
    assert_eq!(value[0]["text"], "milk");
}

#[test]
fn interactive_warns_about_invalid_config() {
    let config_path = temp_path("broken-config.json");
    std::fs::write(&config_path, "{ not json").unwrap();

    let output = run_interactive_with_config(&config_path, &[], "exit\n");
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARNING: using default configuration"));
}

#[test]
fn interactive_json_flag_applies_to_every_command() {
    let output = run_interactive_with_config(
        &temp_path("missing-config.json"),
        &["--json"],
        "add milk\nexit\n",
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["text"], "milk");
}

#[test]
fn interactive_theme_mutes_completed_rows_in_list() {
    let output = run_interactive_with_config(
        &temp_path("missing-config.json"),
        &["--config-override", "theme=noir"],
        "add milk\nadd bread\ndone 1\nlist\nexit\n",
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let milk = stdout
        .lines()
        .find(|line| line.contains("milk") && line.contains("completed"))
        .unwrap();
    let bread = stdout
        .lines()
        .find(|line| line.contains("bread") && line.contains("pending"))
        .unwrap();
    assert!(milk.contains("\x1b[38;5;244m"));
    assert!(!bread.contains("\x1b[38;5;244m"));
}

#[test]
fn interactive_rejects_log_level_override_per_line() {
    let output = run_interactive("list --config-override log_level=debug\nexit\n");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - log_level can only be overridden at startup"));
}
