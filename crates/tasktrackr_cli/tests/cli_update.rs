use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasktrackr-{nanos}-{file_name}"))
}

fn run(store_path: &PathBuf, args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_tasktrackr");
    Command::new(exe)
        .args(args)
        .env("TASKTRACKR_STORE_PATH", store_path)
        .env("TASKTRACKR_DISABLE_NOTIFICATIONS", "1")
        .output()
        .expect("failed to run tasktrackr")
}

fn add_task(store_path: &PathBuf, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    full.push("--json");
    let output = run(store_path, &full);
    assert!(output.status.success());
    let task: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    task["id"].as_str().unwrap().to_string()
}

#[test]
fn update_changes_title_and_priority() {
    let store_path = temp_path("cli-update.json");
    let id = add_task(&store_path, &["demo"]);

    let output = run(
        &store_path,
        &["update", &id, "--title", "renamed", "--priority", "low", "--json"],
    );
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let task: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(task["title"], "renamed");
    assert_eq!(task["priority"], "low");
}

#[test]
fn update_rejects_unknown_priority_and_keeps_stored_value() {
    let store_path = temp_path("cli-update-priority.json");
    let id = add_task(&store_path, &["demo", "--priority", "high"]);

    let rejected = run(&store_path, &["update", &id, "--priority", "urgent"]);
    let shown = run(&store_path, &["show", &id, "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!rejected.status.success());
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("ERROR: validation"));

    let task: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&shown.stdout).trim()).unwrap();
    assert_eq!(task["priority"], "high");
}

#[test]
fn update_rejects_missing_task() {
    let store_path = temp_path("cli-update-missing.json");
    let output = run(&store_path, &["update", "task-0", "--title", "ghost"]);

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: not_found"));
}

#[test]
fn show_displays_task_details() {
    let store_path = temp_path("cli-show.json");
    let id = add_task(
        &store_path,
        &["demo", "--description", "some detail", "--due", "2999-01-01"],
    );

    let output = run(&store_path, &["show", &id]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("demo"));
    assert!(stdout.contains("some detail"));
    assert!(stdout.contains("Priority: medium"));
}
