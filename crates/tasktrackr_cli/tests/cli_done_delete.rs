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

fn add_task(store_path: &PathBuf, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["add", title, "--json"];
    args.extend_from_slice(extra);
    let output = run(store_path, &args);
    assert!(output.status.success());
    let task: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    task["id"].as_str().unwrap().to_string()
}

#[test]
fn done_toggles_completion_both_ways() {
    let store_path = temp_path("cli-done-toggle.json");
    let id = add_task(&store_path, "demo", &[]);

    let completed = run(&store_path, &["done", &id]);
    let reopened = run(&store_path, &["done", &id]);
    std::fs::remove_file(&store_path).ok();

    assert!(completed.status.success());
    assert!(String::from_utf8_lossy(&completed.stdout).contains("Completed task:"));
    assert!(reopened.status.success());
    assert!(String::from_utf8_lossy(&reopened.stdout).contains("Reopened task:"));
}

#[test]
fn done_rejects_missing_task() {
    let store_path = temp_path("cli-done-missing.json");
    let output = run(&store_path, &["done", "task-0"]);

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found"));
}

#[test]
fn delete_removes_task_from_listing() {
    let store_path = temp_path("cli-delete.json");
    let id = add_task(&store_path, "short lived", &[]);

    let deleted = run(&store_path, &["delete", &id]);
    let listed = run(&store_path, &["list"]);
    std::fs::remove_file(&store_path).ok();

    assert!(deleted.status.success());
    assert!(String::from_utf8_lossy(&deleted.stdout).contains("Deleted task:"));
    assert!(String::from_utf8_lossy(&listed.stdout).contains("No tasks found."));
}

#[test]
fn delete_rejects_missing_task() {
    let store_path = temp_path("cli-delete-missing.json");
    let output = run(&store_path, &["delete", "task-0"]);

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found"));
}

// The §8-style end-to-end scenario: add, list, toggle, delete.
#[test]
fn pay_rent_scenario_round_trips() {
    let store_path = temp_path("cli-pay-rent.json");
    let id = add_task(
        &store_path,
        "Pay rent",
        &["--due", "2024-01-01 09:00", "--priority", "high"],
    );

    let listed = run(&store_path, &["list", "--json"]);
    let tasks: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&listed.stdout).trim()).unwrap();
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Pay rent");
    assert_eq!(tasks[0]["priority"], "high");
    assert_eq!(tasks[0]["completed"], false);

    let done = run(&store_path, &["done", &id, "--json"]);
    let task: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&done.stdout).trim()).unwrap();
    assert_eq!(task["completed"], true);

    run(&store_path, &["delete", &id]);
    let emptied = run(&store_path, &["list", "--json"]);
    std::fs::remove_file(&store_path).ok();

    let tasks: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&emptied.stdout).trim()).unwrap();
    assert!(tasks.as_array().unwrap().is_empty());
}
