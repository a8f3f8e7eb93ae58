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

#[test]
fn list_is_empty_for_fresh_store() {
    let store_path = temp_path("cli-list-empty.json");
    let output = run(&store_path, &["list"]);

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks found."));
}

#[test]
fn list_shows_added_tasks_in_insertion_order() {
    let store_path = temp_path("cli-list-order.json");
    run(&store_path, &["add", "first"]);
    run(&store_path, &["add", "second"]);

    let output = run(&store_path, &["list", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let tasks: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let titles: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[test]
fn list_table_contains_task_title() {
    let store_path = temp_path("cli-list-table.json");
    run(&store_path, &["add", "visible task"]);

    let output = run(&store_path, &["list"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("visible task"));
    assert!(stdout.contains("medium"));
}

#[test]
fn list_pending_hides_completed_tasks() {
    let store_path = temp_path("cli-list-pending.json");
    run(&store_path, &["add", "keep"]);
    let added = run(&store_path, &["add", "finish", "--json"]);
    let task: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&added.stdout).trim()).unwrap();
    let id = task["id"].as_str().unwrap().to_string();
    run(&store_path, &["done", &id]);

    let output = run(&store_path, &["list", "--pending", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let tasks: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let titles: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["keep"]);
}
