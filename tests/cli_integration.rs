//! Integration tests for the `tick` CLI.
//!
//! Each test creates a temp directory, runs `tick` as a subprocess,
//! and verifies stdout, stderr and/or the files under `.tick/`.

use std::fs;
use std::path::Path;
use std::process::Command;

use pretty_assertions::assert_eq;

fn run_tick(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_tick"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run tick");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tick` expecting success, return stdout.
fn run_tick_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tick(dir, args);
    if !success {
        panic!(
            "tick {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `tick` expecting failure, return stderr.
fn run_tick_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tick(dir, args);
    if success {
        panic!("tick {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

fn init_workspace() -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tick_ok(tmp.path(), &["init"]);
    tmp
}

fn stored_json(root: &Path, key: &str) -> serde_json::Value {
    let raw = fs::read_to_string(root.join(".tick").join(format!("{}.json", key))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_data_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tick_ok(tmp.path(), &["init"]);
    assert!(out.starts_with("initialized"));
    assert!(tmp.path().join(".tick/config.toml").is_file());
    // Nothing is stored until the first change
    assert!(!tmp.path().join(".tick/todos.json").exists());
}

#[test]
fn test_init_twice_needs_force() {
    let tmp = init_workspace();
    let err = run_tick_err(tmp.path(), &["init"]);
    assert!(err.contains("already exists"));
    run_tick_ok(tmp.path(), &["init", "--force"]);
}

#[test]
fn test_commands_outside_workspace_fail() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_tick_err(tmp.path(), &["list"]);
    assert!(err.starts_with("error: no .tick/ directory found"));
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[test]
fn test_add_and_list() {
    let tmp = init_workspace();
    assert_eq!(run_tick_ok(tmp.path(), &["add", "Buy milk"]), "  1 [ ] Buy milk\n");
    run_tick_ok(tmp.path(), &["add", "Walk the dog"]);

    let out = run_tick_ok(tmp.path(), &["list"]);
    assert_eq!(out, "  1 [ ] Buy milk\n  2 [ ] Walk the dog\n");

    let stored = stored_json(tmp.path(), "todos");
    assert_eq!(stored[0]["text"], "Buy milk");
    assert_eq!(stored[0]["completed"], false);
    assert_eq!(stored[0]["dueDate"], serde_json::Value::Null);
    assert!(stored[0]["timestamp"].as_str().is_some_and(|s| !s.is_empty()));
}

#[test]
fn test_add_blank_is_rejected() {
    let tmp = init_workspace();
    let err = run_tick_err(tmp.path(), &["add", "   "]);
    assert!(err.contains("todo text is empty"));
    assert!(!tmp.path().join(".tick/todos.json").exists());
}

#[test]
fn test_scenario_add_toggle_filter_remove() {
    let tmp = init_workspace();
    run_tick_ok(tmp.path(), &["add", "Buy milk"]);

    assert_eq!(run_tick_ok(tmp.path(), &["toggle", "1"]), "  1 [x] Buy milk\n");

    let completed = run_tick_ok(tmp.path(), &["list", "--filter", "completed"]);
    assert_eq!(completed, "  1 [x] Buy milk\n");
    let open = run_tick_ok(tmp.path(), &["list", "--filter", "uncompleted"]);
    assert_eq!(open, "");

    assert_eq!(run_tick_ok(tmp.path(), &["rm", "1"]), "removed 1\n");
    assert_eq!(run_tick_ok(tmp.path(), &["list"]), "");
    assert_eq!(stored_json(tmp.path(), "todos"), serde_json::json!([]));
}

#[test]
fn test_toggle_twice_restores() {
    let tmp = init_workspace();
    run_tick_ok(tmp.path(), &["add", "Buy milk"]);
    run_tick_ok(tmp.path(), &["toggle", "1"]);
    assert_eq!(run_tick_ok(tmp.path(), &["toggle", "1"]), "  1 [ ] Buy milk\n");
}

#[test]
fn test_edit_replaces_text_and_keeps_timestamp() {
    let tmp = init_workspace();
    run_tick_ok(tmp.path(), &["add", "Buy milk"]);
    let before = stored_json(tmp.path(), "todos")[0]["timestamp"].clone();

    assert_eq!(
        run_tick_ok(tmp.path(), &["edit", "1", "Buy oat milk"]),
        "  1 [ ] Buy oat milk\n"
    );
    let after = stored_json(tmp.path(), "todos");
    assert_eq!(after[0]["text"], "Buy oat milk");
    assert_eq!(after[0]["timestamp"], before);
}

#[test]
fn test_unknown_id_fails() {
    let tmp = init_workspace();
    run_tick_ok(tmp.path(), &["add", "Buy milk"]);
    for args in [&["toggle", "9"][..], &["rm", "9"][..], &["edit", "9", "x"][..]] {
        let err = run_tick_err(tmp.path(), args);
        assert!(err.contains("no todo with id 9"), "{:?}: {}", args, err);
    }
}

#[test]
fn test_ids_survive_removal() {
    let tmp = init_workspace();
    run_tick_ok(tmp.path(), &["add", "one"]);
    run_tick_ok(tmp.path(), &["add", "two"]);
    run_tick_ok(tmp.path(), &["add", "three"]);
    run_tick_ok(tmp.path(), &["rm", "2"]);

    // Item 3 keeps its id after the one before it is gone
    assert_eq!(run_tick_ok(tmp.path(), &["toggle", "3"]), "  3 [x] three\n");
    assert_eq!(run_tick_ok(tmp.path(), &["add", "four"]), "  4 [ ] four\n");
}

// ---------------------------------------------------------------------------
// Output and discovery
// ---------------------------------------------------------------------------

#[test]
fn test_list_json() {
    let tmp = init_workspace();
    run_tick_ok(tmp.path(), &["add", "Buy milk"]);
    run_tick_ok(tmp.path(), &["add", "Walk the dog"]);
    run_tick_ok(tmp.path(), &["toggle", "2"]);

    let out = run_tick_ok(tmp.path(), &["list", "--json", "--filter", "completed"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["filter"], "completed");
    assert_eq!(value["done"], 1);
    assert_eq!(value["total"], 2);
    assert_eq!(value["todos"].as_array().unwrap().len(), 1);
    assert_eq!(value["todos"][0]["id"], 2);
    assert_eq!(value["todos"][0]["overdue"], false);
}

#[test]
fn test_discovery_walks_up_and_dir_flag() {
    let tmp = init_workspace();
    let nested = tmp.path().join("src/deep");
    fs::create_dir_all(&nested).unwrap();
    run_tick_ok(&nested, &["add", "from below"]);

    let elsewhere = tempfile::TempDir::new().unwrap();
    let root = tmp.path().to_str().unwrap();
    let out = run_tick_ok(elsewhere.path(), &["-C", root, "list"]);
    assert_eq!(out, "  1 [ ] from below\n");
}

#[test]
fn test_configured_storage_key() {
    let tmp = init_workspace();
    fs::write(tmp.path().join(".tick/config.toml"), "[storage]\nkey = \"work\"\n").unwrap();
    run_tick_ok(tmp.path(), &["add", "Ship it"]);
    assert!(tmp.path().join(".tick/work.json").is_file());
    assert!(!tmp.path().join(".tick/todos.json").exists());
}

#[test]
fn test_edit_to_blank_respects_policy() {
    let tmp = init_workspace();
    run_tick_ok(tmp.path(), &["add", "Buy milk"]);
    // Default policy accepts a blank edit
    run_tick_ok(tmp.path(), &["edit", "1", ""]);
    assert_eq!(stored_json(tmp.path(), "todos")[0]["text"], "");

    fs::write(tmp.path().join(".tick/config.toml"), "[edit]\nallow_empty = false\n").unwrap();
    run_tick_ok(tmp.path(), &["edit", "1", "Buy milk"]);
    let err = run_tick_err(tmp.path(), &["edit", "1", "  "]);
    assert!(err.contains("todo text is empty"));
    assert_eq!(stored_json(tmp.path(), "todos")[0]["text"], "Buy milk");
}

#[test]
fn test_malformed_config_is_an_error() {
    let tmp = init_workspace();
    fs::write(tmp.path().join(".tick/config.toml"), "[storage\n").unwrap();
    let err = run_tick_err(tmp.path(), &["list"]);
    assert!(err.contains("could not parse"));
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_store_is_preserved_and_reset() {
    let tmp = init_workspace();
    fs::write(tmp.path().join(".tick/todos.json"), "{not json").unwrap();

    for _ in 0..2 {
        let (stdout, stderr, success) = run_tick(tmp.path(), &["list"]);
        assert!(success);
        assert_eq!(stdout, "");
        assert!(stderr.contains("warning: stored list was unreadable"));
    }

    let log = run_tick_ok(tmp.path(), &["recovery"]);
    assert!(log.contains("[storage] unreadable todo list replaced"));
    assert!(log.contains("| {not json"));

    // The next change overwrites the broken value with a valid list
    run_tick_ok(tmp.path(), &["add", "fresh start"]);
    assert_eq!(stored_json(tmp.path(), "todos")[0]["text"], "fresh start");

    // Every open saw the same broken value; it was preserved once
    let out = run_tick_ok(tmp.path(), &["recovery", "--json"]);
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[test]
fn test_removed_todo_is_logged() {
    let tmp = init_workspace();
    run_tick_ok(tmp.path(), &["add", "Buy milk"]);
    run_tick_ok(tmp.path(), &["rm", "1"]);

    let out = run_tick_ok(tmp.path(), &["recovery", "--json"]);
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(entries[0]["category"], "delete");
    assert!(entries[0]["body"].as_str().unwrap().contains("\"Buy milk\""));
}

#[test]
fn test_recovery_clear() {
    let tmp = init_workspace();
    run_tick_ok(tmp.path(), &["add", "a"]);
    run_tick_ok(tmp.path(), &["rm", "1"]);
    assert_eq!(
        run_tick_ok(tmp.path(), &["recovery", "--clear"]),
        "removed 1 recovery entries\n"
    );
    assert_eq!(run_tick_ok(tmp.path(), &["recovery"]), "recovery log is empty\n");
}

#[test]
fn test_recovery_empty() {
    let tmp = init_workspace();
    assert_eq!(run_tick_ok(tmp.path(), &["recovery"]), "recovery log is empty\n");
}
