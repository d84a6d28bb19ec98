#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn listsqre_cmd(data: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("listsqre"));
    cmd.env("LISTSQRE_DATA_DIR", data.path().as_os_str())
        .env_remove("LISTSQRE_DB_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_card_and_field_workflow() {
    let data = TempDir::new().unwrap();

    // 1. Create a card
    listsqre_cmd(&data)
        .args(["card", "add", "Groceries", "weekly shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created card 1: Groceries"));

    // 2. Add fields to its table
    for title in ["Milk", "Eggs", "Bread"] {
        listsqre_cmd(&data)
            .args(["field", "add", "1", title])
            .assert()
            .success();
    }

    // 3. Select two and purge them
    listsqre_cmd(&data)
        .args(["field", "select", "1", "1"])
        .assert()
        .success();
    listsqre_cmd(&data)
        .args(["field", "select", "1", "2"])
        .assert()
        .success();
    listsqre_cmd(&data)
        .args(["field", "purge-selected", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 field(s)"));

    // 4. Only Bread is left, and it kept its id
    listsqre_cmd(&data)
        .args(["--json", "field", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Bread\""))
        .stdout(predicate::str::contains("\"id\": 3"))
        .stdout(predicate::str::contains("Milk").not());

    assert!(data.path().join("listsqre.db").exists());
}

#[test]
fn test_flat_file_workflow() {
    let data = TempDir::new().unwrap();
    listsqre_cmd(&data)
        .args(["card", "add", "Reading List"])
        .assert()
        .success();

    listsqre_cmd(&data)
        .args(["file", "add", "1", "Dune", "Herbert", "--pin"])
        .assert()
        .success();
    listsqre_cmd(&data)
        .args(["file", "add", "1", "Emma", "Austen"])
        .assert()
        .success();

    let file = data.path().join("cards").join("reading-list-1.txt");
    let text = fs::read_to_string(&file).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("Dune"));

    listsqre_cmd(&data)
        .args(["file", "open", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reading-list-1.txt"));

    listsqre_cmd(&data)
        .args(["file", "rm", "1", "0"])
        .assert()
        .success();
    listsqre_cmd(&data)
        .args(["file", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0. Emma"))
        .stdout(predicate::str::contains("Dune").not());
}

#[test]
fn test_deleting_card_removes_its_file() {
    let data = TempDir::new().unwrap();
    listsqre_cmd(&data)
        .args(["card", "add", "Chores"])
        .assert()
        .success();
    listsqre_cmd(&data)
        .args(["file", "add", "1", "Dishes"])
        .assert()
        .success();

    let file = data.path().join("cards").join("chores-1.txt");
    assert!(file.exists());

    listsqre_cmd(&data)
        .args(["card", "rm", "1"])
        .assert()
        .success();
    assert!(!file.exists());

    listsqre_cmd(&data)
        .args(["field", "list", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Card not found: 1"));
}

#[test]
fn test_invalid_card_id_fails() {
    let data = TempDir::new().unwrap();
    listsqre_cmd(&data)
        .args(["card", "rm", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid card id"));
}

#[test]
fn test_reminders() {
    let data = TempDir::new().unwrap();
    listsqre_cmd(&data)
        .args(["reminder", "add", "42", "call mum", "--at", "2030-01-01T09:00:00Z"])
        .assert()
        .success();
    listsqre_cmd(&data)
        .args(["reminder", "add", "42", "call mum again", "--at", "2030-01-02T09:00:00Z"])
        .assert()
        .success();

    listsqre_cmd(&data)
        .args(["reminder", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("call mum again"))
        .stdout(predicate::str::contains("2030-01-02 09:00 UTC"))
        .stdout(predicate::str::contains("2030-01-01").not());

    listsqre_cmd(&data)
        .args(["reminder", "rm", "--unique", "42"])
        .assert()
        .success();
    listsqre_cmd(&data)
        .args(["reminder", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No reminders."));
}

#[test]
fn test_config_file_changes_delimiters() {
    let data = TempDir::new().unwrap();
    fs::write(
        data.path().join("listsqre.toml"),
        "field_delimiter = \"|\"\nrecord_delimiter = \"#\\n\"\n",
    )
    .unwrap();

    listsqre_cmd(&data)
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("field_delimiter  = \"|\""));

    listsqre_cmd(&data)
        .args(["card", "add", "Todo"])
        .assert()
        .success();
    listsqre_cmd(&data)
        .args(["file", "add", "1", "ship", "--pin"])
        .assert()
        .success();

    let text = fs::read_to_string(data.path().join("cards").join("todo-1.txt")).unwrap();
    assert_eq!(text, "0|ship|||1|#\n");
}

#[test]
fn test_data_flag_overrides_env() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();
    listsqre_cmd(&env_dir)
        .args(["--data", flag_dir.path().to_str().unwrap(), "card", "add", "x"])
        .assert()
        .success();
    assert!(flag_dir.path().join("listsqre.db").exists());
    assert!(!env_dir.path().join("listsqre.db").exists());
}

#[test]
fn test_verbose_logs_to_stderr() {
    let data = TempDir::new().unwrap();
    listsqre_cmd(&data)
        .args(["-v", "card", "add", "Logged"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created card"))
        .stderr(predicate::str::contains("created card"));
}
