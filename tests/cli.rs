//! End-to-end tests for the `tally` binary.
//!
//! Every test runs against its own data directory via `TALLY_DATA_DIR`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tally(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("TALLY_DATA_DIR", dir.path()).env_remove("TALLY_LOG");
    cmd
}

/// Initialized data directory with group "Trip" and members Alice, Bob, Carol
fn trip() -> TempDir {
    let dir = TempDir::new().unwrap();
    tally(&dir).arg("init").assert().success();
    tally(&dir)
        .args(["group", "create", "Trip"])
        .assert()
        .success();
    tally(&dir)
        .args(["member", "add", "Trip", "Alice", "Bob", "Carol"])
        .assert()
        .success();
    dir
}

#[test]
fn test_init_creates_files() {
    let dir = TempDir::new().unwrap();
    tally(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("groups.json").exists());
}

#[test]
fn test_equal_expense_balances() {
    let dir = trip();

    tally(&dir)
        .args(["entry", "add", "Trip", "100", "--paid-by", "Alice", "-d", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$33.34"));

    tally(&dir)
        .args(["balance", "Trip", "--as", "Bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$66.67"))
        .stdout(predicate::str::contains("-$33.34"))
        .stdout(predicate::str::contains("-$33.33"))
        .stdout(predicate::str::contains("Bob owes $33.33 in total."));
}

#[test]
fn test_exact_split_mismatch_is_rejected() {
    let dir = trip();

    tally(&dir)
        .args([
            "entry", "add", "Trip", "50", "-p", "Alice", "--policy", "exact", "-s", "Bob=20",
            "-s", "Carol=35",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("do not match entry amount"));

    tally(&dir)
        .args(["entry", "list", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries found"));
}

#[test]
fn test_unknown_participant_is_rejected() {
    let dir = trip();

    tally(&dir)
        .args(["entry", "add", "Trip", "10", "-p", "Mallory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mallory"));
}

#[test]
fn test_suggest_and_apply_settlements() {
    let dir = trip();
    tally(&dir)
        .args(["entry", "add", "Trip", "100", "-p", "Alice"])
        .assert()
        .success();

    tally(&dir)
        .args(["settle", "suggest", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob pays Alice $33.33"))
        .stdout(predicate::str::contains("Carol pays Alice $33.34"));

    // Without --yes nothing is recorded
    tally(&dir)
        .args(["settle", "apply", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Re-run with --yes"));
    tally(&dir)
        .args(["settle", "list", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No settlements recorded"));

    tally(&dir)
        .args(["settle", "apply", "Trip", "--yes", "--date", "2025-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded 2 settlement(s)"));

    tally(&dir)
        .args(["settle", "suggest", "Trip", "--strategy", "exact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Everyone is settled up"));
}

#[test]
fn test_record_settlement_and_transfer() {
    let dir = trip();
    tally(&dir)
        .args(["entry", "add", "Trip", "90", "-p", "Alice"])
        .assert()
        .success();

    tally(&dir)
        .args(["settle", "record", "Trip", "30", "--from", "Bob", "--to", "Alice", "-n", "cash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob paid Alice $30.00"));

    tally(&dir)
        .args(["entry", "add", "Trip", "30", "-p", "Carol", "-k", "transfer", "--to", "Alice"])
        .assert()
        .success();

    tally(&dir)
        .args(["settle", "suggest", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Everyone is settled up"));
}

#[test]
fn test_edit_and_delete_entry() {
    let dir = trip();
    let output = tally(&dir)
        .args(["entry", "add", "Trip", "90", "-p", "Alice"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .split_whitespace()
        .map(|w| w.trim_matches(|c| c == '(' || c == ')'))
        .find(|w| w.starts_with("ent-"))
        .unwrap()
        .to_string();

    tally(&dir)
        .args(["entry", "edit", "Trip", &id, "--amount", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$10.00"));

    tally(&dir)
        .args(["audit", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("amount: $90.00 -> $30.00"));

    tally(&dir)
        .args(["entry", "delete", "Trip", &id])
        .assert()
        .success();
    tally(&dir)
        .args(["balance", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settled"));
}

#[test]
fn test_export_json_and_csv() {
    let dir = trip();
    tally(&dir)
        .args(["entry", "add", "Trip", "100", "-p", "Alice"])
        .assert()
        .success();

    let json_path = dir.path().join("trip.json");
    tally(&dir)
        .args(["export", "Trip", "--format", "json", "--output"])
        .arg(&json_path)
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["entries"].as_array().unwrap().len(), 1);
    assert_eq!(value["suggestions"].as_array().unwrap().len(), 2);

    let csv_path = dir.path().join("balances.csv");
    tally(&dir)
        .args(["export", "Trip", "--format", "csv", "--balances", "--output"])
        .arg(&csv_path)
        .assert()
        .success();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.contains("Alice,100.00,0.00,33.33,0.00,0.00,66.67"));
}

#[test]
fn test_config_set_strategy() {
    let dir = trip();
    tally(&dir)
        .args(["config", "set", "strategy", "exact"])
        .assert()
        .success();

    tally(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Settlement strategy: exact"));
}

#[test]
fn test_settle_suggest_states_tolerance() {
    let dir = trip();
    tally(&dir)
        .args(["entry", "add", "Trip", "100", "-p", "Alice"])
        .assert()
        .success();
    tally(&dir)
        .args(["config", "set", "tolerance", "1"])
        .assert()
        .success();

    tally(&dir)
        .args(["settle", "suggest", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Carol pays Alice $33.34"))
        .stdout(predicate::str::contains(
            "Balances within $0.01 of zero are treated as settled and may remain.",
        ));

    tally(&dir)
        .args(["settle", "suggest", "Trip", "--strategy", "exact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("treated as settled").not());
}
