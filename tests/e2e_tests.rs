//! End-to-end integration tests
//!
//! These tests run the compiled binary against fixtures in tests/fixtures/.
//! Each fixture directory holds:
//! 1. seed.csv - opening balance of every account
//! 2. commands.txt - client input fed on stdin
//! 3. expected.txt - log lines with the TIME suffix stripped
//!
//! Fixtures run with a single worker so that completion order matches
//! submission order. Each fixture is run once per locking strategy.

use assert_cmd::Command;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Strip `TIME <start> <end>` from a log line, checking its shape on the way
fn outcome_of(line: &str) -> String {
    let (outcome, times) = line
        .split_once(" TIME ")
        .unwrap_or_else(|| panic!("log line without TIME: {:?}", line));
    let stamps: Vec<&str> = times.split(' ').collect();
    assert_eq!(stamps.len(), 2, "expected two timestamps in {:?}", line);
    for stamp in &stamps {
        let (secs, micros) = stamp.split_once('.').unwrap();
        assert!(secs.parse::<u64>().is_ok(), "bad seconds in {:?}", line);
        assert_eq!(micros.len(), 6, "micros not zero-padded in {:?}", line);
    }
    outcome.to_string()
}

fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(outcome_of)
        .collect()
}

/// Run a fixture through the binary and compare the log with expected.txt
fn run_test_fixture(fixture_name: &str, locking: &str) {
    let fixture_dir = format!("tests/fixtures/{}", fixture_name);
    let seed_path = format!("{}/seed.csv", fixture_dir);
    let commands = fs::read_to_string(format!("{}/commands.txt", fixture_dir)).unwrap();
    let expected: Vec<String> = fs::read_to_string(format!("{}/expected.txt", fixture_dir))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();

    // Every fixture seeds all of its accounts
    let accounts = fs::read_to_string(&seed_path).unwrap().lines().count() - 1;

    let dir = tempdir().unwrap();
    let log_path = dir.path().join("out.txt");

    Command::cargo_bin("ledger-server")
        .unwrap()
        .arg("1")
        .arg(accounts.to_string())
        .arg(&log_path)
        .args(["--balances", seed_path.as_str(), "--locking", locking, "--no-prompt"])
        .write_stdin(commands)
        .assert()
        .success();

    assert_eq!(
        read_log(&log_path),
        expected,
        "log mismatch for fixture '{}' with {} locking",
        fixture_name,
        locking
    );
}

#[rstest]
fn test_transfer_and_check(#[values("fine", "coarse")] locking: &str) {
    run_test_fixture("transfer_and_check", locking);
}

#[rstest]
fn test_insufficient_funds(#[values("fine", "coarse")] locking: &str) {
    run_test_fixture("insufficient_funds", locking);
}

#[rstest]
fn test_atomic_rollback(#[values("fine", "coarse")] locking: &str) {
    run_test_fixture("atomic_rollback", locking);
}

#[rstest]
fn test_duplicate_legs(#[values("fine", "coarse")] locking: &str) {
    run_test_fixture("duplicate_legs", locking);
}

#[rstest]
fn test_invalid_input(#[values("fine", "coarse")] locking: &str) {
    run_test_fixture("invalid_input", locking);
}

#[test]
fn test_acknowledgements_and_prompts() {
    let dir = tempdir().unwrap();

    Command::cargo_bin("ledger-server")
        .unwrap()
        .args(["2", "5"])
        .arg(dir.path().join("out.txt"))
        .write_stdin("CHECK 1\nTRANS 1 -1 2 1\nEND\n")
        .assert()
        .success()
        .stdout("> < ID 1\n> < ID 2\n> ");
}

#[test]
fn test_invalid_request_message() {
    let dir = tempdir().unwrap();

    Command::cargo_bin("ledger-server")
        .unwrap()
        .args(["1", "5"])
        .arg(dir.path().join("out.txt"))
        .arg("--no-prompt")
        .write_stdin("WITHDRAW 1 5\nCHECK 9\nCHECK 1\nEND\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "An invalid request was entered. The following are allowed: CHECK, TRANS, END.",
        ))
        .stdout(predicate::str::contains("Account 9 does not exist"))
        .stdout(predicate::str::contains("< ID 1\n"))
        .stdout(predicate::str::contains("< ID 2").not());
}

#[test]
fn test_end_of_input_drains_like_end() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("out.txt");

    Command::cargo_bin("ledger-server")
        .unwrap()
        .args(["3", "4"])
        .arg(&log_path)
        .args(["--initial-balance", "10", "--no-prompt"])
        .write_stdin("CHECK 1\nCHECK 2\nCHECK 3\n")
        .assert()
        .success();

    let mut outcomes = read_log(&log_path);
    outcomes.sort();
    assert_eq!(outcomes, vec!["1 BAL 10", "2 BAL 10", "3 BAL 10"]);
}

#[test]
fn test_dump_balances_after_shutdown() {
    let dir = tempdir().unwrap();
    let dump_path = dir.path().join("final.csv");

    Command::cargo_bin("ledger-server")
        .unwrap()
        .args(["4", "3"])
        .arg(dir.path().join("out.txt"))
        .args(["--initial-balance", "100", "--no-prompt", "--dump-balances"])
        .arg(&dump_path)
        .write_stdin("TRANS 1 -40 3 40\nTRANS 2 -100 1 100\nTRANS 3 -500\nEND\n")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dump_path).unwrap(),
        "account,balance\n1,160\n2,0\n3,140\n"
    );
}

#[rstest]
#[case::zero_workers(&["0", "10"], "worker count must be at least 1")]
#[case::negative_accounts(&["2", "-4"], "account count must be at least 1")]
#[case::negative_balance(&["2", "4", "--initial-balance", "-1"], "initial balance must not be negative")]
fn test_invalid_configuration_exits_non_zero(#[case] args: &[&str], #[case] message: &str) {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("out.txt");

    Command::cargo_bin("ledger-server")
        .unwrap()
        .args(&args[..2])
        .arg(&log_path)
        .args(&args[2..])
        .write_stdin("END\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains(message)));

    assert!(!log_path.exists());
}

#[test]
fn test_unwritable_log_exits_non_zero() {
    let dir = tempdir().unwrap();

    Command::cargo_bin("ledger-server")
        .unwrap()
        .args(["1", "1"])
        .arg(dir.path().join("missing").join("out.txt"))
        .write_stdin("END\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_missing_arguments_error() {
    Command::cargo_bin("ledger-server")
        .unwrap()
        .arg("4")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
