use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_haraction_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("haraction")
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_help_lists_options() {
    let mut cmd = Command::new(get_haraction_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--har-dir"))
        .stdout(predicate::str::contains("--rules"))
        .stdout(predicate::str::contains("--results"))
        .stdout(predicate::str::contains("--actions"))
        .stdout(predicate::str::contains("--sorted"));
}

#[test]
fn test_run_prints_summary() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::new(get_haraction_bin());
    cmd.arg("--har-dir")
        .arg(fixture_path("har"))
        .arg("--rules")
        .arg(fixture_path("rules.json"))
        .arg("--results")
        .arg(temp_dir.path().join("results.csv"))
        .arg("--actions")
        .arg(temp_dir.path().join("actions.csv"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Files Processed:  2"))
        .stdout(predicate::str::contains("Actions:          2"));

    assert!(temp_dir.path().join("results.csv").exists());
    assert!(temp_dir.path().join("actions.csv").exists());
}

#[test]
fn test_defaults_resolve_against_working_directory() {
    let temp_dir = TempDir::new().unwrap();
    let har_dir = temp_dir.path().join("har");
    std::fs::create_dir(&har_dir).unwrap();
    std::fs::copy(fixture_path("har/login.har"), har_dir.join("login.har")).unwrap();
    std::fs::copy(fixture_path("rules.json"), temp_dir.path().join("config.json")).unwrap();

    let mut cmd = Command::new(get_haraction_bin());
    cmd.current_dir(temp_dir.path());

    cmd.assert().success();

    let actions = std::fs::read_to_string(temp_dir.path().join("actions.csv")).unwrap();
    assert!(actions.starts_with("name\tduration\tpageref\tstartedDateTime\tcalls\n"));
    assert!(actions.contains("Login\t1250\tpage_1"));
}

#[test]
fn test_missing_har_dir_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::new(get_haraction_bin());
    cmd.current_dir(temp_dir.path())
        .arg("--rules")
        .arg(fixture_path("rules.json"))
        .arg("--har-dir")
        .arg(temp_dir.path().join("nowhere"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to list"));
}
