/// CLI integration tests for vitalcoach.
///
/// Each test spawns the compiled binary via the `assert_cmd::cargo_bin_cmd!`
/// macro and sets `VITALCOACH_HOME` to a fresh `TempDir` so tests are fully
/// isolated from the developer's real `~/.vitalcoach` data.
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

// ── helpers ──────────────────────────────────────────────────────────────────

fn cmd_in(dir: &TempDir) -> assert_cmd::Command {
    let mut c = cargo_bin_cmd!("vitalcoach");
    c.env("VITALCOACH_HOME", dir.path());
    c.env_remove("OPENAI_API_KEY");
    c
}

fn init_dir(dir: &TempDir) {
    cmd_in(dir).args(["init", "--skip"]).assert().success();
}

fn add_user(dir: &TempDir) {
    cmd_in(dir)
        .args([
            "user",
            "add",
            "--email",
            "anna@example.de",
            "--name",
            "Anna",
            "--password",
            "geheim123",
            "--activity",
            "sedentary",
        ])
        .assert()
        .success();
}

fn parse_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stdout.clone();
    serde_json::from_slice(&bytes).expect("stdout is not valid JSON")
}

fn parse_stderr_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stderr.clone();
    serde_json::from_slice(&bytes).expect("stderr is not valid JSON")
}

// ── init / config ────────────────────────────────────────────────────────────

#[test]
fn test_init_creates_config_and_db() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    assert!(dir.path().join("config.toml").exists());
    assert!(dir.path().join("data.db").exists());
}

#[test]
fn test_config_set_and_show() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir)
        .args(["config", "set", "limits.ai_requests", "25"])
        .assert()
        .success();
    cmd_in(&dir)
        .args(["config", "set", "openai.api_key", "sk-test"])
        .assert()
        .success();

    let out = cmd_in(&dir).args(["config", "show"]).assert().success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["config"]["limits"]["ai_requests"], 25);
    assert_eq!(json["data"]["config"]["openai"]["api_key"], "***");

    let contents = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(contents.contains("ai_requests = 25"));
}

#[test]
fn test_config_rejects_unknown_key_and_plain_http() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let out = cmd_in(&dir)
        .args(["config", "set", "nope", "1"])
        .assert()
        .failure();
    assert_eq!(parse_stderr_json(&out)["status"], "error");

    cmd_in(&dir)
        .args(["config", "set", "openai.base_url", "http://example.com/v1"])
        .assert()
        .failure();
}

// ── user / log / show ────────────────────────────────────────────────────────

#[test]
fn test_user_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_user(&dir);

    let out = cmd_in(&dir).args(["user", "list"]).assert().success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["users"][0]["email"], "anna@example.de");
    assert_eq!(json["data"]["users"][0]["activity_level"], "sedentary");
    assert!(json["data"]["users"][0].get("password_hash").is_none());

    cmd_in(&dir)
        .args([
            "user", "add", "--email", "anna@example.de", "--name", "A", "--password", "geheim123",
        ])
        .assert()
        .failure();
}

#[test]
fn test_log_with_blood_pressure_and_show() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_user(&dir);

    let out = cmd_in(&dir)
        .args([
            "log",
            "--user",
            "anna@example.de",
            "--bp",
            "130/85",
            "--steps",
            "4200",
            "--date",
            "2026-03-02",
        ])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["record"]["bp_systolic"], 130.0);
    assert_eq!(json["data"]["record"]["bp_diastolic"], 85.0);

    let out = cmd_in(&dir)
        .args(["show", "--user", "anna@example.de", "--from", "2026-03-02", "--to", "2026-03-02"])
        .assert()
        .success();
    assert_eq!(parse_json(&out)["data"]["count"], 1);

    cmd_in(&dir)
        .args(["show", "--user", "anna@example.de", "--human"])
        .assert()
        .success()
        .stdout(predicate::str::contains("steps=4200"));
}

#[test]
fn test_log_json_input() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_user(&dir);
    let out = cmd_in(&dir)
        .args([
            "log",
            "--user",
            "anna@example.de",
            "--json",
            r#"{"weight": 72.5, "meal_type": "dinner"}"#,
        ])
        .assert()
        .success();
    assert_eq!(parse_json(&out)["data"]["record"]["meal_type"], "dinner");
}

#[test]
fn test_log_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_user(&dir);
    let out = cmd_in(&dir)
        .args(["log", "--user", "anna@example.de", "--heart-rate", "400"])
        .assert()
        .failure();
    let err = parse_stderr_json(&out);
    assert!(err["error"]["message"].as_str().unwrap().contains("heart_rate"));
}

#[test]
fn test_unknown_user_fails() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir)
        .args(["show", "--user", "niemand@example.de"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no user with email"));
}

// ── insights / alerts / cache ────────────────────────────────────────────────

#[test]
fn test_insights_need_history() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_user(&dir);
    let out = cmd_in(&dir)
        .args(["insights", "--user", "anna@example.de"])
        .assert()
        .success();
    assert!(parse_json(&out)["data"]["insights"].as_array().unwrap().is_empty());
}

#[test]
fn test_alerts_generate_and_history() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_user(&dir);
    cmd_in(&dir)
        .args(["log", "--user", "anna@example.de", "--steps", "1500"])
        .assert()
        .success();

    let out = cmd_in(&dir)
        .args(["alerts", "--user", "anna@example.de", "--generate"])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["thresholds"]["steps_min"], 3000.0);
    assert_eq!(json["data"]["alerts"][0]["alert_type"], "low_activity");

    let out = cmd_in(&dir)
        .args(["alerts", "--user", "anna@example.de"])
        .assert()
        .success();
    assert_eq!(parse_json(&out)["data"]["alerts"].as_array().unwrap().len(), 1);
}

#[test]
fn test_cache_purge() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let out = cmd_in(&dir).args(["cache", "purge"]).assert().success();
    assert_eq!(parse_json(&out)["data"]["cache_entries"], 0);
}
