//! Integration tests for the `armscale` CLI binary.
//!
//! Nothing here talks to Azure: `policy` and `config` are offline, and `run`
//! is only exercised without credentials.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `armscale` binary with env isolation.
///
/// Clears the credential variables and points config directories at a
/// nonexistent path so tests never touch a real service principal.
fn armscale_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("armscale");
    cmd.env("HOME", "/tmp/armscale-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/armscale-cli-test-nonexistent")
        .env_remove("CLIENT_ID")
        .env_remove("CLIENT_SECRET")
        .env_remove("TENANT_ID")
        .env_remove("SUBSCRIPTION_ID")
        .env_remove("ARMSCALE_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn policy_cmd(format: &str) -> assert_cmd::Command {
    let mut cmd = armscale_cmd();
    cmd.args([
        "policy",
        "--target",
        "plan-A",
        "--metric-source",
        "site-B",
        "-o",
        format,
    ]);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    armscale_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("autoscale")
            .and(predicate::str::contains("run"))
            .and(predicate::str::contains("policy"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    armscale_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("armscale"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    armscale_cmd().arg("frobnicate").assert().code(2);
}

#[test]
fn test_completions_bash() {
    armscale_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("armscale"));
}

// ── policy ──────────────────────────────────────────────────────────

#[test]
fn test_policy_json_document() {
    let output = policy_cmd("json").output().unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["targetResourceUri"], "plan-A");
    assert_eq!(doc["enabled"], true);

    let profiles = doc["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 3);
    assert_eq!(profiles[0]["name"], "Default profile");
    assert!(profiles[0].get("recurrence").is_none());

    let rule = &profiles[1]["rules"][0];
    assert_eq!(rule["metricTrigger"]["metricResourceUri"], "site-B");
    assert_eq!(rule["metricTrigger"]["timeWindow"], "PT5M");
    assert_eq!(rule["scaleAction"]["direction"], "Increase");
}

#[test]
fn test_policy_yaml_output() {
    policy_cmd("yaml").assert().success().stdout(
        predicate::str::contains("targetResourceUri: plan-A")
            .and(predicate::str::contains("Monday to Friday")),
    );
}

#[test]
fn test_policy_table_output() {
    policy_cmd("table").assert().success().stdout(
        predicate::str::contains("Profile")
            .and(predicate::str::contains("Monday to Friday"))
            .and(predicate::str::contains("Requests")),
    );
}

#[test]
fn test_policy_empty_target_fails() {
    armscale_cmd()
        .args(["policy", "--target", "", "--metric-source", "site-B"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("target"));
}

#[test]
fn test_policy_uses_config_file_capacities() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[policy.business_hours_capacity]\nminimum = 2\nmaximum = 5\ndefault = 3"
    )
    .unwrap();

    let output = armscale_cmd()
        .arg("--config")
        .arg(file.path())
        .args(["policy", "--target", "plan-A", "--metric-source", "site-B"])
        .args(["-o", "json-compact"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let capacity = &doc["profiles"][1]["capacity"];
    assert_eq!(capacity["minimum"], "2");
    assert_eq!(capacity["maximum"], "5");
    assert_eq!(capacity["default"], "3");
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    armscale_cmd()
        .args(["--config", "/tmp/somewhere/armscale.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/somewhere/armscale.toml"));
}

#[test]
fn test_config_path_default() {
    armscale_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_masks_secret() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "client_id = \"app-id\"\nclient_secret = \"hunter2\"\ntenant_id = \"tenant\""
    )
    .unwrap();

    armscale_cmd()
        .arg("--config")
        .arg(file.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("app-id")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

// ── run ─────────────────────────────────────────────────────────────

#[test]
fn test_run_without_credentials_logs_and_exits_zero() {
    armscale_cmd()
        .arg("run")
        .assert()
        .success()
        .stderr(predicate::str::contains("CLIENT_ID"));
}

#[test]
fn test_bare_invocation_runs_scenario() {
    armscale_cmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("Missing service principal credentials"));
}
