// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the ecosystem CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE: &str = include_str!("../.github/ISSUE_TEMPLATE/submission.yml");

const ISSUE: &str = "\
### Name

Foo

### Repository

https://github.com/x/foo

### Description

Does foo

### Licence

Apache 2.0

### Contact details

_No response_

### Alternatives

_No response_

### Affiliations

Foo Labs

### Labels

quantum, tooling

### Website

_No response_
";

/// Project root with the submission template in place
fn setup_root() -> TempDir {
    let root = TempDir::new().unwrap();
    let template_dir = root.path().join(".github/ISSUE_TEMPLATE");
    fs::create_dir_all(&template_dir).unwrap();
    fs::write(template_dir.join("submission.yml"), TEMPLATE).unwrap();
    root
}

/// Command for the ecosystem binary running against `root`
fn ecosystem(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ecosystem").unwrap();
    cmd.arg("--root")
        .arg(root)
        .env_remove("GITHUB_OUTPUT")
        .env_remove("ECOSYSTEM_CONFIG")
        .env_remove("NO_COLOR")
        .arg("--no-color");
    cmd
}

/// Parse `$GITHUB_OUTPUT` heredoc entries the way the Actions runner does
fn read_github_output(text: &str) -> Vec<(String, String)> {
    let mut outputs = Vec::new();
    let mut lines = text.lines();
    while let Some(header) = lines.next() {
        let (key, delimiter) = header.split_once("<<").unwrap();
        let value: Vec<&str> = lines.by_ref().take_while(|line| *line != delimiter).collect();
        outputs.push((key.to_string(), value.join("\n")));
    }
    outputs
}

fn add(root: &Path, name: &str, url: &str) {
    ecosystem(root)
        .args(["add", "--name", name, "--url", url])
        .assert()
        .success();
}

#[test]
fn test_parse_issue_prints_outputs() {
    let root = setup_root();

    ecosystem(root.path())
        .args(["parse-issue", "--body", ISSUE])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUBMISSION_NAME=Foo\n"))
        .stdout(predicate::str::contains("SUBMISSION_REPO=https://github.com/x/foo\n"))
        .stdout(predicate::str::contains("SUBMISSION_CONTACT=\n"))
        .stdout(predicate::str::contains("SUBMISSION_AFFILIATIONS=Foo Labs\n"))
        .stdout(predicate::str::contains("SUBMISSION_LABELS=quantum,tooling\n"));
}

#[test]
fn test_parse_issue_writes_github_output() {
    let root = setup_root();
    let output_file = root.path().join("github_output");

    ecosystem(root.path())
        .env("GITHUB_OUTPUT", &output_file)
        .args(["parse-issue", "--body", ISSUE])
        .assert()
        .success();

    let written = fs::read_to_string(&output_file).unwrap();
    let outputs = read_github_output(&written);
    assert_eq!(outputs[0], ("SUBMISSION_NAME".to_string(), "Foo".to_string()));
    assert_eq!(outputs[7], ("SUBMISSION_LABELS".to_string(), "quantum,tooling".to_string()));
    assert_eq!(outputs.len(), 9);
}

#[test]
fn test_parse_issue_github_output_survives_delimiter_in_body() {
    let root = setup_root();
    let output_file = root.path().join("github_output");
    let body = ISSUE.replace("Does foo", "ECOSYSTEM_SUBMISSION_EOF");

    ecosystem(root.path())
        .env("GITHUB_OUTPUT", &output_file)
        .args(["parse-issue", "--body", &body])
        .assert()
        .success();

    let outputs = read_github_output(&fs::read_to_string(&output_file).unwrap());
    assert_eq!(outputs.len(), 9);
    assert_eq!(
        outputs[2],
        ("SUBMISSION_DESCRIPTION".to_string(), "ECOSYSTEM_SUBMISSION_EOF".to_string())
    );
    assert_eq!(outputs[3], ("SUBMISSION_LICENCE".to_string(), "Apache 2.0".to_string()));
}

#[test]
fn test_parse_issue_json() {
    let root = setup_root();
    let body_file = root.path().join("issue.md");
    fs::write(&body_file, ISSUE).unwrap();

    let output = ecosystem(root.path())
        .args(["--json", "parse-issue", "--body-file"])
        .arg(&body_file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["name"], "Foo");
    assert_eq!(record["tier"], "Community");
    assert_eq!(record["labels"], serde_json::json!(["quantum", "tooling"]));
    assert!(record.get("contact_info").is_none());
}

#[test]
fn test_parse_issue_rejects_unknown_section() {
    let root = setup_root();
    let body = format!("{ISSUE}\n### Favourite colour\n\nblue\n");

    ecosystem(root.path())
        .args(["parse-issue", "--body", &body])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown section 'Favourite colour'"));
}

#[test]
fn test_parse_issue_without_template_fails() {
    let root = TempDir::new().unwrap();

    ecosystem(root.path())
        .args(["parse-issue", "--body", ISSUE])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read issue template"));
}

#[test]
fn test_add_from_issue_then_list_candidates() {
    let root = setup_root();

    ecosystem(root.path())
        .args(["add-from-issue", "--body", ISSUE])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added https://github.com/x/foo"));
    add(root.path(), "Bar", "https://github.com/y/bar/");

    let output = ecosystem(root.path()).arg("list-candidates").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    insta::assert_snapshot!(stdout.trim(), @r#"["x/foo","y/bar"]"#);
}

#[test]
fn test_set_tier_and_recompile() {
    let root = setup_root();
    add(root.path(), "Foo", "https://github.com/x/foo");
    add(root.path(), "Bar", "https://github.com/y/bar");

    ecosystem(root.path())
        .args(["set-tier", "https://github.com/y/bar", "Main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now Main"));

    ecosystem(root.path())
        .args(["set-tier", "https://github.com/y/bar", "Gold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown tier 'Gold'"));

    ecosystem(root.path())
        .args(["set-tier", "https://github.com/nobody/nothing", "Main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no record with url"));

    ecosystem(root.path()).arg("recompile").assert().success();

    let snapshot = fs::read_to_string(root.path().join("ecosystem/resources/members.json")).unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "Bar");
    assert_eq!(records[0]["tier"], "Main");
    assert_eq!(records[1]["name"], "Foo");
}

#[test]
fn test_list_groups_by_tier() {
    let root = setup_root();
    add(root.path(), "Foo", "https://github.com/x/foo");
    ecosystem(root.path())
        .args(["add", "--name", "Bar", "--url", "https://github.com/y/bar", "--tier", "Main"])
        .assert()
        .success();

    let output = ecosystem(root.path()).arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let main = stdout.find("Main (1)").unwrap();
    let community = stdout.find("Community (1)").unwrap();
    assert!(main < community);
    assert!(!stdout.contains("Member ("));
}

#[test]
fn test_ingest_results() {
    let root = setup_root();
    add(root.path(), "Foo", "https://github.com/x/foo");
    let artifacts = root.path().join("artifacts/run-1");
    fs::create_dir_all(&artifacts).unwrap();
    fs::write(
        artifacts.join("foo.json"),
        r#"{"repo_name": "x/foo", "test_type": "standard", "passed": false, "logs_link": "https://ci.example.com/1"}"#,
    )
    .unwrap();

    ecosystem(root.path())
        .arg("ingest-results")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 updated"));

    let output = ecosystem(root.path()).args(["--json", "list"]).output().unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records[0]["tests_results"][0]["passed"], false);
    assert_eq!(records[0]["tests_results"][0]["logs_link"], "https://ci.example.com/1");
}

#[test]
fn test_ingest_results_malformed_artifact_fails() {
    let root = setup_root();
    add(root.path(), "Foo", "https://github.com/x/foo");
    let artifacts = root.path().join("artifacts");
    fs::create_dir_all(&artifacts).unwrap();
    fs::write(artifacts.join("foo.json"), r#"{"test_type": "standard", "passed": true}"#).unwrap();

    ecosystem(root.path())
        .args(["ingest-results", "--path"])
        .arg(&artifacts)
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no repo_name"));
}

#[test]
fn test_completions() {
    let root = TempDir::new().unwrap();

    ecosystem(root.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ecosystem"));
}
