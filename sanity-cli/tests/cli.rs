// End-to-end tests driving the `sanity-check` binary.
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn sanity_check(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sanity-check"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("SANITY_RULES")
        .env_remove("SANITY_FORMAT")
        .env_remove("SANITY_STRICT")
        .env_remove("SANITY_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run sanity-check")
}

fn copy_fixture(dir: &TempDir, name: &str) -> PathBuf {
    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let target = dir.path().join(name);
    fs::copy(&source, &target).expect("copy fixture");
    target
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn prints_violations_one_per_line() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(
        dir.path(),
        "paper.json",
        r#"{
            "Code available": false,
            "Explainability": "Full",
            "Adaptation": ["Online"],
            "Use case": "Not applicable",
            "Location": "Urban"
        }"#,
    );

    let output = sanity_check(&dir, &["paper.json"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![
            "Code is not available, so Explainability must be 'Pseudo-code' (found 'Full')",
            "Use case is 'Not applicable', so Location must also be 'Not applicable' (found 'Urban')",
        ]
    );
    Ok(())
}

#[test]
fn reports_clean_records() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(
        dir.path(),
        "paper.json",
        r#"{"Code available": false, "Explainability": "Pseudo-code", "Adaptation": "Online"}"#,
    );

    let output = sanity_check(&dir, &["paper.json"]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["All sanity checks passed."]);
    Ok(())
}

#[test]
fn strict_mode_fails_on_violations() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "paper.json", r#"{"Explainability": "Evaluated"}"#);

    let output = sanity_check(&dir, &["paper.json", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
    Ok(())
}

#[test]
fn malformed_record_is_fatal() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "paper.json", r#"["not", "a", "mapping"]"#);

    let output = sanity_check(&dir, &["paper.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed annotation record paper.json"));
    Ok(())
}

#[test]
fn unloadable_rule_configuration_is_fatal() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "paper.json", r#"{"Explainability": "Full"}"#);

    let output = sanity_check(&dir, &["paper.json", "missing-rules.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing-rules.json"));
    Ok(())
}

#[test]
fn uses_custom_rule_configuration() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "paper.json", r#"{"Location": "In the wild"}"#);
    write(
        dir.path(),
        "rules.json",
        r#"[{
            "id": "no-field-work",
            "requirement": {"type": "not_equals", "field": "Location", "value": "In the wild"},
            "message": "Location '{Location}' is not allowed"
        }]"#,
    );

    let output = sanity_check(&dir, &["paper.json", "rules.json"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["Location 'In the wild' is not allowed"]
    );
    Ok(())
}

#[test]
fn json_report_for_export_bundle() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let export = json!({
        "P1": {
            "paper": {"title": "Simulated grasping", "authors": "Doe", "year": "2024"},
            "excluded_from_full_text_review": false,
            "exclusion_reason": "",
            "responses": {
                "RQ1": {
                    "Deployment type": ["Robot simulation"],
                    "Simulation environment": ["Gazebo"],
                    "Location": ["In the wild"],
                    "Adaptation": ["Online"]
                }
            }
        },
        "P2": {
            "excluded_from_full_text_review": true,
            "exclusion_reason": "Not about robots",
            "responses": {}
        }
    });
    write(dir.path(), "export.json", &export.to_string());

    let output = sanity_check(&dir, &["export.json", "--format", "json"]);
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["clean"], json!(false));
    assert_eq!(report["violation_count"], json!(1));
    assert_eq!(report["rules"], json!("built_in"));
    assert_eq!(report["papers"][0]["key"], json!("P1"));
    assert_eq!(
        report["papers"][0]["report"]["violations"][0]["rule_id"],
        json!("simulation-not-in-the-wild")
    );
    assert_eq!(report["papers"][1]["excluded"], json!(true));
    assert!(report["checked_at"].is_string());
    Ok(())
}

#[test]
fn selects_a_single_paper() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let export = json!({
        "P1": {"responses": {"RQ1": {"Use case": ["Not applicable"], "Location": ["Urban"], "Adaptation": ["Online"]}}},
        "P2": {"responses": {"RQ1": {"Adaptation": ["Online"]}}}
    });
    write(dir.path(), "export.json", &export.to_string());

    let output = sanity_check(&dir, &["export.json", "--paper", "P2"]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["P2", "  All sanity checks passed."]);

    let output = sanity_check(&dir, &["export.json", "--paper", "P9"]);
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}

#[test]
fn lists_built_in_rules() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = sanity_check(&dir, &["--list-rules"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert!(lines[0].starts_with("Active rules: 9"));
    assert!(lines
        .iter()
        .any(|line| line.starts_with("  code-unavailable-pseudo-code:")));
    Ok(())
}

#[test]
fn checks_a_full_editor_export() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    copy_fixture(&dir, "export.json");

    let output = sanity_check(&dir, &["export.json"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_lines(&output),
        vec![
            "doe2024adaptive (Adaptive explanations for service robots)",
            "  Deployment type is 'Robot simulation', so Location cannot be 'In the wild'",
            "lee2022grasping (Grasp planning with pseudo-code explanations)",
            "  All sanity checks passed.",
            "roe2023survey (A survey of robot explanations)",
            "  excluded from full text review, not checked",
            "1 violation(s) in 1 of 3 paper(s)",
        ]
    );

    let output = sanity_check(&dir, &["export.json", "--format", "json", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["violation_count"], json!(1));
    assert_eq!(
        report["papers"][0]["report"]["violations"][0]["rule_id"],
        json!("simulation-not-in-the-wild")
    );
    assert_eq!(report["papers"][1]["report"]["violations"], json!([]));
    Ok(())
}

#[test]
fn lists_rules_from_a_given_configuration() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(
        dir.path(),
        "rules.json",
        r#"[{
            "id": "location-given",
            "description": "Every paper names a location.",
            "requirement": {"type": "non_empty", "field": "Location"},
            "message": "Location is missing"
        }]"#,
    );

    let output = sanity_check(&dir, &["--list-rules", "rules.json"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![
            "Active rules: 1 (rules.json)",
            "  location-given: Every paper names a location.",
        ]
    );
    Ok(())
}

#[test]
fn rejects_a_record_together_with_list_rules() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "paper.json", r#"{"Location": "Urban"}"#);

    let output = sanity_check(&dir, &["paper.json", "--list-rules"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    Ok(())
}
