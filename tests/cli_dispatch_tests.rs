use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_pricemaster")
}

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("pricemaster-{name}-{stamp}.{ext}"))
}

const VENUE_YAML: &str = r#"
sections:
  - name: Platinum
    seats: 500
  - name: Gold
    seats: 500
  - name: General
    seats: 500
target_revenue: 205000
margin_percent: 5
global_min: 50
global_max: 200
scenarios: [alta, moderada, baja]
seed: 21
"#;

#[test]
fn solve_command_emits_report_for_every_scenario() {
    let path = unique_temp_path("venue", "yaml");
    fs::write(&path, VENUE_YAML).expect("fixture should be written");

    let output = Command::new(bin())
        .args(["solve", path.to_string_lossy().as_ref()])
        .output()
        .expect("solve should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("solve should emit json");
    assert_eq!(payload["seed"], 21);
    let scenarios = payload["scenarios"].as_array().expect("scenarios array");
    assert_eq!(scenarios.len(), 3);
    assert_eq!(scenarios[0]["scenario"], "high");
    assert_eq!(scenarios[0]["path"], "exhaustive");
    assert_eq!(
        scenarios[0]["options"][0]["prices"],
        serde_json::json!([200.0, 181.25, 50.0])
    );
    assert_eq!(scenarios[0]["rows"].as_array().map(Vec::len), Some(3));

    let _ = fs::remove_file(path);
}

#[test]
fn solve_is_reproducible_with_seed_flag() {
    let run = || {
        Command::new(bin())
            .args(["solve", "--seed", "5", "--table"])
            .output()
            .expect("solve should run")
    };
    let first = run();
    let second = run();
    assert_eq!(first.status.code(), Some(0));
    assert_eq!(first.stdout, second.stdout);
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.starts_with("scenario\tpath\tsection"));
}

#[test]
fn solve_refuses_invalid_config() {
    let path = unique_temp_path("invalid", "json");
    fs::write(
        &path,
        r#"{"sections":[{"name":"Floor","seats":0}],"target_revenue":1000,"margin_percent":5,"global_min":10,"global_max":20}"#,
    )
    .expect("fixture should be written");

    let output = Command::new(bin())
        .args(["solve", path.to_string_lossy().as_ref()])
        .output()
        .expect("solve should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seats must be positive"));

    let _ = fs::remove_file(path);
}

#[test]
fn solve_reports_capped_enumeration() {
    let path = unique_temp_path("capped", "yaml");
    fs::write(
        &path,
        "sections:\n  - seats: 500\n  - seats: 500\n  - seats: 500\ntarget_revenue: 205000\n\
         margin_percent: 5\nglobal_min: 50\nglobal_max: 200\nscenarios: [high]\n\
         pin_endpoints: false\nmax_combinations: 2\nseed: 3\n",
    )
    .expect("fixture should be written");

    let output = Command::new(bin())
        .args(["solve", path.to_string_lossy().as_ref()])
        .output()
        .expect("solve should run");

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("solve: scenario high: combination cap reached, examined 2 of 27"));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("solve should emit json");
    assert_eq!(payload["scenarios"][0]["stats"]["truncated"], true);

    let _ = fs::remove_file(path);
}

#[test]
fn candidates_command_prints_scenario_window() {
    let output = Command::new(bin())
        .args(["candidates", "50", "200", "alta"])
        .output()
        .expect("candidates should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("candidates should emit json");
    assert_eq!(payload["scenario"], "high");
    assert_eq!(payload["candidates"], serde_json::json!([162.5, 181.25, 200.0]));
}

#[test]
fn validate_command_returns_usage_without_path() {
    let output = Command::new(bin())
        .arg("validate")
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: pricemaster validate"));
}

#[test]
fn defaults_output_validates() {
    let output = Command::new(bin())
        .arg("defaults")
        .output()
        .expect("defaults should run");
    assert_eq!(output.status.code(), Some(0));

    let path = unique_temp_path("defaults", "yaml");
    fs::write(&path, &output.stdout).expect("fixture should be written");
    let validated = Command::new(bin())
        .args(["validate", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");

    assert_eq!(validated.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&validated.stdout).contains("validation passed"));

    let _ = fs::remove_file(path);
}

#[test]
fn unknown_command_prints_usage() {
    let output = Command::new(bin())
        .arg("serve")
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: pricemaster"));
}
