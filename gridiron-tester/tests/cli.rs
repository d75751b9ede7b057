use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "gridiron-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_gridiron-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    for key in ["smoke", "determinism", "full-game", "outcome-distribution", "injury-bounds", "rb-rotation"] {
        assert!(content.contains(key), "{key} not listed");
    }
}

#[test]
fn cli_runs_smoke_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_gridiron-tester");
    let output_path = temp_path("smoke.json");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "smoke,determinism",
            "--iterations",
            "1",
            "--seeds",
            "1,0x2A",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Gridiron Automated Tester"));

    let report = std::fs::read_to_string(output_path).expect("read report");
    let parsed: serde_json::Value = serde_json::from_str(&report).expect("report is json");
    let results = parsed.as_array().expect("array of results");
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["passed"] == serde_json::Value::Bool(true)));
}

#[test]
fn cli_rejects_bad_seeds() {
    let exe = env!("CARGO_BIN_EXE_gridiron-tester");
    let output = Command::new(exe)
        .args(["--report", "json", "--seeds", "kickoff"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unrecognized seed"));
}

#[test]
fn cli_rejects_unknown_report_format() {
    let exe = env!("CARGO_BIN_EXE_gridiron-tester");
    let output = Command::new(exe).args(["--report", "xml"]).output().expect("run cli");
    assert!(!output.status.success());
}
