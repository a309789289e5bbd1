//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway config file.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_circadia"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn temp_config() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    (dir, path)
}

#[test]
fn test_timeline_json_reference_times() {
    let (_dir, config) = temp_config();
    let (code, stdout, stderr) = run_cli(
        &config,
        &[
            "timeline", "--date", "2026-10-17", "--now", "06:00", "--typical-wake", "07:00",
            "--bed", "23:00", "--json",
        ],
    );
    assert_eq!(code, 0, "timeline failed: {stderr}");

    let timeline: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let actions = timeline["all_actions"].as_array().unwrap();
    let find = |id: &str| {
        actions
            .iter()
            .find(|a| a["id"] == id)
            .unwrap_or_else(|| panic!("missing {id}"))
            .clone()
    };
    let sunlight = find("morning_sunlight-2026-10-17");
    assert_eq!(sunlight["scheduled_time"], "2026-10-17T07:00:00");
    assert_eq!(sunlight["window_end"], "2026-10-17T08:00:00");
    let cutoff = find("caffeine_cutoff-2026-10-17");
    assert_eq!(cutoff["scheduled_time"], "2026-10-17T13:00:00");
    assert_eq!(timeline["next_action"]["id"], "morning_sunlight-2026-10-17");
}

#[test]
fn test_timeline_text_lists_segments() {
    let (_dir, config) = temp_config();
    let (code, stdout, _) = run_cli(
        &config,
        &["timeline", "--date", "2026-10-17", "--now", "12:00", "--training", "17:30"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Morning"));
    assert!(stdout.contains("Wind-down"));
    assert!(stdout.contains("Neural Prep"));
}

#[test]
fn test_timeline_with_sessions_file() {
    let (dir, config) = temp_config();
    let sessions = dir.path().join("sessions.json");
    std::fs::write(
        &sessions,
        r#"[{"id":"row","title":"Erg intervals","time_of_day":"18:00","duration_minutes":45,"mandatory":true}]"#,
    )
    .unwrap();
    let (code, stdout, stderr) = run_cli(
        &config,
        &[
            "timeline", "--date", "2026-10-17", "--now", "18:10", "--sessions",
            sessions.to_str().unwrap(), "--json",
        ],
    );
    assert_eq!(code, 0, "{stderr}");
    let timeline: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let session = timeline["all_actions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == "row-2026-10-17")
        .unwrap();
    assert_eq!(session["relative_label"], "Scheduled");
    assert_eq!(session["is_active"], true);
}

#[test]
fn test_stack_json() {
    let (_dir, config) = temp_config();
    let (code, stdout, _) = run_cli(&config, &["stack", "09:00", "--date", "2026-10-17", "--json"]);
    assert_eq!(code, 0);
    let output: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(output["timings"]["bedtime"], "23:00");
    assert_eq!(output["timings"]["neural_prep"], "08:15");
    assert_eq!(output["stack"].as_array().unwrap().len(), 6);
}

#[test]
fn test_stack_rejects_out_of_range_sleep_hours() {
    let (_dir, config) = temp_config();
    let (code, _, stderr) = run_cli(&config, &["stack", "09:00", "--sleep-hours", "30"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("target_sleep_hours"), "{stderr}");

    let (code, _, _) = run_cli(&config, &["config", "set", "session_stack.target_sleep_hours", "1e18"]);
    assert_ne!(code, 0);
}

#[test]
fn test_defer_training_at_bedtime() {
    let (_dir, config) = temp_config();
    let (code, stdout, _) = run_cli(
        &config,
        &["defer", "training", "--hour", "23", "--bed", "23:00", "--wake", "07:00", "--json"],
    );
    assert_eq!(code, 0);
    let decision: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(decision["should_defer"], true);
    assert_eq!(decision["suggested_time"], "09:00");
}

#[test]
fn test_defer_rejects_unknown_category() {
    let (_dir, config) = temp_config();
    let (code, _, stderr) = run_cli(&config, &["defer", "juggling", "--hour", "10"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown action category"));
}

#[test]
fn test_react_json() {
    let (_dir, config) = temp_config();
    let (code, stdout, _) = run_cli(
        &config,
        &["react", "--readiness", "30", "--stress", "9", "--recovery", "80", "--hour", "14", "--json"],
    );
    assert_eq!(code, 0);
    let recs: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let actions: Vec<_> = recs.as_array().unwrap().iter().map(|r| r["action"].clone()).collect();
    assert_eq!(actions, vec!["power_nap", "box_breathing"]);
}

#[test]
fn test_chronotype() {
    let (_dir, config) = temp_config();
    let (code, stdout, _) = run_cli(&config, &["chronotype", "--wake", "05:30", "--sleep", "21:30"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "lion");
}

#[test]
fn test_config_set_get_roundtrip() {
    let (_dir, config) = temp_config();
    let (code, stdout, _) = run_cli(&config, &["config", "set", "patterns.typical_wake_time", "06:15"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (code, stdout, _) = run_cli(&config, &["config", "get", "patterns.typical_wake_time"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "06:15");

    let (code, _, _) = run_cli(&config, &["config", "set", "patterns.typical_wake_time", "6am"]);
    assert_ne!(code, 0);
}

#[test]
fn test_catalog_list_domain() {
    let (_dir, config) = temp_config();
    let (code, stdout, _) = run_cli(&config, &["catalog", "list", "--domain", "fuel", "--json"]);
    assert_eq!(code, 0);
    let protocols: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let protocols = protocols.as_array().unwrap();
    assert!(!protocols.is_empty());
    assert!(protocols.iter().all(|p| p["domain"] == "fuel"));
}

#[test]
fn test_rejects_malformed_time_argument() {
    let (_dir, config) = temp_config();
    let (code, _, stderr) = run_cli(&config, &["stack", "9am"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("HH:MM"));
}
