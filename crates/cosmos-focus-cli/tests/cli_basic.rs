//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary home directory
//! so the real data directory is never touched.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `home` as the home directory.
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_cosmos-focus"))
        .args(args)
        .env("HOME", home)
        .env_remove("COSMOS_FOCUS_ENV")
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_task_lifecycle() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["task", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Orbit clear. No tasks assigned."));

    let (code, stdout, _) = run_cli(home.path(), &["task", "add", "Review telemetry"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Task added:"));

    let (_, stdout, _) = run_cli(home.path(), &["task", "list", "--json"]);
    let tasks = json(&stdout);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["text"], "Review telemetry");
    assert_eq!(tasks[0]["completed"], false);
    let id = tasks[0]["id"].as_str().unwrap().to_string();

    let (code, _, _) = run_cli(home.path(), &["task", "toggle", &id]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["task", "list", "--json"]);
    assert_eq!(json(&stdout)[0]["completed"], true);

    let (code, _, _) = run_cli(home.path(), &["task", "remove", &id]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["task", "list", "--json"]);
    assert_eq!(json(&stdout), serde_json::json!([]));
}

#[test]
fn test_task_blank_add_is_ignored() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["task", "add", "   "]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["task", "list", "--json"]);
    assert_eq!(json(&stdout), serde_json::json!([]));
}

#[test]
fn test_task_toggle_unknown_fails() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["task", "toggle", "no-such-id"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: task not found"));
}

#[test]
fn test_timer_status_defaults() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot = json(&stdout);
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["mode"], "Focus");
    assert_eq!(snapshot["display"], "25:00");
    assert_eq!(snapshot["running"], false);
}

#[test]
fn test_timer_state_carries_between_runs() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["timer", "mode", "short"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["type"], "ModeSwitched");

    let (_, stdout, _) = run_cli(home.path(), &["timer", "start"]);
    assert_eq!(json(&stdout)["type"], "TimerStarted");

    let (code, stdout, _) = run_cli(home.path(), &["timer", "tick", "-n", "3"]);
    assert_eq!(code, 0);
    let snapshot = json(&stdout);
    assert_eq!(snapshot["mode"], "Short Break");
    assert_eq!(snapshot["remaining_secs"], 297);
    assert_eq!(snapshot["display"], "04:57");

    let (_, stdout, _) = run_cli(home.path(), &["timer", "reset"]);
    assert_eq!(json(&stdout)["type"], "TimerReset");
    let (_, stdout, _) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(json(&stdout)["remaining_secs"], 300);
}

#[test]
fn test_settings_set_clamps_and_persists() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["settings", "set", "focus", "500"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["settings", "show", "--json"]);
    assert_eq!(json(&stdout)["Focus"], 120 * 60);

    run_cli(home.path(), &["settings", "set", "long", "abc"]);
    let (_, stdout, _) = run_cli(home.path(), &["settings", "show", "--json"]);
    assert_eq!(json(&stdout)["Long Break"], 60);

    let (_, stdout, _) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(json(&stdout)["display"], "120:00");
}

#[test]
fn test_quote_without_key_falls_back() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["quote"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Stars do not rush, yet they shine.");
}

#[test]
fn test_config_get_and_set() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "quote.model"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "gemini-2.5-flash");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "audio.default_sound", "cosmic-rain"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "audio.default_sound"]);
    assert_eq!(stdout.trim(), "cosmic-rain");

    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_ambience_sounds() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["ambience", "sounds"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("deep-space"));
    assert!(stdout.contains("Binaural beats (10Hz)"));
    assert!(stdout.contains("Filtered static noise"));
}

#[test]
fn test_ambience_starfield_preview() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["ambience", "starfield", "--width", "800", "--height", "400", "--seed", "1"],
    );
    assert_eq!(code, 0);
    assert!(stdout.trim_end().ends_with("400 stars"));
}

#[test]
fn test_ambience_starfield_infinite_width_is_empty() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["ambience", "starfield", "--width", "inf", "--height", "400", "--seed", "1"],
    );
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end().lines().last(), Some("0 stars"));
}

#[test]
fn test_ambience_render_to_file() {
    let home = tempfile::tempdir().unwrap();
    let out = home.path().join("rain.f32");
    let (code, _, _) = run_cli(
        home.path(),
        &["ambience", "render", "cosmic-rain", "--seconds", "1", "--output", out.to_str().unwrap()],
    );
    assert_eq!(code, 0);
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(bytes.len(), (44_100 + 22_050) * 4);
}
