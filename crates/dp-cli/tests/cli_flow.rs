//! End-to-end tests driving the `dayplan` binary.
//!
//! Every test gets its own HOME and data directory so the user's real
//! configuration and day files are never touched.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn dayplan_binary() -> String {
    env!("CARGO_BIN_EXE_dayplan").to_string()
}

/// Writes a config file with category priorities and returns its path.
fn write_config(temp: &Path) -> std::path::PathBuf {
    let path = temp.join("dayplan.toml");
    let data_dir = temp.join("data");
    std::fs::write(
        &path,
        format!(
            r#"data_dir = "{}"
push_min_gap_minutes = 0

[[categories]]
name = "work"
priority = 80

[[categories]]
name = "eating"
priority = 10
"#,
            data_dir.display()
        ),
    )
    .unwrap();
    path
}

fn dayplan(temp: &TempDir, args: &[&str]) -> Output {
    let config = write_config(temp.path());
    Command::new(dayplan_binary())
        .env("HOME", temp.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("DAYPLAN_DATA_DIR")
        .env_remove("DAYPLAN_PUSH_MIN_GAP_MINUTES")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("failed to run dayplan")
}

fn stdout_of(temp: &TempDir, args: &[&str]) -> String {
    let output = dayplan(temp, args);
    assert!(
        output.status.success(),
        "dayplan {args:?} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

fn add(temp: &TempDir, date: &str, start: &str, end: &str, category: &str, name: &str) {
    stdout_of(
        temp,
        &[
            "add", "--date", date, "--start", start, "--end", end, "--category", category,
            "--name", name,
        ],
    );
}

/// Plan a day, edit it, and report on it.
#[test]
fn test_plan_edit_and_report() {
    let temp = TempDir::new().unwrap();

    add(&temp, "2025-01-13", "08:00", "12:00", "work", "parser");
    add(&temp, "2025-01-13", "11:30", "12:30", "eating", "lunch");
    add(&temp, "2025-01-13", "13:00", "16:00", "work", "review");

    let day_file = temp.path().join("data/days/2025-01-13");
    assert_eq!(
        std::fs::read_to_string(&day_file).unwrap(),
        "08:00|12:00|work|parser\n11:30|12:30|eating|lunch\n13:00|16:00|work|review\n"
    );

    let listed = stdout_of(&temp, &["list", "--date", "2025-01-13", "--flat"]);
    assert_eq!(
        listed,
        "0 08:00-12:00 work parser\n1 12:00-12:30 eating lunch\n2 13:00-16:00 work review\n"
    );

    // Lunch now overlaps the afternoon block, which is pushed along.
    stdout_of(
        &temp,
        &["move", "--date", "2025-01-13", "--index", "1", "--by", "45", "--push"],
    );
    assert_eq!(
        std::fs::read_to_string(&day_file).unwrap(),
        "08:00|12:00|work|parser\n12:15|13:15|eating|lunch\n13:45|16:45|work|review\n"
    );

    let summary = stdout_of(
        &temp,
        &["summarize", "--from", "2025-01-13", "--til", "2025-01-13"],
    );
    assert_eq!(summary, "eating 60\nwork 420\n");

    let timesheet = stdout_of(
        &temp,
        &[
            "timesheet", "--from", "2025-01-12", "--til", "2025-01-13", "--category", "work",
            "--include-empty",
        ],
    );
    assert_eq!(timesheet, "2025-01-12,,,\n2025-01-13,08:00,01:45,16:45\n");
}

/// Repeated events land on every matching day.
#[test]
fn test_weekly_repeat() {
    let temp = TempDir::new().unwrap();

    stdout_of(
        &temp,
        &[
            "add", "--date", "2025-01-06", "--start", "09:00", "--end", "09:15", "--category",
            "meeting", "--name", "standup", "--repeat", "weekly", "--til", "2025-01-20",
        ],
    );

    let summary = stdout_of(
        &temp,
        &[
            "summarize", "--from", "2025-01-01", "--til", "2025-01-31", "--human-readable",
        ],
    );
    assert_eq!(summary, "meeting 45m\n");

    let days: Vec<String> = std::fs::read_dir(temp.path().join("data/days"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    assert_eq!(days.len(), 3);
}

/// Failed edits report an error and leave the day untouched.
#[test]
fn test_errors_exit_nonzero() {
    let temp = TempDir::new().unwrap();
    add(&temp, "2025-01-13", "09:00", "10:00", "work", "x");

    let output = dayplan(
        &temp,
        &["split", "--date", "2025-01-13", "--index", "0", "--at", "11:00"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot split event 0"));

    let output = dayplan(&temp, &["list", "--date", "13/01/2025"]);
    assert!(!output.status.success());

    assert_eq!(
        std::fs::read_to_string(temp.path().join("data/days/2025-01-13")).unwrap(),
        "09:00|10:00|work|x\n"
    );
}

/// JSON summary output is machine readable.
#[test]
fn test_summarize_json() {
    let temp = TempDir::new().unwrap();
    add(&temp, "2025-01-13", "09:00", "10:30", "work", "x");

    let output = stdout_of(
        &temp,
        &["summarize", "--from", "2025-01-13", "--til", "2025-01-13", "--json"],
    );

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["work"], 90);
}
