//! CLI integration tests
//!
//! These tests run the built binary against temporary databases and
//! migration directories.

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn setup_migrations(temp_dir: &TempDir) -> PathBuf {
    let dir = temp_dir.path().join("migrations");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("0000_0001_create_user.sql"),
        "CREATE TABLE IF NOT EXISTS user (id INTEGER PRIMARY KEY, name TEXT);",
    )
    .unwrap();
    fs::write(
        dir.join("0001_0002_create_note.sql"),
        "CREATE TABLE IF NOT EXISTS note (id INTEGER PRIMARY KEY, body TEXT);",
    )
    .unwrap();
    dir
}

fn run(temp_dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_litemig-cli"))
        .current_dir(temp_dir.path())
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn user_version(db: &Path) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_cli_migrate_creates_and_migrates_database() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("app.db");

    let output = run(
        &temp_dir,
        &["migrate", "--db", path_str(&db), "--dir", path_str(&dir)],
    );

    assert!(
        output.status.success(),
        "migrate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Migrated from 0 to 2"), "stdout: {}", stdout);
    assert_eq!(user_version(&db), 2);
}

#[test]
fn test_cli_migrate_twice_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("app.db");
    let args = ["migrate", "--db", path_str(&db), "--dir", path_str(&dir)];

    assert!(run(&temp_dir, &args).status.success());
    let output = run(&temp_dir, &args);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Already at version 2"));
}

#[test]
fn test_cli_dry_run_does_not_write() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("app.db");

    let output = run(
        &temp_dir,
        &[
            "migrate",
            "--db",
            path_str(&db),
            "--dir",
            path_str(&dir),
            "--dry-run",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would apply 0 -> 1 (0000_0001_create_user)"));
    assert!(stdout.contains("Would apply 1 -> 2 (0001_0002_create_note)"));
    assert_eq!(user_version(&db), 0);
}

#[test]
fn test_cli_version_set_then_get() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("app.db");
    Connection::open(&db).unwrap();

    let set = run(&temp_dir, &["version", "set", "--db", path_str(&db), "7"]);
    assert!(set.status.success());

    let get = run(&temp_dir, &["version", "get", "--db", path_str(&db)]);
    assert!(get.status.success());
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "7");
}

#[test]
fn test_cli_version_get_missing_database_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("missing.db");

    let output = run(&temp_dir, &["version", "get", "--db", path_str(&db)]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("database not found"));
    assert!(!db.exists());
}

#[test]
fn test_cli_status_json_lists_pending_steps() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("app.db");
    Connection::open(&db).unwrap();

    let output = run(
        &temp_dir,
        &[
            "status",
            "--db",
            path_str(&db),
            "--dir",
            path_str(&dir),
            "--json",
        ],
    );

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["current_version"], 0);
    assert_eq!(report["latest_version"], 2);
    assert_eq!(report["up_to_date"], false);
    assert_eq!(report["pending"].as_array().unwrap().len(), 2);
    assert_eq!(report["pending"][0]["name"], "0000_0001_create_user");
    assert!(report.get("path_error").is_none());
}

#[test]
fn test_cli_status_reports_missing_path() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("app.db");
    Connection::open(&db)
        .unwrap()
        .execute_batch("PRAGMA user_version = 9")
        .unwrap();

    let output = run(
        &temp_dir,
        &[
            "status",
            "--db",
            path_str(&db),
            "--dir",
            path_str(&dir),
            "--json",
        ],
    );

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["current_version"], 9);
    assert!(report["path_error"]
        .as_str()
        .unwrap()
        .contains("ERR_NO_MIGRATION_PATH"));
}

#[test]
fn test_cli_migrate_failing_step_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    fs::write(dir.join("0002_0003_broken.sql"), "INSERT INTO nope VALUES (1);").unwrap();
    let db = temp_dir.path().join("app.db");

    let output = run(
        &temp_dir,
        &["migrate", "--db", path_str(&db), "--dir", path_str(&dir)],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_STEP_EXECUTION"));
    assert_eq!(user_version(&db), 2);
}

#[test]
fn test_cli_dry_run_on_missing_database_creates_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("absent.db");

    let output = run(
        &temp_dir,
        &[
            "migrate",
            "--db",
            path_str(&db),
            "--dir",
            path_str(&dir),
            "--dry-run",
        ],
    );

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Would apply 0 -> 1"));
    assert!(!db.exists());
}

#[test]
fn test_cli_huge_timeout_runs_without_deadline() {
    let temp_dir = TempDir::new().unwrap();
    let dir = setup_migrations(&temp_dir);
    let db = temp_dir.path().join("app.db");

    let output = run(
        &temp_dir,
        &[
            "migrate",
            "--db",
            path_str(&db),
            "--dir",
            path_str(&dir),
            "--timeout-secs",
            "18446744073709551615",
        ],
    );

    assert!(
        output.status.success(),
        "migrate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(user_version(&db), 2);
}
