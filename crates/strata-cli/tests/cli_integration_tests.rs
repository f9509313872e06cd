//! CLI integration tests
//!
//! Run the `strata` binary against a scratch migrations directory and
//! SQLite file, then inspect the database directly.

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn setup(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let migrations = temp_dir.path().join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(
        migrations.join("V1__create_person.sql"),
        "CREATE TABLE person (id INTEGER PRIMARY KEY);",
    )
    .unwrap();
    fs::write(
        migrations.join("V2__add_name.sql"),
        "ALTER TABLE person ADD COLUMN name TEXT;",
    )
    .unwrap();
    (migrations, temp_dir.path().join("app.db"))
}

fn strata(args: &[&str], migrations: &Path, db: &Path) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_strata");
    Command::new(cli_bin)
        .args(args)
        .args([
            "--location",
            migrations.to_str().unwrap(),
            "--database",
            db.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_migrate_applies_and_records() {
    let temp_dir = TempDir::new().unwrap();
    let (migrations, db) = setup(&temp_dir);

    let output = strata(&["migrate"], &migrations, &db);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Applied 2 migration(s)"));

    let conn = Connection::open(&db).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM goflyway_schema_history", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_cli_second_migrate_is_up_to_date() {
    let temp_dir = TempDir::new().unwrap();
    let (migrations, db) = setup(&temp_dir);

    assert!(strata(&["migrate"], &migrations, &db).status.success());
    let output = strata(&["migrate"], &migrations, &db);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Schema is up to date"));
}

#[test]
fn test_cli_validate_failure_exits_non_zero() {
    let temp_dir = TempDir::new().unwrap();
    let (migrations, db) = setup(&temp_dir);
    assert!(strata(&["migrate"], &migrations, &db).status.success());

    fs::write(
        migrations.join("V1__create_person.sql"),
        "CREATE TABLE person (id INTEGER PRIMARY KEY, email TEXT);",
    )
    .unwrap();
    let output = strata(&["validate"], &migrations, &db);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("migration checksum mismatch for migration version 1"));
}

#[test]
fn test_cli_info_json() {
    let temp_dir = TempDir::new().unwrap();
    let (migrations, db) = setup(&temp_dir);

    let output = strata(&["info", "--json"], &migrations, &db);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"state\": \"pending\""));
    assert!(stdout.contains("V2__add_name.sql"));
}

#[test]
fn test_cli_requires_database() {
    let temp_dir = TempDir::new().unwrap();
    let (migrations, _db) = setup(&temp_dir);

    let output = Command::new(env!("CARGO_BIN_EXE_strata"))
        .args(["migrate", "--location", migrations.to_str().unwrap()])
        .output()
        .expect("Failed to execute CLI");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("database connection is missing"));
}
