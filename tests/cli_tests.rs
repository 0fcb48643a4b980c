use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;

mod common;
use common::{db_in, ts};

#[test]
fn test_init_creates_database() {
    let home = tempfile::tempdir().unwrap();
    let db = db_in(home.path());

    ts(home.path())
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db).exists());
    // test mode leaves the config file alone
    assert!(!home.path().join(".timespent/timespent.conf").exists());
}

#[test]
fn test_add_list_and_filter() {
    let home = tempfile::tempdir().unwrap();
    let db = db_in(home.path());

    ts(home.path())
        .args([
            "--db", &db, "add", "-d", "jog", "-s", "1500", "-t", "morning,running", "--start",
            "2024-01-01T06:00:00Z", "--end", "2024-01-01T06:25:00Z",
        ])
        .assert()
        .success()
        .stdout(contains("Added entry #1 (00h 25m 00s)"));

    ts(home.path())
        .args([
            "--db", &db, "add", "-d", "code review", "-s", "600", "-t", "work", "--end",
            "2024-01-02T10:00:00Z",
        ])
        .assert()
        .success()
        .stdout(contains("Added entry #2 (00h 10m 00s)"));

    ts(home.path())
        .args(["--db", &db, "list"])
        .assert()
        .success()
        .stdout(
            contains("Description")
                .and(contains("jog"))
                .and(contains("morning, running"))
                .and(contains("code review")),
        );

    ts(home.path())
        .args(["--db", &db, "list", "--tag", "run"])
        .assert()
        .success()
        .stdout(contains("jog").and(contains("code review").not()));

    ts(home.path())
        .args(["--db", &db, "list", "--tag", "gym"])
        .assert()
        .success()
        .stdout(contains("No history entries."));

    let out = ts(home.path())
        .args(["--db", &db, "list", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let rows: Vec<Value> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(rows.len(), 2);
    // newest start first; start was derived from end minus duration
    assert_eq!(rows[0]["description"], "code review");
    assert_eq!(rows[0]["start_time"], "2024-01-02T09:50:00.000Z");
    assert_eq!(rows[1]["tags"], serde_json::json!(["morning", "running"]));
}

#[test]
fn test_delete_entries() {
    let home = tempfile::tempdir().unwrap();
    let db = db_in(home.path());

    for desc in ["a", "b", "c"] {
        ts(home.path())
            .args(["--db", &db, "add", "-d", desc, "-s", "60"])
            .assert()
            .success();
    }

    ts(home.path())
        .args(["--db", &db, "del", "--id", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("Attempted deletion for entry ID 1."));

    ts(home.path())
        .args(["--db", &db, "del", "--all"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled."));

    let out = ts(home.path())
        .args(["--db", &db, "list", "--json"])
        .output()
        .unwrap();
    let rows: Vec<Value> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(rows.len(), 2);

    ts(home.path())
        .args(["--db", &db, "del", "--all", "-y"])
        .assert()
        .success()
        .stdout(contains("Successfully deleted history entries."));

    ts(home.path())
        .args(["--db", &db, "list"])
        .assert()
        .success()
        .stdout(contains("No history entries."));
}

#[test]
fn test_delete_rejects_zero_id() {
    let home = tempfile::tempdir().unwrap();
    let db = db_in(home.path());

    ts(home.path())
        .args(["--db", &db, "del", "--id", "0", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Missing entry ID"));
}

#[test]
fn test_remote_backend_needs_credentials() {
    let home = tempfile::tempdir().unwrap();

    ts(home.path())
        .args(["--backend", "remote", "list"])
        .assert()
        .failure()
        .stderr(contains("Supabase URL and Key"));
}

#[test]
fn test_add_rejects_bad_duration() {
    let home = tempfile::tempdir().unwrap();
    let db = db_in(home.path());

    ts(home.path())
        .args(["--db", &db, "add", "-d", "x", "-s", "soon"])
        .assert()
        .failure()
        .stderr(contains("duration must be seconds"));
}

#[test]
fn test_dotenv_supplies_credentials() {
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    std::fs::write(
        work.path().join(".env"),
        "SUPABASE_URL=https://dotenv.supabase.co\nSUPABASE_KEY=from-dotenv\nPORT=8181\n",
    )
    .unwrap();

    ts(home.path())
        .current_dir(work.path())
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(
            contains("https://dotenv.supabase.co")
                .and(contains("port: 8181"))
                .and(contains("from-dotenv").not()),
        );
}

#[test]
fn test_config_print_masks_key() {
    let home = tempfile::tempdir().unwrap();

    ts(home.path())
        .env("SUPABASE_URL", "https://abc.supabase.co")
        .env("SUPABASE_KEY", "service-secret")
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(
            contains("https://abc.supabase.co")
                .and(contains("********"))
                .and(contains("service-secret").not()),
        );
}
