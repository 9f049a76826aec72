use std::process::{Command, Output};

use assert_cmd::prelude::*;
use predicates::str::contains;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROOMSYNC_VARS: &[&str] = &[
    "ROOMSYNC_ACCESS_TOKEN",
    "ROOMSYNC_SOURCE_ROOM",
    "ROOMSYNC_DESTINATION_ROOM",
    "ROOMSYNC_NOTIFY",
    "ROOMSYNC_API_BASE",
    "ROOMSYNC_TIMEOUT_SECS",
    "ROOMSYNC_TEMPLATE_DIR",
];

fn roomsync_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("roomsync"));
    cmd.current_dir(dir.path());
    for var in ROOMSYNC_VARS {
        cmd.env_remove(var);
    }
    cmd
}

async fn run_blocking(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("run roomsync"))
        .await
        .expect("join")
}

async fn mount_roster(server: &MockServer, room: &str, ids: &[&str]) {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "personId": id, "personEmail": format!("{id}@example.com") }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/memberships"))
        .and(query_param("roomId", room))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

fn room_args(server: &MockServer) -> Vec<String> {
    vec![
        "--token".to_string(),
        "test-token".to_string(),
        "--source".to_string(),
        "room-src".to_string(),
        "--destination".to_string(),
        "room-dst".to_string(),
        "--api-base".to_string(),
        server.uri(),
    ]
}

#[test]
fn missing_configuration_fails_and_names_the_variable() {
    let dir = TempDir::new().expect("dir");
    roomsync_cmd(&dir)
        .arg("sync")
        .assert()
        .failure()
        .stderr(contains("ROOMSYNC_ACCESS_TOKEN"));
}

#[test]
fn dotenv_file_supplies_configuration() {
    let dir = TempDir::new().expect("dir");
    std::fs::write(
        dir.path().join(".env"),
        "ROOMSYNC_ACCESS_TOKEN=t\nROOMSYNC_SOURCE_ROOM=s\n",
    )
    .expect("write .env");

    roomsync_cmd(&dir)
        .arg("sync")
        .assert()
        .failure()
        .stderr(contains("ROOMSYNC_DESTINATION_ROOM"));
}

#[test]
fn invalid_api_base_is_rejected() {
    let dir = TempDir::new().expect("dir");
    roomsync_cmd(&dir)
        .args(["diff", "--token", "t", "--source", "s", "--destination", "d"])
        .args(["--api-base", "not-a-url"])
        .assert()
        .failure()
        .stderr(contains("not-a-url"));
}

#[tokio::test]
async fn sync_json_reports_added_and_failed_members() {
    let server = MockServer::start().await;
    mount_roster(&server, "room-src", &["A", "B", "C"]).await;
    mount_roster(&server, "room-dst", &["C"]).await;
    Mock::given(method("POST"))
        .and(path("/memberships"))
        .and(body_json(json!({ "roomId": "room-dst", "personId": "A" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "m-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/memberships"))
        .and(body_json(json!({ "roomId": "room-dst", "personId": "B" })))
        .respond_with(ResponseTemplate::new(409).set_body_string("already a member"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("dir");
    let mut cmd = roomsync_cmd(&dir);
    cmd.arg("sync").args(room_args(&server)).arg("--json");
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let out: Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(out["report"]["attempted"], 2);
    assert_eq!(out["report"]["added"], 1);
    assert_eq!(out["report"]["failed"][0]["person_id"], "B");
    assert_eq!(out["notifications"]["delivered"], json!([]));
}

#[tokio::test]
async fn sync_table_lists_failures() {
    let server = MockServer::start().await;
    mount_roster(&server, "room-src", &["A"]).await;
    mount_roster(&server, "room-dst", &[]).await;
    Mock::given(method("POST"))
        .and(path("/memberships"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("dir");
    let mut cmd = roomsync_cmd(&dir);
    cmd.env("NO_COLOR", "1").arg("sync").args(room_args(&server));
    let output = run_blocking(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 attempted, 0 added, 1 failed"), "got: {stdout}");
    assert!(stdout.contains("A@example.com"), "got: {stdout}");
    assert!(stdout.contains("403"), "got: {stdout}");
}

#[tokio::test]
async fn fetch_failure_exits_non_zero_without_adding() {
    let server = MockServer::start().await;
    mount_roster(&server, "room-src", &["A"]).await;
    Mock::given(method("GET"))
        .and(path("/memberships"))
        .and(query_param("roomId", "room-dst"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("dir");
    let mut cmd = roomsync_cmd(&dir);
    cmd.arg("sync").args(room_args(&server));
    let output = run_blocking(cmd).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("room-dst"), "got: {stderr}");
    assert!(stderr.contains("401"), "got: {stderr}");
}

#[tokio::test]
async fn diff_lists_missing_members_without_writing() {
    let server = MockServer::start().await;
    mount_roster(&server, "room-src", &["A", "B"]).await;
    mount_roster(&server, "room-dst", &["B"]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("dir");
    let mut cmd = roomsync_cmd(&dir);
    cmd.arg("diff").args(room_args(&server));
    let output = run_blocking(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 member(s) would be added"), "got: {stdout}");
    assert!(stdout.contains("+ A@example.com (A)"), "got: {stdout}");
}

#[tokio::test]
async fn reverse_dry_run_plans_the_other_direction() {
    let server = MockServer::start().await;
    mount_roster(&server, "room-src", &[]).await;
    mount_roster(&server, "room-dst", &["Z"]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("dir");
    let mut cmd = roomsync_cmd(&dir);
    cmd.args(["sync", "--dry-run", "--reverse", "--json"])
        .args(room_args(&server));
    let output = run_blocking(cmd).await;

    assert!(output.status.success());
    let plan: Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(plan["source_room"], "room-dst");
    assert_eq!(plan["missing"][0]["personId"], "Z");
}

#[tokio::test]
async fn logs_go_to_stderr_and_stdout_stays_json() {
    let server = MockServer::start().await;
    mount_roster(&server, "room-src", &[]).await;
    mount_roster(&server, "room-dst", &[]).await;

    let dir = TempDir::new().expect("dir");
    let mut cmd = roomsync_cmd(&dir);
    cmd.env("RUST_LOG", "info")
        .arg("sync")
        .args(room_args(&server))
        .arg("--json");
    let output = run_blocking(cmd).await;

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("starting sync"), "got: {stderr}");
    let out: Value = serde_json::from_slice(&output.stdout).expect("stdout is only JSON");
    assert_eq!(out["report"]["attempted"], 0);
}
