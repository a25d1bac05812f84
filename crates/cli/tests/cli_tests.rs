use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `chatdash` isolated from the developer's environment and token file.
fn chatdash(token_file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("chatdash").unwrap();
    cmd.env("CHATDASH_TOKEN_FILE", token_file)
        .env_remove("CHATDASH_TOKEN")
        .env_remove("CHATDASH_URL")
        .env_remove("CHATDASH_PAGE_SIZE")
        .env_remove("RUST_LOG");
    cmd
}

async fn mount_auth_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/protected"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"logged_in_as": "admin"})),
        )
        .mount(server)
        .await;
}

#[test]
fn test_cli_help() {
    let dir = tempfile::tempdir().unwrap();
    chatdash(&dir.path().join("token.json"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Admin console for the chat analysis service"));
}

#[test]
fn test_cli_logs_help() {
    let dir = tempfile::tempdir().unwrap();
    chatdash(&dir.path().join("token.json"))
        .args(["logs", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--date").and(predicate::str::contains("--watch")));
}

#[test]
fn test_list_without_login_fails() {
    let dir = tempfile::tempdir().unwrap();
    chatdash(&dir.path().join("token.json"))
        .args(["--url", "http://127.0.0.1:9", "logs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_logout_without_token() {
    let dir = tempfile::tempdir().unwrap();
    chatdash(&dir.path().join("token.json"))
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_invalid_hour_rejected_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    chatdash(&dir.path().join("token.json"))
        .args(["chat-schedule", "-1001", "--analysis-hour", "24", "--send-hour", "18"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--analysis-hour"));
}

#[test]
fn test_invalid_page_size_rejected() {
    let dir = tempfile::tempdir().unwrap();
    chatdash(&dir.path().join("token.json"))
        .args(["--page-size", "0", "logs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page size"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_stores_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_json(serde_json::json!({"username": "admin", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token.json");
    let mut cmd = chatdash(&token_file);
    cmd.args(["--url", &server.uri(), "login", "--username", "admin", "--password", "secret"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.success().stdout(predicate::str::contains("Logged in as admin."));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&token_file).unwrap()).unwrap();
    assert_eq!(stored["access_token"], "access-1");
    assert_eq!(stored["refresh_token"], "refresh-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_with_bad_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token.json");
    let mut cmd = chatdash(&token_file);
    cmd.args(["--url", &server.uri(), "login", "-u", "admin", "-p", "wrong"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.failure().stderr(predicate::str::contains("invalid username or password"));
    assert!(!token_file.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logs_table_from_first_page() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(header("authorization", "Bearer t0ken"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "10"))
        .and(query_param("date", "2024-03-05"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "logs": [{"level": "ERROR", "message": "bot crashed", "date": null}],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = chatdash(&dir.path().join("token.json"));
    cmd.env("CHATDASH_TOKEN", "t0ken").args(["--url", &server.uri(), "logs", "--date", "05.03.2024"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.success().stdout(
        predicate::str::contains("bot crashed")
            .and(predicate::str::contains("ERROR"))
            .and(predicate::str::contains("Page 1 of 1 (1 total)")),
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logs_page_flag_renders_only_requested_page() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "logs": [{"level": "INFO", "message": "first page row"}],
            "total": 15
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("offset", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "logs": [{"level": "INFO", "message": "second page row"}],
            "total": 15
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = chatdash(&dir.path().join("token.json"));
    cmd.env("CHATDASH_TOKEN", "t0ken").args(["--url", &server.uri(), "logs", "--page", "2"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.success().stdout(
        predicate::str::contains("second page row")
            .and(predicate::str::contains("first page row").not())
            .and(predicate::str::contains("Page 2 of 2 (15 total)")),
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_listing_prints_no_results() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/analysis/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"analyses": [], "total_count": 0})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = chatdash(&dir.path().join("token.json"));
    cmd.env("CHATDASH_TOKEN", "t0ken").args(["--url", &server.uri(), "analyses"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.success().stdout(predicate::str::contains("No analyses available."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_html_output_escapes_markup() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "logs": [{"level": "INFO", "message": "<script>alert(1)</script>"}],
            "total": 1
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = chatdash(&dir.path().join("token.json"));
    cmd.env("CHATDASH_TOKEN", "t0ken").args(["--url", &server.uri(), "--html", "logs"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.success().stdout(
        predicate::str::contains("&lt;script&gt;alert(1)&lt;/script&gt;")
            .and(predicate::str::contains("<script>").not()),
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_reports_expired_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/protected"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = chatdash(&dir.path().join("token.json"));
    cmd.env("CHATDASH_TOKEN", "stale").args(["--url", &server.uri(), "users"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.failure().stderr(predicate::str::contains("session expired, log in again"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_env_token_leaves_token_file_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/protected"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "other-access",
            "refresh_token": "other-refresh"
        })))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token.json");
    let saved = r#"{"access_token":"file-access","refresh_token":"file-refresh"}"#;
    std::fs::write(&token_file, saved).unwrap();

    let mut cmd = chatdash(&token_file);
    cmd.env("CHATDASH_TOKEN", "stale").args(["--url", &server.uri(), "users"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.failure().stderr(predicate::str::contains("session expired, log in again"));
    assert_eq!(std::fs::read_to_string(&token_file).unwrap(), saved);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_file_token_is_refreshed_and_saved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("authorization", "Bearer file-access"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(serde_json::json!({"refresh_token": "file-refresh"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-access",
            "refresh_token": "new-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("authorization", "Bearer new-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token.json");
    std::fs::write(&token_file, r#"{"access_token":"file-access","refresh_token":"file-refresh"}"#)
        .unwrap();

    let mut cmd = chatdash(&token_file);
    cmd.args(["--url", &server.uri(), "users"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.success();

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&token_file).unwrap()).unwrap();
    assert_eq!(stored["access_token"], "new-access");
    assert_eq!(stored["refresh_token"], "new-refresh");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_listing_failure_is_reported_once() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/messages"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "database is down"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = chatdash(&dir.path().join("token.json"));
    cmd.env("CHATDASH_TOKEN", "t0ken").args(["--url", &server.uri(), "messages"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert
        .failure()
        .stderr(predicate::str::contains("error: ").and(predicate::str::contains("database is down")))
        .stderr(predicate::str::contains("Error:").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_chat_schedule_posts_hours() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/chats/-1001/schedule"))
        .and(body_json(serde_json::json!({
            "prompt_id": "p1",
            "schedule_analysis": true,
            "analysis_time": "09:00",
            "send_time": "18:00"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = chatdash(&dir.path().join("token.json"));
    cmd.env("CHATDASH_TOKEN", "t0ken").args([
        "--url",
        &server.uri(),
        "chat-schedule",
        "-1001",
        "--prompt",
        "p1",
        "--enable",
        "--analysis-hour",
        "9",
        "--send-hour",
        "18",
    ]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.success().stdout(predicate::str::contains("Schedule for chat -1001 saved: enabled"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analysis_details_show_costs() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/analysis/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "prompt_name": "Digest",
            "result_text": "All quiet.",
            "tokens_input": 2000,
            "tokens_output": 1000
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = chatdash(&dir.path().join("token.json"));
    cmd.env("CHATDASH_TOKEN", "t0ken").args(["--url", &server.uri(), "analysis", "7"]);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();
    assert.success().stdout(
        predicate::str::contains("$0.06")
            .and(predicate::str::contains("$0.12"))
            .and(predicate::str::contains("All quiet.")),
    );
}
