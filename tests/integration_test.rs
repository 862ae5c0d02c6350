use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use tempfile::tempdir;

fn retry_fetch() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("retry-fetch"));
    cmd.env_remove("RETRY_FETCH_INITIAL_DELAY_MS")
        .env_remove("RETRY_FETCH_MAX_DELAY_MS")
        .env_remove("RETRY_FETCH_MAX_ATTEMPTS")
        .arg("--initial-delay-ms")
        .arg("1")
        .arg("--max-delay-ms")
        .arg("10");
    cmd
}

#[test]
fn test_fetch_success_prints_body() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("ok")
        .create();

    retry_fetch()
        .arg(format!("{}/health", url))
        .assert()
        .success()
        .stdout("ok");

    mock.assert();
}

#[test]
fn test_fetch_retries_until_success() {
    let mut server = Server::new();
    let url = server.url();

    let failing = server
        .mock("GET", "/inventory")
        .with_status(502)
        .expect(2)
        .create();
    let healthy = server
        .mock("GET", "/inventory")
        .with_status(200)
        .with_body("hosts")
        .create();

    retry_fetch()
        .arg("--max-attempts")
        .arg("3")
        .arg(format!("{}/inventory", url))
        .assert()
        .success()
        .stdout("hosts");

    failing.assert();
    healthy.assert();
}

#[test]
fn test_fetch_exhausted_reports_status_and_fails() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", "/down")
        .with_status(503)
        .with_body("maintenance")
        .expect(3)
        .create();

    retry_fetch()
        .arg("--max-attempts")
        .arg("3")
        .arg(format!("{}/down", url))
        .assert()
        .failure()
        .stdout("maintenance")
        .stderr(predicate::str::contains("503"));

    mock.assert();
}

#[test]
fn test_fetch_logs_retry_warning_with_proxy_env() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/flaky")
        .with_status(500)
        .expect(2)
        .create();

    retry_fetch()
        .env("RUST_LOG", "warn")
        .env("NO_PROXY", "inventory.internal")
        .arg("--max-attempts")
        .arg("2")
        .arg(format!("{}/flaky", url))
        .assert()
        .failure()
        .stderr(predicate::str::contains("attempt 1/2"))
        .stderr(predicate::str::contains("status code 500"))
        .stderr(predicate::str::contains("NO_PROXY: inventory.internal"))
        .stderr(predicate::str::contains("attempt 2/2").not());
}

#[test]
fn test_fetch_zero_attempts_fails_without_request() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server.mock("GET", "/never").expect(0).create();

    retry_fetch()
        .arg("--max-attempts")
        .arg("0")
        .arg(format!("{}/never", url))
        .assert()
        .failure()
        .stderr(predicate::str::contains("0 attempts"));

    mock.assert();
}

#[test]
fn test_fetch_post_with_headers_and_body_to_file() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("POST", "/jobs")
        .match_header("content-type", "application/json")
        .match_body(Matcher::JsonString(r#"{"name":"scan"}"#.to_string()))
        .with_status(201)
        .with_body(r#"{"id":7}"#)
        .create();

    let out_dir = tempdir().unwrap();
    let out_file = out_dir.path().join("response.json");

    retry_fetch()
        .arg("-X")
        .arg("post")
        .arg("-H")
        .arg("Content-Type: application/json")
        .arg("-d")
        .arg(r#"{"name":"scan"}"#)
        .arg("-o")
        .arg(&out_file)
        .arg(format!("{}/jobs", url))
        .assert()
        .success()
        .stdout("");

    mock.assert();
    assert_eq!(std::fs::read_to_string(out_file).unwrap(), r#"{"id":7}"#);
}

#[test]
fn test_fetch_connection_refused_fails() {
    retry_fetch()
        .arg("--max-attempts")
        .arg("2")
        .arg("http://127.0.0.1:1/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GET http://127.0.0.1:1/ failed"));
}

#[test]
fn test_fetch_invalid_header_fails() {
    retry_fetch()
        .arg("-H")
        .arg("missing-separator")
        .arg("http://127.0.0.1:1/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected 'NAME:VALUE'"));
}
