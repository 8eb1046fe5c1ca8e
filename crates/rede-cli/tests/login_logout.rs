//! Integration tests for the session commands.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a temp REDE_HOME directory for test isolation.
fn temp_rede_home() -> TempDir {
    TempDir::new().expect("create temp rede home")
}

fn ana() -> serde_json::Value {
    serde_json::json!({"id": 1, "nome": "Ana", "email": "a@b.com"})
}

async fn mock_login_flow(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/usuario/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": token, "token_type": "bearer"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/usuario/me"))
        .and(header("authorization", format!("Bearer {token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana()))
        .mount(server)
        .await;
}

/// Test: login stores the token and reports the identity.
#[tokio::test]
async fn test_login_stores_token() {
    let home = temp_rede_home();
    let server = MockServer::start().await;
    mock_login_flow(&server, "T1").await;

    cargo_bin_cmd!("rede")
        .env("REDE_HOME", home.path())
        .args(["--base-url", &server.uri()])
        .args(["login", "--email", "a@b.com", "--password", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Ana <a@b.com>."));

    let auth = fs::read_to_string(home.path().join("auth.json")).unwrap();
    assert!(auth.contains("T1"), "token should be persisted: {auth}");
}

/// Test: the password falls back to stdin when the flag is omitted.
#[tokio::test]
async fn test_login_reads_password_from_stdin() {
    let home = temp_rede_home();
    let server = MockServer::start().await;
    mock_login_flow(&server, "T2").await;

    cargo_bin_cmd!("rede")
        .env("REDE_HOME", home.path())
        .args(["--base-url", &server.uri()])
        .args(["login", "--email", "a@b.com"])
        .write_stdin("secret\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Ana"));
}

/// Test: rejected credentials surface the server detail and exit non-zero.
#[tokio::test]
async fn test_login_rejected() {
    let home = temp_rede_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/usuario/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"detail": "Credenciais invalidas"})),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("rede")
        .env("REDE_HOME", home.path())
        .args(["--base-url", &server.uri()])
        .args(["login", "--email", "a@b.com", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Credenciais invalidas"));

    assert!(!home.path().join("auth.json").exists());
}

/// Test: logout clears the token; a second logout is a friendly no-op.
#[test]
fn test_logout_clears_token() {
    let home = temp_rede_home();
    fs::write(
        home.path().join("auth.json"),
        r#"{"access_token": "T1", "token_type": "bearer"}"#,
    )
    .unwrap();

    cargo_bin_cmd!("rede")
        .env("REDE_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out."));
    assert!(!home.path().join("auth.json").exists());

    cargo_bin_cmd!("rede")
        .env("REDE_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));
}

/// Test: whoami reports the hydrated identity, or fails when signed out.
#[tokio::test]
async fn test_whoami() {
    let home = temp_rede_home();
    let server = MockServer::start().await;

    cargo_bin_cmd!("rede")
        .env("REDE_HOME", home.path())
        .args(["--base-url", &server.uri()])
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));

    fs::write(
        home.path().join("auth.json"),
        r#"{"access_token": "T1", "token_type": "bearer"}"#,
    )
    .unwrap();
    Mock::given(method("GET"))
        .and(path("/usuario/me"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana()))
        .mount(&server)
        .await;

    cargo_bin_cmd!("rede")
        .env("REDE_HOME", home.path())
        .args(["--base-url", &server.uri()])
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana <a@b.com> (id 1)"));
}

/// Test: signup chains account creation into the login flow.
#[tokio::test]
async fn test_signup_signs_in() {
    let home = temp_rede_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/usuario/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(ana()))
        .expect(1)
        .mount(&server)
        .await;
    mock_login_flow(&server, "T3").await;

    cargo_bin_cmd!("rede")
        .env("REDE_HOME", home.path())
        .args(["--base-url", &server.uri()])
        .args(["signup", "--name", "Ana", "--email", "a@b.com", "--password", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Account created. Signed in as Ana"));

    let auth = fs::read_to_string(home.path().join("auth.json")).unwrap();
    assert!(auth.contains("T3"));
}
