//! Authentication endpoints.

use serde::Serialize;

use super::types::{LoginResponse, User};
use super::{ApiClient, ApiResult};

#[derive(Serialize)]
struct SignupPayload<'a> {
    nome: &'a str,
    email: &'a str,
    senha: &'a str,
}

/// `POST /usuario/login` — OAuth2 password form; the server expects the
/// email in the `username` field.
pub async fn login(api: &ApiClient, email: &str, password: &str) -> ApiResult<LoginResponse> {
    api.post_form("/usuario/login", &[("username", email), ("password", password)])
        .await
}

/// `POST /usuario/` — creates the account. Does not yield a session; the
/// caller must follow up with an explicit login.
pub async fn signup(api: &ApiClient, name: &str, email: &str, password: &str) -> ApiResult<User> {
    api.post_json(
        "/usuario/",
        &SignupPayload {
            nome: name,
            email,
            senha: password,
        },
    )
    .await
}

/// `GET /usuario/me` — the identity behind the current bearer token.
pub async fn me(api: &ApiClient) -> ApiResult<User> {
    api.get_json("/usuario/me", &[]).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::session::token::TokenStore;
    use crate::session::unauthorized::UnauthorizedRegistry;

    fn client_for(server: &MockServer, dir: &tempfile::TempDir) -> ApiClient {
        let config = Config {
            base_url: server.uri(),
            ..Config::default()
        };
        ApiClient::new(
            &config,
            TokenStore::open_at(dir.path().join("auth.json")),
            Arc::new(UnauthorizedRegistry::new()),
        )
        .unwrap()
    }

    /// Test: login sends a form body with username=email.
    #[tokio::test]
    async fn test_login_form_encoding() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let api = client_for(&server, &dir);

        Mock::given(method("POST"))
            .and(path("/usuario/login"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("username=a%40b.com"))
            .and(body_string_contains("password=x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "T1", "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = login(&api, "a@b.com", "x").await.unwrap();
        assert_eq!(resp.access_token, "T1");
    }

    /// Test: signup posts the Portuguese JSON payload.
    #[tokio::test]
    async fn test_signup_payload() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let api = client_for(&server, &dir);

        Mock::given(method("POST"))
            .and(path("/usuario/"))
            .and(body_string_contains("\"nome\":\"Ana\""))
            .and(body_string_contains("\"senha\":\"x\""))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 1, "nome": "Ana", "email": "a@b.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = signup(&api, "Ana", "a@b.com", "x").await.unwrap();
        assert_eq!(user.id, 1);
    }
}
