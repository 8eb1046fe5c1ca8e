//! Feed and post-creation endpoints.

use serde::Serialize;

use super::types::Post;
use super::{ApiClient, ApiResult};

#[derive(Serialize)]
struct CreatePayload<'a> {
    conteudo: &'a str,
}

/// `GET /post/feed` — one page of the reverse-chronological feed.
pub async fn feed(api: &ApiClient, limit: usize, offset: usize) -> ApiResult<Vec<Post>> {
    api.get_json(
        "/post/feed",
        &[("limit", limit.to_string()), ("offset", offset.to_string())],
    )
    .await
}

/// `POST /post/` — publishes a post, returning the server-assigned record.
pub async fn create(api: &ApiClient, content: &str) -> ApiResult<Post> {
    api.post_json("/post/", &CreatePayload { conteudo: content }).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{method, path, query_param};
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

    /// Test: feed passes limit/offset as query params.
    #[tokio::test]
    async fn test_feed_query_params() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let api = client_for(&server, &dir);

        Mock::given(method("GET"))
            .and(path("/post/feed"))
            .and(query_param("limit", "20"))
            .and(query_param("offset", "40"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 41, "conteudo": "a", "usuario_id": 1}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let page = feed(&api, 20, 40).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 41);
    }

    /// Test: create posts the conteudo payload and decodes the new post.
    #[tokio::test]
    async fn test_create_post() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let api = client_for(&server, &dir);

        Mock::given(method("POST"))
            .and(path("/post/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 99, "conteudo": "hello", "usuario_id": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let post = create(&api, "hello").await.unwrap();
        assert_eq!(post.id, 99);
        assert_eq!(post.content, "hello");
    }
}
