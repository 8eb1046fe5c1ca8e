//! Pagination flow against a mock server: the feed state machine
//! driving the real HTTP client, the way the frontends do.

use std::sync::Arc;

use rede_core::api::{ApiClient, posts};
use rede_core::config::Config;
use rede_core::feed::{FeedState, FetchKind};
use rede_core::session::{TokenStore, UnauthorizedRegistry};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, dir: &tempfile::TempDir) -> Arc<ApiClient> {
    let config = Config {
        base_url: server.uri(),
        ..Config::default()
    };
    Arc::new(
        ApiClient::new(
            &config,
            TokenStore::open_at(dir.path().join("auth.json")),
            Arc::new(UnauthorizedRegistry::new()),
        )
        .unwrap(),
    )
}

fn page_json(range: std::ops::Range<i64>) -> serde_json::Value {
    let posts: Vec<serde_json::Value> = range
        .map(|id| serde_json::json!({"id": id, "conteudo": format!("post {id}"), "usuario_id": 1}))
        .collect();
    serde_json::Value::Array(posts)
}

/// One guarded fetch: ask the state machine, hit the server, report back.
async fn fetch(api: &ApiClient, feed: &mut FeedState, kind: FetchKind) -> bool {
    let Some(request) = feed.begin(kind) else {
        return false;
    };
    match posts::feed(api, request.limit, request.offset).await {
        Ok(page) => feed.apply_page(request.generation, page),
        Err(err) => {
            feed.fail(request.generation, &err);
            false
        }
    }
}

/// Test: a short first page exhausts the feed; loadMore issues no
/// further request (the mock's expect(1) enforces the call count).
#[tokio::test]
async fn test_short_first_page_stops_pagination() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/post/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0..5)))
        .expect(1)
        .mount(&server)
        .await;

    let mut feed = FeedState::new(20);
    assert!(fetch(&api, &mut feed, FetchKind::Initial).await);
    assert_eq!(feed.items().len(), 5);
    assert!(!feed.has_more());

    assert!(!fetch(&api, &mut feed, FetchKind::More).await);
    assert_eq!(feed.offset(), 5);
}

/// Test: full page → append → short page → exhausted, with the offset
/// advancing exactly with items.len().
#[tokio::test]
async fn test_paginate_until_exhausted() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/post/feed"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0..20)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/post/feed"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(20..23)))
        .expect(1)
        .mount(&server)
        .await;

    let mut feed = FeedState::new(20);
    assert!(fetch(&api, &mut feed, FetchKind::Initial).await);
    assert_eq!(feed.offset(), 20);
    assert!(feed.has_more());

    assert!(fetch(&api, &mut feed, FetchKind::More).await);
    assert_eq!(feed.offset(), 23);
    assert!(!feed.has_more());

    // Exhausted: no request leaves the client.
    assert!(!fetch(&api, &mut feed, FetchKind::More).await);
}

/// Test: a server failure surfaces its detail and stops pagination; a
/// refresh recovers.
#[tokio::test]
async fn test_failure_then_refresh_recovers() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/post/feed"))
        .and(query_param("offset", "20"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"detail": "Instabilidade"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/post/feed"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0..20)))
        .mount(&server)
        .await;

    let mut feed = FeedState::new(20);
    assert!(fetch(&api, &mut feed, FetchKind::Initial).await);

    assert!(!fetch(&api, &mut feed, FetchKind::More).await);
    assert_eq!(feed.error(), Some("Instabilidade"));
    assert!(!feed.has_more());

    assert!(fetch(&api, &mut feed, FetchKind::Refresh).await);
    assert!(feed.error().is_none());
    assert!(feed.has_more());
}

/// Test: publish-then-prepend keeps the cursor consistent with the
/// server-assigned record at the head.
#[tokio::test]
async fn test_create_and_prepend() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/post/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0..5)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/post/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 99, "conteudo": "hello", "usuario_id": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut feed = FeedState::new(20);
    assert!(fetch(&api, &mut feed, FetchKind::Initial).await);

    let created = posts::create(&api, "hello").await.unwrap();
    feed.prepend(created);

    assert_eq!(feed.items()[0].id, 99);
    assert_eq!(feed.offset(), 6);
}
