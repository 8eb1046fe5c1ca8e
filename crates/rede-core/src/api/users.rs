//! Profile endpoints.

use super::types::{Post, ProfileStats, User};
use super::{ApiClient, ApiResult};

/// `GET /usuario/:id` — a user record.
pub async fn get(api: &ApiClient, id: i64) -> ApiResult<User> {
    api.get_json(&format!("/usuario/{id}"), &[]).await
}

/// `GET /usuario/:id/stats` — the user plus follower statistics.
pub async fn stats(api: &ApiClient, id: i64) -> ApiResult<ProfileStats> {
    api.get_json(&format!("/usuario/{id}/stats"), &[]).await
}

/// `GET /usuario/:id/posts` — one page of the user's own posts.
pub async fn posts(api: &ApiClient, id: i64, limit: usize, offset: usize) -> ApiResult<Vec<Post>> {
    api.get_json(
        &format!("/usuario/{id}/posts"),
        &[("limit", limit.to_string()), ("offset", offset.to_string())],
    )
    .await
}
