//! Wire types for the remote API.
//!
//! The server speaks Portuguese field names; serde renames keep the Rust
//! side idiomatic. `criado_em` stays an opaque string on the wire (the
//! server emits naive ISO-8601); display parsing is best-effort.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A user record as returned by `/usuario/*` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

/// Response from the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// A post in the feed or on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(rename = "conteudo")]
    pub content: String,
    #[serde(rename = "usuario_id")]
    pub author_id: i64,
    #[serde(rename = "criado_em", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
}

impl Post {
    /// Display label for the author: embedded user name, or `#<id>`.
    pub fn author_label(&self) -> String {
        match &self.author {
            Some(user) => user.name.clone(),
            None => format!("#{}", self.author_id),
        }
    }

    /// Best-effort local-time rendering of `criado_em`.
    ///
    /// The server emits naive ISO-8601; full RFC 3339 is accepted too.
    /// Unparseable values render as-is rather than being hidden.
    pub fn created_at_display(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(
                ts.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            );
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.format("%Y-%m-%d %H:%M").to_string());
        }
        Some(raw.to_string())
    }
}

/// Follower statistics for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowStats {
    pub posts: u64,
    #[serde(rename = "seguidores")]
    pub followers: u64,
    #[serde(rename = "seguindo")]
    pub following: u64,
}

/// Profile header: the user record plus follower stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    #[serde(rename = "usuario")]
    pub user: User,
    pub stats: FollowStats,
}
