//! HTTP client for the remote social-feed API.
//!
//! All requests flow through [`ApiClient`]: it re-reads the persisted
//! token before each request (the persisted copy is the source of truth),
//! attaches the bearer header, and classifies every failure into an
//! [`ApiError`]. A 401 on any endpoint notifies the global unauthorized
//! registry before the error is returned, which is how the session
//! manager learns about expiry mid-flight.

pub mod auth;
pub mod error;
pub mod posts;
pub mod types;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::{ApiError, ApiErrorKind, ApiResult, classify};
pub use types::{FollowStats, LoginResponse, Post, ProfileStats, User};

use crate::config::Config;
use crate::session::token::TokenStore;
use crate::session::unauthorized::UnauthorizedRegistry;

/// Standard User-Agent header for rede API requests.
pub const USER_AGENT: &str = concat!("rede/", env!("CARGO_PKG_VERSION"));

/// Client for the remote API.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    tokens: TokenStore,
    unauthorized: Arc<UnauthorizedRegistry>,
}

impl ApiClient {
    /// Creates a client from configuration.
    ///
    /// Validates the base URL and applies the configured transport
    /// timeout (0 disables it).
    pub fn new(
        config: &Config,
        tokens: TokenStore,
        unauthorized: Arc<UnauthorizedRegistry>,
    ) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .with_context(|| format!("Invalid API base URL: {base_url}"))?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(u64::from(config.timeout_secs)));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            http,
            tokens,
            unauthorized,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request with the bearer header attached (when a token is
    /// persisted) and decodes the JSON response.
    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<T> {
        let req = match self.tokens.load() {
            Ok(Some(token)) => req.bearer_auth(token.access_token),
            Ok(None) => req,
            Err(err) => {
                tracing::warn!("failed to read persisted token: {err:#}");
                req
            }
        };

        let response = req.send().await.map_err(|e| ApiError::network(&e))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            self.unauthorized.notify();
            return Err(ApiError::unauthorized(&body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        response.json::<T>().await.map_err(|e| ApiError::parse(&e))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.execute(self.http.get(self.url(path)).query(query)).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        self.execute(self.http.post(self.url(path)).json(body)).await
    }

    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> ApiResult<T> {
        self.execute(self.http.post(self.url(path)).form(&form)).await
    }
}
