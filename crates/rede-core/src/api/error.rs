//! Error classification for API calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of API errors for consistent handling across the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// 401 from any endpoint (rejected credentials or expired token).
    Unauthorized,
    /// Any other non-success HTTP status (4xx, 5xx).
    HttpStatus,
    /// Transport failure (connect, timeout, TLS).
    Network,
    /// Failed to decode the response body.
    Parse,
    /// The request was superseded and cancelled by the caller.
    Cancelled,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Structured error from the API layer with kind and details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category.
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display.
    pub message: String,
    /// Optional additional details (e.g., raw error body).
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an unauthorized error, preferring the server's detail text.
    pub fn unauthorized(body: &str) -> Self {
        let message = extract_detail(body).unwrap_or_else(|| "Session expired".to_string());
        Self {
            kind: ApiErrorKind::Unauthorized,
            message,
            details: non_empty(body),
        }
    }

    /// Creates an HTTP status error.
    ///
    /// The server's structured `detail` field is extracted when present so
    /// the UI can show a clean one-liner instead of a JSON blob.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = match extract_detail(body) {
            Some(detail) => detail,
            None => format!("HTTP {status}"),
        };
        Self {
            kind: ApiErrorKind::HttpStatus,
            message,
            details: non_empty(body),
        }
    }

    /// Creates a network error from a transport failure.
    pub fn network(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Could not reach the server".to_string()
        } else {
            "Network error".to_string()
        };
        Self {
            kind: ApiErrorKind::Network,
            message,
            details: Some(err.to_string()),
        }
    }

    /// Creates a parse error from a body decode failure.
    pub fn parse(err: &reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: "Unexpected response from the server".to_string(),
            details: Some(err.to_string()),
        }
    }

    /// Creates a cancellation marker for a superseded request.
    pub fn cancelled() -> Self {
        Self::new(ApiErrorKind::Cancelled, "Request cancelled")
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ApiErrorKind::Cancelled
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Recovers the structured `ApiError` from an `anyhow` chain.
///
/// Session operations return `anyhow::Result` (storage failures get
/// context there); callers that need to classify re-extract the API
/// error here, falling back to a generic network classification.
pub fn classify(err: &anyhow::Error) -> ApiError {
    if let Some(api_err) = err.downcast_ref::<ApiError>() {
        return api_err.clone();
    }
    ApiError {
        kind: ApiErrorKind::Network,
        message: format!("{err:#}"),
        details: None,
    }
}

/// Extracts the `detail` string from a FastAPI-style error body.
fn extract_detail(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("detail")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn non_empty(body: &str) -> Option<String> {
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}
