//! Error Types
//!
//! Every HTTP or transport failure collapses into `ApiError::Request`; tree
//! construction has its own `TreeError`.

use serde_json::Value;

use crate::models::RecordId;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response, transport failure, or missing token.
    #[error("{message}")]
    Request { status: Option<u16>, message: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("token storage unavailable: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError::Request {
            status,
            message: message.into(),
        }
    }

    /// Text shown on the error banner.
    pub fn message(&self) -> String {
        match self {
            ApiError::Request { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Builds the error for a failed response, preferring the backend's own
    /// explanation over `fallback`.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| fallback.to_string());
        ApiError::request(Some(status), message)
    }
}

/// Best-effort message from an error body: FastAPI `detail` (string or
/// validation list), then `message`.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => return Some(detail.clone()),
        Some(Value::Array(entries)) => {
            let joined = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return Some(joined);
            }
        }
        _ => {}
    }
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("project {id} is its own ancestor")]
    Cycle { id: RecordId },
    #[error("project id {id} appears more than once")]
    DuplicateId { id: RecordId },
}
