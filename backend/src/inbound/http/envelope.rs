//! JSON response envelope shared by every API endpoint.
//!
//! Success bodies look like `{ "success": true, "data": ..., "message"? }`.
//! Failure bodies look like `{ "success": false, "error": "...", "code": ...,
//! "details"?, "traceId"? }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// Successful response wrapper.
///
/// # Examples
/// ```
/// use briki_api::inbound::http::envelope::ApiEnvelope;
///
/// let body = serde_json::to_value(ApiEnvelope::ok(vec![1, 2]).with_message("done"))
///     .expect("serialise");
/// assert_eq!(body["success"], true);
/// assert_eq!(body["data"], serde_json::json!([1, 2]));
/// assert_eq!(body["message"], "done");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    /// Always `true` for this shape.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Failure response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `false` for this shape.
    pub success: bool,
    /// Human-readable failure message.
    #[schema(example = "Invalid plan ID")]
    pub error: String,
    /// Stable machine-readable error code.
    #[schema(value_type = String, example = "invalid_request")]
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Correlation identifier matching the `trace-id` response header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        Self {
            success: false,
            error: error.message().to_owned(),
            code: error.code(),
            details: error.details().cloned(),
            trace_id: error.trace_id().map(str::to_owned),
        }
    }
}
