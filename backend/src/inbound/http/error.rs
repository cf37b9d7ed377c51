//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn failures into the error envelope and a status code.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

use super::envelope::ErrorEnvelope;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(ErrorEnvelope::from(&redact_if_internal(self)))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Render malformed JSON bodies as a 400 error envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("Invalid JSON body: {err}")).into()
}

/// Render undecodable query strings as a 400 error envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("Invalid query string: {err}")).into()
}

/// Fallback service for paths no route matches.
pub async fn unmatched_route() -> ApiResult<HttpResponse> {
    Err(Error::not_found("Route not found"))
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

    #[fixture]
    fn internal_error() -> Error {
        Error::internal("connection refused by 10.0.0.4")
            .with_trace_id(TRACE_ID)
            .with_details(json!({ "secret": "x" }))
    }

    async fn render(error: &Error) -> (StatusCode, Option<String>, ErrorEnvelope) {
        let response = ResponseError::error_response(error);
        let status = response.status();
        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        let body = serde_json::from_slice(&bytes).expect("error envelope deserialises");
        (status, header, body)
    }

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(ResponseError::status_code(&error), status);
    }

    #[rstest]
    #[actix_web::test]
    async fn internal_errors_are_redacted(internal_error: Error) {
        let (status, header, body) = render(&internal_error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header.as_deref(), Some(TRACE_ID));
        assert!(!body.success);
        assert_eq!(body.error, "Internal server error");
        assert_eq!(body.code, ErrorCode::InternalError);
        assert!(body.details.is_none());
        assert_eq!(body.trace_id.as_deref(), Some(TRACE_ID));
    }

    #[rstest]
    #[actix_web::test]
    async fn validation_errors_keep_message_and_details() {
        let error = Error::invalid_request("Invalid plan ID").with_details(json!({ "field": "id" }));
        let (status, header, body) = render(&error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(header.is_none());
        assert_eq!(body.error, "Invalid plan ID");
        assert_eq!(body.details, Some(json!({ "field": "id" })));
        assert!(body.trace_id.is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn envelope_uses_camel_case_keys() {
        let error = Error::not_found("Plan not found").with_trace_id(TRACE_ID);
        let response = ResponseError::error_response(&error);
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "Plan not found",
                "code": "not_found",
                "traceId": TRACE_ID,
            })
        );
    }
}
