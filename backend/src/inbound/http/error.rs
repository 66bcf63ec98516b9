//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while translating every
//! failure into a status code and the uniform single-field message envelope.
//! The translation is terminal; nothing here retries.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// Single-field message envelope returned by every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable description of the outcome.
    #[schema(example = "The person name field is empty")]
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message in the envelope.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

// Ordered first-match translation table; the final arm is the catch-all.
fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidParameter => StatusCode::BAD_REQUEST,
        ErrorCode::UnauthorizedAccess => StatusCode::FORBIDDEN,
        ErrorCode::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::Internal => StatusCode::GATEWAY_TIMEOUT,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        match self.code() {
            ErrorCode::DeadlineExceeded => {
                // The platform may terminate the request before this line
                // runs; the log entry is collected for the admin digest
                // either way.
                error!(error = %self, "deadline exceeded while handling request");
            }
            ErrorCode::Internal => {
                error!(error = %self, "unclassified error reached the HTTP boundary");
            }
            ErrorCode::InvalidParameter | ErrorCode::UnauthorizedAccess => {}
        }
        HttpResponse::build(self.status_code()).json(MessageResponse::new(self.message()))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Anything the framework raises that no handler classified.
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    async fn read_envelope(error: &Error) -> MessageResponse {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        serde_json::from_slice(&bytes).expect("envelope deserialises")
    }

    #[rstest]
    #[case(Error::invalid_parameter("bad gender"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized_access("admin only"), StatusCode::FORBIDDEN)]
    #[case(Error::deadline_exceeded("datastore slow"), StatusCode::GATEWAY_TIMEOUT)]
    #[case(Error::internal("boom"), StatusCode::GATEWAY_TIMEOUT)]
    fn every_category_maps_to_its_documented_status(
        #[case] error: Error,
        #[case] expected: StatusCode,
    ) {
        assert_eq!(error.status_code(), expected);
    }

    #[rstest]
    #[case(Error::invalid_parameter("bad gender"))]
    #[case(Error::unauthorized_access("admin only"))]
    #[case(Error::deadline_exceeded("datastore slow"))]
    #[case(Error::internal("boom"))]
    #[actix_web::test]
    async fn the_body_carries_the_error_message(#[case] error: Error) {
        let envelope = read_envelope(&error).await;
        assert_eq!(envelope.message, error.message());
    }

    #[actix_web::test]
    async fn unclassified_framework_errors_fall_through_to_the_generic_handler() {
        let framework_error = actix_web::error::ErrorImATeapot("odd");
        let error = Error::from(framework_error);
        assert_eq!(error.code(), ErrorCode::Internal);
        assert_eq!(error.status_code(), StatusCode::GATEWAY_TIMEOUT);
        let envelope = read_envelope(&error).await;
        assert_eq!(envelope.message, "odd");
    }
}
